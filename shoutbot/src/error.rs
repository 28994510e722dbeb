//! Error types

use miette::Diagnostic;
use thiserror::Error;

/// Application errors for configuration and IRC operations.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// The configuration could not be loaded.
    #[error("Could not load configuration")]
    #[diagnostic(help("check the config file and any SHOUTBOT_* environment variables"))]
    Config(#[source] Box<figment::Error>),
    /// Failed to create the IRC client.
    #[error("Could not create IRC client")]
    IrcClient(#[source] irc::error::Error),
    /// Failed to register with the IRC server.
    #[error("Could not send registration details for IRC")]
    IrcRegistration(#[source] irc::error::Error),
    /// Failed to request IRC capabilities.
    #[error("Could not request IRC capabilities")]
    IrcCapabilities(#[source] irc::error::Error),
    /// General IRC communication error.
    #[error("IRC error")]
    Irc(#[from] irc::error::Error),
}
