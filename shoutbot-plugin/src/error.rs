use std::error::Error as StdError;

use thiserror::Error;

/// An error that occurred during plugin activity.
#[derive(Error, Debug)]
pub enum Error {
    /// The IRC client refused or failed to queue a message.
    #[error("IRC error: {0}")]
    Irc(#[from] irc::error::Error),
    /// A plugin-specific failure.
    #[error("Plugin error: {0}")]
    Plugin(Box<dyn StdError + Sync + Send>),
}

impl Error {
    /// Wraps a plugin-specific error.
    pub fn plugin<E>(err: E) -> Self
    where
        E: Into<Box<dyn StdError + Sync + Send>>,
    {
        Self::Plugin(err.into())
    }
}
