use async_trait::async_trait;
use irc::client::Client;
use irc::proto::Message;

use crate::{Author, Error, Name, Version};

/// The base trait that all plugins must implement.
///
/// `C` is the shared context the host passes to every plugin, such as the
/// loaded configuration.
#[async_trait]
pub trait Plugin<C = ()>: Send + Sync {
    /// The constructor for a new plugin.
    fn new(ctx: &C) -> Self
    where
        Self: Sized;

    /// Returns the name of the plugin.
    fn name() -> Name
    where
        Self: Sized;

    /// Returns the author of the plugin.
    fn author() -> Author
    where
        Self: Sized;

    /// Returns the version of the plugin.
    fn version() -> Version
    where
        Self: Sized;

    /// Handles IRC protocol messages.
    ///
    /// Called once per received message, in order. A returned error is logged
    /// by the host and does not stop delivery to other plugins.
    async fn handle_message(
        &self,
        _ctx: &C,
        _client: &Client,
        _message: &Message,
    ) -> Result<(), Error> {
        Ok(())
    }
}
