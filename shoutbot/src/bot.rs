//! The main process for communicating over IRC and managing state.
use std::sync::Arc;

use futures::stream::StreamExt;
use irc::client::prelude::Client;
use irc::proto::Message;
use irc::proto::caps::Capability;
use tracing::{debug, info, warn};

use crate::Error;
use crate::Registry;
use crate::config::Config;
use crate::consts::TWITCH_CAPABILITIES;
use crate::plugin::Context;

/// The chat bot that connects to Twitch chat and feeds messages to its plugins.
pub struct Bot {
    /// The complete configuration loaded from file or environment
    config: Config,
    /// The registry containing all loaded plugins
    registry: Registry,
    /// The shared context for plugins
    context: Arc<Context>,
}

impl Bot {
    /// Creates a new bot from the provided configuration.
    ///
    /// This constructs the plugins, which may read their state from disk, but doesn't connect
    /// yet. Call `run()` to start the bot.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let context = Arc::new(Context::new(config.clone()));
        let registry = Registry::preloaded(&context);

        Self {
            config,
            registry,
            context,
        }
    }

    /// Connects and processes chat messages until the connection closes.
    ///
    /// # Errors
    ///
    /// This function will return an error in the following situations:
    ///
    /// - [`Error::IrcClient`] - if the instantiation of the IRC client fails (e.g. due to
    ///   configuration issues.)
    /// - [`Error::IrcRegistration`] - if user registration fails (e.g. if the token is invalid.)
    /// - [`Error::IrcCapabilities`] - if the Twitch capabilities could not be requested.
    /// - [`Error::Irc`] - if a protocol or communication error occurred.
    pub async fn run(&self) -> Result<(), Error> {
        let mut client = Client::from_config(self.config.irc.clone().into())
            .await
            .map_err(Error::IrcClient)?;

        client.identify().map_err(Error::IrcRegistration)?;

        let capabilities = TWITCH_CAPABILITIES.map(Capability::Custom);
        client
            .send_cap_req(&capabilities)
            .map_err(Error::IrcCapabilities)?;

        info!(
            hostname = %self.config.irc.hostname,
            channels = ?self.config.irc.channels,
            "connected"
        );

        let mut stream = client.stream()?;

        while let Some(message) = stream.next().await.transpose()? {
            self.handle_message(&client, &message).await;
        }

        warn!("connection closed");

        Ok(())
    }

    /// Dispatches a single IRC message to all registered plugins.
    ///
    /// A failing plugin is logged and doesn't prevent the remaining plugins from seeing the
    /// message.
    async fn handle_message(&self, client: &Client, message: &Message) {
        debug!(?message, "processing irc message");

        for plugin in &self.registry.plugins {
            if let Err(err) = plugin.handle_message(&self.context, client, message).await {
                warn!(?err, "plugin failed to handle message");
            }
        }
    }
}
