use shoutbot_plugin::Plugin;
use tracing::debug;

pub use crate::context::Context;

/// Shout out other streamers, on command or when they chat
#[cfg(feature = "plugin-shoutout")]
pub mod shoutout;

/// Common includes used in plugins.
#[allow(unused)]
mod prelude {
    pub use crate::command::{Command as BotCommand, Cooldown};
    pub use crate::plugin::Context;
    pub use async_trait::async_trait;
    pub use irc::client::Client;
    pub use irc::proto::{Command, Message};
    pub use shoutbot_plugin::{Author, ChatSender, Error as PluginError, Name, Plugin, Version};
}

/// Plugin registry.
#[derive(Default)]
pub struct Registry {
    /// List of loaded plugins.
    pub plugins: Vec<Box<dyn Plugin<Context>>>,
}

impl Registry {
    /// Constructs and returns a new, empty plugin registry.
    #[must_use]
    pub fn new() -> Self {
        Self { plugins: vec![] }
    }

    /// Constructs and returns a new plugin registry with the plugins enabled at compile time.
    #[must_use]
    pub fn preloaded(ctx: &Context) -> Self {
        let mut registry = Self::new();
        debug!("registering plugins");

        #[cfg(feature = "plugin-shoutout")]
        registry.register::<shoutout::Shoutout>(ctx);

        let num_plugins = registry.plugins.len();
        debug!(%num_plugins, "finished registering plugins");

        registry
    }

    /// Constructs a plugin of type `P` and adds it to the registry.
    pub fn register<P: Plugin<Context> + 'static>(&mut self, ctx: &Context) {
        debug!(name = %P::name(), version = %P::version(), "registering plugin");

        self.plugins.push(Box::new(P::new(ctx)));
    }
}
