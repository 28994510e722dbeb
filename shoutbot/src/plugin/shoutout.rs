use std::io;
use std::path::PathBuf;
use std::time::Instant;

use tokio::sync::Mutex;
use tracing::debug;

use crate::plugin::prelude::*;
use crate::twitch;

pub mod history;
pub mod service;
pub mod template;
#[cfg(test)]
mod testing;

pub use history::{History, HistoryStore, ShoutoutRecord};
pub use service::{ChatEvent, Clock, Decision, ShoutoutService, SystemClock};

/// Errors that can occur while reading or writing the shoutout history.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not read history file {}", path.display())]
    ReadHistory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not write {}", path.display())]
    WriteHistory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not parse history file {}: {source}", path.display())]
    ParseHistory {
        path: PathBuf,
        #[source]
        source: serde_path_to_error::Error<serde_json::Error>,
    },
    #[error("could not serialize history")]
    SerializeHistory(#[source] serde_json::Error),
}

/// Shouts out streamers when a moderator asks for it with `!shoutout <user>` (or `!so`), and
/// automatically when a known streamer chats.
pub struct Shoutout {
    /// Whether the plugin reacts to anything at all.
    enabled: bool,
    /// The `!shoutout` command and its `!so` alias.
    command: BotCommand,
    /// Rate limit for the command.
    cooldown: Mutex<Cooldown>,
    service: Mutex<ShoutoutService>,
}

#[async_trait]
impl Plugin<Context> for Shoutout {
    fn new(ctx: &Context) -> Self {
        let config = ctx.config.shoutout.clone();
        let store = HistoryStore::from_config(&config);
        let history = store.load();

        Self::with_service(ShoutoutService::new(
            config,
            store,
            history,
            Box::new(SystemClock),
        ))
    }

    fn name() -> Name {
        Name::from("shoutout")
    }

    fn author() -> Author {
        Author::from("Mikkel Kroman <mk@maero.dk>")
    }

    fn version() -> Version {
        Version::from("1.0.0")
    }

    async fn handle_message(
        &self,
        _ctx: &Context,
        client: &Client,
        message: &Message,
    ) -> Result<(), PluginError> {
        self.dispatch(client, client.current_nickname(), message)
            .await;

        Ok(())
    }
}

impl Shoutout {
    /// Creates the plugin around an existing service.
    #[must_use]
    pub fn with_service(service: ShoutoutService) -> Self {
        let enabled = service.config().enabled;
        let cooldown = Cooldown::new(service.config().command_cooldown);

        Self {
            enabled,
            command: BotCommand::new("!shoutout").with_alias("!so"),
            cooldown: Mutex::new(cooldown),
            service: Mutex::new(service),
        }
    }

    /// Routes a chat message to the command handler or the auto-shoutout logic.
    ///
    /// `own_nickname` is the bot's current nickname. Returns `true` if a shoutout was sent.
    pub async fn dispatch<S>(&self, sender: &S, own_nickname: &str, message: &Message) -> bool
    where
        S: ChatSender + Sync + ?Sized,
    {
        if !self.enabled {
            return false;
        }

        let Command::PRIVMSG(ref channel, ref text) = message.command else {
            return false;
        };
        let Some(username) = message.source_nickname() else {
            return false;
        };
        let is_self = username.eq_ignore_ascii_case(own_nickname);

        if is_self && self.command.parse(text).is_some() {
            debug!(%username, %channel, "ignoring own shoutout command");

            return false;
        }

        if let Some(args) = self.command.parse(text) {
            return self
                .handle_command(sender, message, channel, username, args)
                .await;
        }

        let event = ChatEvent {
            username,
            display_name: twitch::display_name(message),
            message: text,
            channel,
            is_self,
        };

        self.service
            .lock()
            .await
            .process_incoming_message(sender, &event)
    }

    async fn handle_command<S>(
        &self,
        sender: &S,
        message: &Message,
        channel: &str,
        username: &str,
        args: &str,
    ) -> bool
    where
        S: ChatSender + Sync + ?Sized,
    {
        if !twitch::is_moderator(message, channel) {
            debug!(%username, %channel, "ignoring shoutout command from non-moderator");

            return false;
        }

        if !self.cooldown.lock().await.try_use(Instant::now()) {
            debug!(%username, %channel, command = self.command.name(), "command is on cooldown");

            return false;
        }

        self.service
            .lock()
            .await
            .handle_command(sender, channel, username, args)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tempfile::TempDir;

    use super::testing::{RecordingSender, service_in};
    use super::*;
    use crate::config::ShoutoutConfig;

    fn message(raw: &str) -> Message {
        raw.parse().expect("valid irc message")
    }

    fn plugin(dir: &TempDir, config: ShoutoutConfig) -> Shoutout {
        let (service, clock) = service_in(dir, config);
        clock.set(1_700_000_000_000);

        Shoutout::with_service(service)
    }

    #[tokio::test]
    async fn moderators_can_shout_out() {
        let dir = TempDir::new().unwrap();
        let plugin = plugin(&dir, ShoutoutConfig::default());
        let sender = RecordingSender::default();
        let msg = message("@badges=moderator/1;mod=1 :amod!amod@amod.tmi.twitch.tv PRIVMSG #home :!so @Bar");

        assert!(plugin.dispatch(&sender, "shoutbot", &msg).await);
        assert_eq!(
            sender.messages(),
            vec!["Shoutout to @bar - Thanks for being an awesome part of our community!"]
        );
    }

    #[tokio::test]
    async fn viewers_cannot_shout_out() {
        let dir = TempDir::new().unwrap();
        let plugin = plugin(&dir, ShoutoutConfig::default());
        let sender = RecordingSender::default();
        let msg = message("@badges=;mod=0 :viewer!viewer@viewer.tmi.twitch.tv PRIVMSG #home :!shoutout bar");

        assert!(!plugin.dispatch(&sender, "shoutbot", &msg).await);
        assert!(sender.sent().is_empty());
    }

    #[tokio::test]
    async fn missing_target_replies_with_usage() {
        let dir = TempDir::new().unwrap();
        let plugin = plugin(&dir, ShoutoutConfig::default());
        let sender = RecordingSender::default();
        let msg = message("@badges=broadcaster/1 :home!home@home.tmi.twitch.tv PRIVMSG #home :!shoutout");

        assert!(!plugin.dispatch(&sender, "shoutbot", &msg).await);
        assert_eq!(
            sender.messages(),
            vec!["@home Please specify a username to shout out."]
        );
    }

    #[tokio::test]
    async fn command_is_rate_limited() {
        let dir = TempDir::new().unwrap();
        let config = ShoutoutConfig {
            command_cooldown: Duration::from_secs(3600),
            ..Default::default()
        };
        let plugin = plugin(&dir, config);
        let sender = RecordingSender::default();
        let first = message("@mod=1 :amod!amod@x PRIVMSG #home :!so foo");
        let second = message("@mod=1 :amod!amod@x PRIVMSG #home :!so bar");

        assert!(plugin.dispatch(&sender, "shoutbot", &first).await);
        assert!(!plugin.dispatch(&sender, "shoutbot", &second).await);
        assert_eq!(sender.sent().len(), 1);
    }

    #[tokio::test]
    async fn streamers_are_shouted_out_once_per_cooldown() {
        let dir = TempDir::new().unwrap();
        let plugin = plugin(&dir, ShoutoutConfig::default());
        let sender = RecordingSender::default();
        let msg = message("@display-name=Jynxzi :jynxzi!jynxzi@x PRIVMSG #home :hello chat");

        assert!(plugin.dispatch(&sender, "shoutbot", &msg).await);
        assert!(!plugin.dispatch(&sender, "shoutbot", &msg).await);
        assert_eq!(
            sender.messages(),
            vec!["Check out @Jynxzi over at https://twitch.tv/jynxzi"]
        );
    }

    #[tokio::test]
    async fn own_messages_are_ignored() {
        let dir = TempDir::new().unwrap();
        let plugin = plugin(&dir, ShoutoutConfig::default());
        let sender = RecordingSender::default();
        let msg = message(":Jynxzi!jynxzi@x PRIVMSG #home :hello chat");

        assert!(!plugin.dispatch(&sender, "jynxzi", &msg).await);
        assert!(sender.sent().is_empty());
    }

    #[tokio::test]
    async fn own_commands_are_ignored() {
        let dir = TempDir::new().unwrap();
        let plugin = plugin(&dir, ShoutoutConfig::default());
        let sender = RecordingSender::default();
        let msg = message("@badges=moderator/1;mod=1 :ShoutBot!shoutbot@x PRIVMSG #home :!so foo");

        assert!(!plugin.dispatch(&sender, "shoutbot", &msg).await);
        assert!(sender.sent().is_empty());
    }

    #[tokio::test]
    async fn disabled_plugin_does_nothing() {
        let dir = TempDir::new().unwrap();
        let config = ShoutoutConfig {
            enabled: false,
            ..Default::default()
        };
        let plugin = plugin(&dir, config);
        let sender = RecordingSender::default();
        let command = message("@mod=1 :amod!amod@x PRIVMSG #home :!so foo");
        let chat = message(":jynxzi!jynxzi@x PRIVMSG #home :hello chat");

        assert!(!plugin.dispatch(&sender, "shoutbot", &command).await);
        assert!(!plugin.dispatch(&sender, "shoutbot", &chat).await);
        assert!(sender.sent().is_empty());
    }
}
