use shoutbot_plugin::ChatSender;
use time::OffsetDateTime;
use tracing::{debug, error, info};

use super::history::{History, HistoryStore, ShoutoutRecord, profile_url};
use super::template::{self, Fields};
use crate::config::ShoutoutConfig;

/// Logins that are always considered streamers.
pub const KNOWN_STREAMERS: [&str; 5] = ["maxthriller", "cergttv", "jynxzi", "zackrawrr", "nexusrift_"];

/// Used when `messages.streamer` isn't configured.
pub const STREAMER_TEMPLATE: &str = "Check out @{displayName} over at {url}";

/// Used when `messages.non_streamer` isn't configured.
pub const NON_STREAMER_TEMPLATE: &str =
    "Shoutout to @{displayName} - Thanks for being an awesome part of our community!";

/// `{gameInfo}` for users without a known game.
pub const DEFAULT_GAME_INFO: &str = "they're an awesome streamer";

/// Source of the current time, in milliseconds since the unix epoch.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now_millis(&self) -> i64;
}

/// The system wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;

        i64::try_from(millis).unwrap_or(i64::MAX)
    }
}

/// A chat message as seen by the auto-shoutout logic.
#[derive(Debug, Clone, Copy)]
pub struct ChatEvent<'a> {
    /// The sender's login.
    pub username: &'a str,
    /// The sender's display name, if the server sent one.
    pub display_name: Option<&'a str>,
    /// The message text.
    pub message: &'a str,
    /// The channel the message was sent to.
    pub channel: &'a str,
    /// Whether the bot sent the message itself.
    pub is_self: bool,
}

/// The outcome of evaluating a chat message for an auto-shoutout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Auto-shoutouts are turned off.
    Disabled,
    /// The message is a command.
    Command,
    /// The bot sent the message.
    OwnMessage,
    /// The sender is on the exclusion list.
    Excluded,
    /// The sender isn't considered a streamer.
    NotStreamer,
    /// The sender was shouted out too recently.
    Cooldown {
        /// Milliseconds until the sender is eligible again.
        remaining_ms: i64,
    },
    /// The sender should be shouted out.
    Shoutout,
}

/// Decides when to shout someone out, sends the message and keeps the history.
pub struct ShoutoutService {
    config: ShoutoutConfig,
    store: HistoryStore,
    history: History,
    clock: Box<dyn Clock>,
}

impl ShoutoutService {
    /// Creates a new service with an already loaded `history`.
    #[must_use]
    pub fn new(
        config: ShoutoutConfig,
        store: HistoryStore,
        history: History,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            config,
            store,
            history,
            clock,
        }
    }

    /// Returns the shoutout history.
    #[must_use]
    pub const fn history(&self) -> &History {
        &self.history
    }

    /// Returns the plugin configuration.
    #[must_use]
    pub const fn config(&self) -> &ShoutoutConfig {
        &self.config
    }

    /// Returns `true` if `username` is believed to be a streamer.
    ///
    /// This is a heuristic: users with a known game and a fixed set of logins count as
    /// streamers.
    #[must_use]
    pub fn is_streamer(&self, username: &str) -> bool {
        if self
            .history
            .get(username)
            .and_then(ShoutoutRecord::game)
            .is_some()
        {
            return true;
        }

        KNOWN_STREAMERS
            .iter()
            .copied()
            .chain(self.config.known_streamers.iter().map(String::as_str))
            .any(|known| known.eq_ignore_ascii_case(username))
    }

    /// Returns the `{gameInfo}` text for `username`.
    #[must_use]
    pub fn game_info(&self, username: &str) -> String {
        self.history
            .get(username)
            .and_then(ShoutoutRecord::game)
            .map_or_else(
                || DEFAULT_GAME_INFO.to_string(),
                |game| format!("currently playing {game}"),
            )
    }

    /// Decides whether `event` should trigger an automatic shoutout.
    #[must_use]
    pub fn evaluate(&self, event: &ChatEvent<'_>) -> Decision {
        if !self.config.auto_shoutout.enabled {
            return Decision::Disabled;
        }

        if event
            .message
            .starts_with(self.config.command_prefixes.as_slice())
        {
            return Decision::Command;
        }

        if event.is_self {
            return Decision::OwnMessage;
        }

        if self
            .config
            .excluded_users
            .iter()
            .any(|user| user.eq_ignore_ascii_case(event.username))
        {
            return Decision::Excluded;
        }

        if !self.is_streamer(event.username) {
            return Decision::NotStreamer;
        }

        // A missing record, or one that only carries a game, has never been shouted out.
        let Some(last_shoutout) = self
            .history
            .get(event.username)
            .map(|record| record.last_shoutout)
            .filter(|&last_shoutout| last_shoutout > 0)
        else {
            return Decision::Shoutout;
        };
        let elapsed = self.clock.now_millis().saturating_sub(last_shoutout);
        let cooldown = self.config.cooldown_millis();

        if elapsed >= cooldown {
            Decision::Shoutout
        } else {
            Decision::Cooldown {
                remaining_ms: cooldown.saturating_sub(elapsed),
            }
        }
    }

    /// Shouts out the sender of `event` if [`evaluate`](Self::evaluate) says so.
    ///
    /// Returns `true` if a shoutout was sent.
    pub fn process_incoming_message<S>(&mut self, sender: &S, event: &ChatEvent<'_>) -> bool
    where
        S: ChatSender + ?Sized,
    {
        match self.evaluate(event) {
            Decision::Shoutout => {
                let name = event.display_name.unwrap_or(event.username);

                self.do_shoutout(sender, event.channel, name)
            }
            decision => {
                debug!(username = %event.username, ?decision, "skipping auto-shoutout");

                false
            }
        }
    }

    /// Sends a shoutout for `username` to `channel` and records it.
    ///
    /// Returns `false` if the message could not be sent.
    pub fn do_shoutout<S>(&mut self, sender: &S, channel: &str, username: &str) -> bool
    where
        S: ChatSender + ?Sized,
    {
        let login = username.to_lowercase();
        info!(%login, %channel, "shouting out");

        let template = if self.is_streamer(&login) {
            self.config
                .messages
                .streamer
                .as_deref()
                .unwrap_or(STREAMER_TEMPLATE)
        } else {
            self.config
                .messages
                .non_streamer
                .as_deref()
                .unwrap_or(NON_STREAMER_TEMPLATE)
        };
        let display_name = self
            .history
            .get(&login)
            .map(|record| record.display_name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(username);
        let url = profile_url(&login);
        let game_info = self.game_info(&login);
        let message = template::render(
            template,
            &Fields {
                username: &login,
                display_name,
                url: &url,
                game_info: &game_info,
            },
        );

        if let Err(err) = sender.send(channel, &message) {
            error!(?err, %login, %channel, "could not send shoutout");

            return false;
        }

        self.record_shoutout(username);

        true
    }

    /// Handles the arguments of a shoutout command issued by `invoker`.
    ///
    /// Returns `false` if no target was given or the shoutout couldn't be sent.
    pub fn handle_command<S>(&mut self, sender: &S, channel: &str, invoker: &str, args: &str) -> bool
    where
        S: ChatSender + ?Sized,
    {
        let Some(target) = parse_target(args) else {
            let usage = format!("@{invoker} Please specify a username to shout out.");

            if let Err(err) = sender.send(channel, &usage) {
                error!(?err, %channel, "could not send usage reply");
            }

            return false;
        };

        self.do_shoutout(sender, channel, &target)
    }

    /// Records a shoutout for `username` at the current time and saves the history.
    pub fn record_shoutout(&mut self, username: &str) {
        let now = self.clock.now_millis();
        let record = self
            .history
            .entry_or_insert_with(username, || ShoutoutRecord::new(username, now));

        record.last_shoutout = now;

        if record.display_name.is_empty() {
            record.display_name = username.to_string();
        }

        if record.url.is_empty() {
            record.url = profile_url(username);
        }

        self.save();
    }

    /// Sets the game `username` is known for, creating a record if needed.
    ///
    /// A new record has never been shouted out, so it doesn't delay the first auto-shoutout.
    pub fn set_game(&mut self, username: &str, game: impl Into<String>) {
        let record = self
            .history
            .entry_or_insert_with(username, || ShoutoutRecord::new(username, 0));

        record.game = Some(game.into());

        self.save();
    }

    fn save(&self) {
        if let Err(err) = self.store.save(&self.history) {
            error!(?err, path = %self.store.path().display(), "could not save shoutout history");
        }
    }
}

/// Extracts the target login from the arguments of a shoutout command.
#[must_use]
pub fn parse_target(args: &str) -> Option<String> {
    args.split_whitespace()
        .next()
        .map(|target| target.strip_prefix('@').unwrap_or(target))
        .filter(|target| !target.is_empty())
        .map(str::to_lowercase)
}
