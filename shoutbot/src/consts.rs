use std::time::Duration;

/// The hostname of the Twitch chat IRC gateway.
pub const TWITCH_IRC_HOSTNAME: &str = "irc.chat.twitch.tv";

/// Capabilities requested from Twitch chat so messages carry badges and display names.
pub const TWITCH_CAPABILITIES: [&str; 2] = ["twitch.tv/tags", "twitch.tv/commands"];

/// Base URL that a lowercase login is appended to in order to form a channel URL.
pub const PROFILE_BASE_URL: &str = "https://twitch.tv/";

/// The default location of the shoutout history file.
pub const DEFAULT_HISTORY_PATH: &str = "config/shoutout-history.json";

/// The location older releases stored the shoutout history in.
pub const DEFAULT_LEGACY_HISTORY_PATH: &str = "data/shoutout-history.json";

/// The default minimum duration between two invocations of the shoutout command.
pub const DEFAULT_COMMAND_COOLDOWN: Duration = Duration::from_secs(5);

/// The default auto-shoutout cooldown in hours.
pub const DEFAULT_AUTO_COOLDOWN_HOURS: u64 = 24;

/// The default cooldown in minutes, used when no hourly cooldown is configured.
pub const DEFAULT_COOLDOWN_MINUTES: u64 = 60;
