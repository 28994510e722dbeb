//! Configuration loading

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Toml};
use serde::{Deserialize, Serialize};

use crate::Error;
use crate::consts;

/// The prefix of environment variables that override configuration values.
///
/// Nested keys are separated by a double underscore, e.g.
/// `SHOUTBOT_SHOUTOUT__COOLDOWN_MINUTES=30`.
pub const ENV_PREFIX: &str = "SHOUTBOT_";

/// The complete bot configuration.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    /// Tracing configuration
    #[serde(default)]
    pub tracing: TracingConfig,
    /// IRC client configuration
    pub irc: IrcConfig,
    /// Shoutout plugin configuration
    #[serde(default)]
    pub shoutout: ShoutoutConfig,
}

impl Config {
    /// Loads the configuration from the TOML file at `path`, with environment variables taking
    /// precedence.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be parsed or required values are missing.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        Self::figment(path).extract().map_err(|e| Error::Config(Box::new(e)))
    }

    /// Returns the layered configuration sources.
    #[must_use]
    pub fn figment(path: impl AsRef<Path>) -> Figment {
        Figment::new()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct TracingConfig {
    /// Export spans over OTLP.
    #[serde(default)]
    pub enabled: bool,
    /// Format of log lines written to stdout.
    #[serde(default)]
    pub format: LogFormat,
    /// Filter directives used when `RUST_LOG` isn't set, e.g. `shoutbot=info`.
    pub filter: Option<String>,
    /// OTLP/HTTP collector endpoint. The exporter's own default applies when unset.
    pub endpoint: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human readable, multi-line output.
    Pretty,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct IrcTlsConfig {
    /// Enable TLS.
    pub enabled: bool,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct IrcConfig {
    /// The bot's login name.
    pub nickname: String,
    /// The hostname of the server to connect to.
    #[serde(default = "default_irc_hostname")]
    pub hostname: String,
    /// The password to connect to the server, `oauth:<token>` on Twitch.
    pub password: Option<String>,
    /// The port number of the server to connect to.
    pub port: Option<u16>,
    /// TLS configuration.
    pub tls: Option<IrcTlsConfig>,
    /// List of channels to join.
    #[serde(default)]
    pub channels: Vec<String>,
}

impl IrcConfig {
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port.unwrap_or_else(|| self.fallback_port())
    }

    /// Return the port number to use based on whether the connection requires TLS or not.
    fn fallback_port(&self) -> u16 {
        if self.tls.as_ref().map(|tls| tls.enabled) == Some(true) {
            6697
        } else {
            6667
        }
    }
}

impl From<IrcConfig> for irc::client::data::Config {
    fn from(config: IrcConfig) -> Self {
        let port = config.port();
        let use_tls = config.tls.map(|x| x.enabled);

        Self {
            username: Some(config.nickname.clone()),
            nickname: Some(config.nickname),
            password: config.password,
            server: Some(config.hostname),
            port: Some(port),
            use_tls,
            channels: config.channels,
            ..Default::default()
        }
    }
}

/// Automatic shoutout settings.
///
/// The defaults only apply when the whole `[shoutout.auto_shoutout]` table is missing. Inside
/// the table, a missing `cooldown_hours` selects `cooldown_minutes`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct AutoShoutoutConfig {
    /// Shout out known streamers when they chat.
    #[serde(default = "default_auto_shoutout_enabled")]
    pub enabled: bool,
    /// Minimum hours between two auto-shoutouts for the same user. Unset or `0` falls back to
    /// `cooldown_minutes`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooldown_hours: Option<u64>,
}

impl Default for AutoShoutoutConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cooldown_hours: Some(consts::DEFAULT_AUTO_COOLDOWN_HOURS),
        }
    }
}

/// Message templates. Recognized placeholders are `{username}`, `{displayName}`, `{url}` and
/// `{gameInfo}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct MessagesConfig {
    /// Template used for users considered streamers.
    pub streamer: Option<String>,
    /// Template used for everyone else.
    pub non_streamer: Option<String>,
}

/// Settings for the shoutout plugin.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ShoutoutConfig {
    /// Turns the whole plugin on or off.
    pub enabled: bool,
    /// Automatic shoutout settings.
    pub auto_shoutout: AutoShoutoutConfig,
    /// Cooldown used when `auto_shoutout.cooldown_hours` is unset.
    pub cooldown_minutes: u64,
    /// Users that never receive an automatic shoutout.
    pub excluded_users: Vec<String>,
    /// Additional logins that are always treated as streamers.
    pub known_streamers: Vec<String>,
    /// Leading characters that mark a message as a bot command.
    pub command_prefixes: Vec<char>,
    /// Minimum time between two invocations of the shoutout command.
    #[serde(with = "humantime_serde")]
    pub command_cooldown: Duration,
    /// Message templates.
    pub messages: MessagesConfig,
    /// Where the shoutout history is stored.
    pub history_path: PathBuf,
    /// Where older releases stored the shoutout history.
    pub legacy_history_path: PathBuf,
}

impl ShoutoutConfig {
    /// Returns the auto-shoutout cooldown in milliseconds, preferring the hourly setting.
    #[must_use]
    pub fn cooldown_millis(&self) -> i64 {
        let millis = match self.auto_shoutout.cooldown_hours {
            Some(hours) if hours > 0 => hours.saturating_mul(3_600_000),
            _ => self.cooldown_minutes.saturating_mul(60_000),
        };

        i64::try_from(millis).unwrap_or(i64::MAX)
    }
}

impl Default for ShoutoutConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            auto_shoutout: AutoShoutoutConfig::default(),
            cooldown_minutes: consts::DEFAULT_COOLDOWN_MINUTES,
            excluded_users: vec![],
            known_streamers: vec![],
            command_prefixes: vec!['!', '?'],
            command_cooldown: consts::DEFAULT_COMMAND_COOLDOWN,
            messages: MessagesConfig::default(),
            history_path: PathBuf::from(consts::DEFAULT_HISTORY_PATH),
            legacy_history_path: PathBuf::from(consts::DEFAULT_LEGACY_HISTORY_PATH),
        }
    }
}

#[must_use]
pub fn default_irc_hostname() -> String {
    consts::TWITCH_IRC_HOSTNAME.to_string()
}

const fn default_auto_shoutout_enabled() -> bool {
    true
}
