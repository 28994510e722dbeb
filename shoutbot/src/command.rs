//! User command parsing

use std::time::{Duration, Instant};

/// Simple prefix command parser.
///
/// This is useful when you want to extract a command and some arguments from a users message.
/// A command can be known under several names, e.g. `!shoutout` and its alias `!so`.
///
/// # Example
///
/// ```rust
/// use shoutbot::command::Command;
/// let command = Command::new("!shoutout").with_alias("!so");
/// assert_eq!(command.parse("!shoutout"), Some(""));
/// assert_eq!(command.parse("!so @someone"), Some("@someone"));
/// assert_eq!(command.parse("!shoutouts someone"), None);
/// assert_eq!(command.parse("!hello someone"), None);
/// ```
#[derive(Debug, Clone)]
pub struct Command {
    /// The prefixes to match against, the primary name first.
    prefixes: Vec<String>,
}

impl Command {
    /// Creates a new prefix command parser that expects the given prefix.
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        Self {
            prefixes: vec![prefix.to_string()],
        }
    }

    /// Adds an alternative prefix that the command also answers to.
    #[must_use]
    pub fn with_alias(mut self, alias: &str) -> Self {
        self.prefixes.push(alias.to_string());
        self
    }

    /// Returns the primary name of the command.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.prefixes[0]
    }

    /// Checks if the supplied input starts with one of the command prefixes, and if so, returns a
    /// string slice that makes up the arguments, if any.
    #[must_use]
    pub fn parse<'a>(&self, input: &'a str) -> Option<&'a str> {
        self.prefixes
            .iter()
            .find_map(|prefix| parse_prefix(prefix, input))
    }
}

fn parse_prefix<'a>(prefix: &str, input: &'a str) -> Option<&'a str> {
    let suffix = input.strip_prefix(prefix)?;

    match suffix.chars().next() {
        // The proceeding character is a whitespace, so we return a slice skipping it
        Some(c) if c.is_whitespace() => Some(&suffix[c.len_utf8()..]),
        // There's a proceeding character and it's not whitespace, so it's most likely part
        // of a word and thus is longer than our command prefix.
        Some(_) => None,
        // The input is identical to the command prefix, so return an empty string.
        None => Some(""),
    }
}

/// Rate limit for a single command, shared by everyone invoking it.
#[derive(Debug)]
pub struct Cooldown {
    duration: Duration,
    last_use: Option<Instant>,
}

impl Cooldown {
    /// Creates a cooldown that allows one use per `duration`.
    #[must_use]
    pub const fn new(duration: Duration) -> Self {
        Self {
            duration,
            last_use: None,
        }
    }

    /// Returns `true` and starts a new cooldown period if the command may be used at `now`.
    pub fn try_use(&mut self, now: Instant) -> bool {
        match self.last_use {
            Some(last_use) if now.saturating_duration_since(last_use) < self.duration => false,
            _ => {
                self.last_use = Some(now);
                true
            }
        }
    }
}
