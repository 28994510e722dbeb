//! Persisted shoutout history

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use super::Error;
use crate::config::ShoutoutConfig;
use crate::consts::PROFILE_BASE_URL;

/// Returns the canonical channel URL for `username`.
#[must_use]
pub fn profile_url(username: &str) -> String {
    format!("{PROFILE_BASE_URL}{}", username.to_lowercase())
}

/// What we know about a user we have shouted out.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoutoutRecord {
    /// The username as it was first observed.
    #[serde(default)]
    pub display_name: String,
    /// When the user was last shouted out, in milliseconds since the unix epoch.
    pub last_shoutout: i64,
    /// The user's channel URL.
    #[serde(default)]
    pub url: String,
    /// The last known game or category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game: Option<String>,
}

impl ShoutoutRecord {
    /// Creates a record for a user seen for the first time.
    #[must_use]
    pub fn new(display_name: &str, last_shoutout: i64) -> Self {
        Self {
            display_name: display_name.to_string(),
            last_shoutout,
            url: profile_url(display_name),
            game: None,
        }
    }

    /// Returns the game, unless it's missing or blank.
    #[must_use]
    pub fn game(&self) -> Option<&str> {
        self.game.as_deref().filter(|game| !game.is_empty())
    }
}

/// Shoutout records keyed by lowercase username.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(
    from = "BTreeMap<String, ShoutoutRecord>",
    into = "BTreeMap<String, ShoutoutRecord>"
)]
pub struct History(BTreeMap<String, ShoutoutRecord>);

impl History {
    /// Returns the record for `username`, ignoring case.
    #[must_use]
    pub fn get(&self, username: &str) -> Option<&ShoutoutRecord> {
        self.0.get(&username.to_lowercase())
    }

    /// Returns the record for `username`, ignoring case.
    pub fn get_mut(&mut self, username: &str) -> Option<&mut ShoutoutRecord> {
        self.0.get_mut(&username.to_lowercase())
    }

    /// Returns the record for `username`, inserting the result of `default` if missing.
    pub fn entry_or_insert_with(
        &mut self,
        username: &str,
        default: impl FnOnce() -> ShoutoutRecord,
    ) -> &mut ShoutoutRecord {
        self.0.entry(username.to_lowercase()).or_insert_with(default)
    }

    /// Returns the number of users in the history.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if nobody has been shouted out yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(username, record)` pairs in username order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ShoutoutRecord)> {
        self.0.iter()
    }
}

impl FromIterator<(String, ShoutoutRecord)> for History {
    fn from_iter<T: IntoIterator<Item = (String, ShoutoutRecord)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(username, record)| (username.to_lowercase(), record))
                .collect(),
        )
    }
}

impl From<BTreeMap<String, ShoutoutRecord>> for History {
    fn from(records: BTreeMap<String, ShoutoutRecord>) -> Self {
        records.into_iter().collect()
    }
}

impl From<History> for BTreeMap<String, ShoutoutRecord> {
    fn from(history: History) -> Self {
        history.0
    }
}

/// An entry of a history file written by older releases.
///
/// The oldest files only kept the timestamp of the last shoutout.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LegacyEntry {
    /// Milliseconds since the unix epoch.
    Timestamp(i64),
    /// An entry already in the current shape.
    Record(ShoutoutRecord),
}

/// Converts a legacy entry for `username` to the current record shape.
#[must_use]
pub fn migrate_entry(username: &str, entry: LegacyEntry) -> ShoutoutRecord {
    match entry {
        LegacyEntry::Timestamp(last_shoutout) => ShoutoutRecord::new(username, last_shoutout),
        LegacyEntry::Record(record) => record,
    }
}

/// Where the history was loaded from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Source {
    /// The current history file.
    Primary,
    /// The legacy history file, which has since been migrated.
    Legacy,
    /// Neither file exists.
    Empty,
}

/// Reads and writes the history file.
#[derive(Clone, Debug)]
pub struct HistoryStore {
    path: PathBuf,
    legacy_path: PathBuf,
}

impl HistoryStore {
    /// Creates a store backed by `path`, migrating from `legacy_path` when `path` doesn't exist.
    pub fn new(path: impl Into<PathBuf>, legacy_path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            legacy_path: legacy_path.into(),
        }
    }

    /// Creates a store using the paths from the plugin configuration.
    #[must_use]
    pub fn from_config(config: &ShoutoutConfig) -> Self {
        Self::new(&config.history_path, &config.legacy_history_path)
    }

    /// Returns the path of the current history file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the history, returning an empty one if it's missing or unreadable.
    #[must_use]
    pub fn load(&self) -> History {
        match self.try_load() {
            Ok((history, source)) => {
                info!(users = history.len(), ?source, "loaded shoutout history");

                history
            }
            Err(err) => {
                error!(?err, "could not load shoutout history, starting fresh");

                History::default()
            }
        }
    }

    /// Loads the history, migrating the legacy file to the current location if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if a history file exists but can't be read or parsed.
    pub fn try_load(&self) -> Result<(History, Source), Error> {
        if let Some(history) = read_json::<History>(&self.path)? {
            return Ok((history, Source::Primary));
        }

        let Some(legacy) = read_json::<BTreeMap<String, LegacyEntry>>(&self.legacy_path)? else {
            debug!(path = %self.path.display(), "no shoutout history found");

            return Ok((History::default(), Source::Empty));
        };

        info!(
            path = %self.legacy_path.display(),
            "converting shoutout history from legacy location"
        );

        let history: History = legacy
            .into_iter()
            .map(|(username, entry)| {
                let record = migrate_entry(&username, entry);

                (username, record)
            })
            .collect();

        // The legacy file is left in place; the primary file takes precedence from now on.
        if let Err(err) = self.save(&history) {
            error!(?err, "could not save migrated shoutout history");
        }

        Ok((history, Source::Legacy))
    }

    /// Overwrites the history file with `history`, creating its directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file can't be written.
    pub fn save(&self, history: &History) -> Result<(), Error> {
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| Error::WriteHistory {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let json = serde_json::to_string_pretty(history).map_err(Error::SerializeHistory)?;

        fs::write(&self.path, json).map_err(|source| Error::WriteHistory {
            path: self.path.clone(),
            source,
        })?;

        debug!(users = history.len(), path = %self.path.display(), "saved shoutout history");

        Ok(())
    }
}

/// Reads and parses the JSON file at `path`, returning `None` if it doesn't exist.
fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Option<T>, Error> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(Error::ReadHistory {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let de = &mut serde_json::Deserializer::from_str(&data);
    let value = serde_path_to_error::deserialize(de).map_err(|source| Error::ParseHistory {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(Some(value))
}
