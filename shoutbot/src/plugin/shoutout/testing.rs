//! Test doubles for the shoutout plugin.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use shoutbot_plugin::{ChatSender, Error};
use tempfile::TempDir;

use super::history::HistoryStore;
use super::service::{Clock, ShoutoutService};
use crate::config::ShoutoutConfig;

/// A clock that only moves when told to.
#[derive(Debug, Default, Clone)]
pub struct ManualClock(Arc<AtomicI64>);

impl ManualClock {
    pub fn set(&self, millis: i64) {
        self.0.store(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Records everything sent through it instead of talking to a server.
#[derive(Debug, Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<(String, String)>>,
    fail: bool,
}

impl RecordingSender {
    /// A sender whose every send fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.sent().into_iter().map(|(_, text)| text).collect()
    }
}

impl ChatSender for RecordingSender {
    fn send(&self, channel: &str, text: &str) -> Result<(), Error> {
        if self.fail {
            return Err(Error::plugin("connection closed"));
        }

        self.sent
            .lock()
            .unwrap()
            .push((channel.to_string(), text.to_string()));

        Ok(())
    }
}

/// Returns `config` with its history files moved into `dir`.
pub fn config_in(dir: &TempDir, config: ShoutoutConfig) -> ShoutoutConfig {
    ShoutoutConfig {
        history_path: dir.path().join("config/shoutout-history.json"),
        legacy_history_path: dir.path().join("data/shoutout-history.json"),
        ..config
    }
}

/// Creates a service storing its history in `dir`, along with a handle to its clock.
pub fn service_in(dir: &TempDir, config: ShoutoutConfig) -> (ShoutoutService, ManualClock) {
    let config = config_in(dir, config);
    let clock = ManualClock::default();
    let store = HistoryStore::from_config(&config);
    let history = store.load();

    (
        ShoutoutService::new(config, store, history, Box::new(clock.clone())),
        clock,
    )
}
