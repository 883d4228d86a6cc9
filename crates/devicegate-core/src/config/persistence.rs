//! Session snapshot configuration.

use serde::{Deserialize, Serialize};

/// Controls whether active sessions survive a restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Whether snapshots are written and restored.
    #[serde(default)]
    pub enabled: bool,
    /// Path of the JSON snapshot file.
    #[serde(default = "default_path")]
    pub path: String,
    /// How often the store is checked for changes, in seconds.
    #[serde(default = "default_flush_interval")]
    pub flush_interval_seconds: u64,
    /// Refuse new sessions while snapshot writes are failing.
    #[serde(default = "default_true")]
    pub fail_closed: bool,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_path(),
            flush_interval_seconds: default_flush_interval(),
            fail_closed: true,
        }
    }
}

fn default_path() -> String {
    "data/sessions.json".to_string()
}

fn default_flush_interval() -> u64 {
    5
}

fn default_true() -> bool {
    true
}
