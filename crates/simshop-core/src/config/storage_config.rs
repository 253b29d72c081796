//! Storage subsystem configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Database file. `None` keeps everything in memory.
    pub path: Option<PathBuf>,
    /// Milliseconds SQLite waits on a locked database before failing.
    pub busy_timeout_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: Some(PathBuf::from("simshop.db")),
            busy_timeout_ms: 5_000,
        }
    }
}

impl StorageConfig {
    pub fn in_memory() -> Self {
        Self {
            path: None,
            ..Self::default()
        }
    }
}
