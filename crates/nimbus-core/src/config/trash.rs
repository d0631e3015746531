//! Trash lifecycle configuration.

use serde::{Deserialize, Serialize};

/// Retention and purge scheduling for soft-deleted records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrashConfig {
    /// Days a trashed item is kept before the purge sweep removes it.
    #[serde(default = "default_retention_days")]
    pub retention_days: i64,
    /// Cron expression for the purge sweep (seconds-resolution, 6 fields).
    #[serde(default = "default_purge_schedule")]
    pub purge_schedule: String,
}

impl Default for TrashConfig {
    fn default() -> Self {
        Self {
            retention_days: default_retention_days(),
            purge_schedule: default_purge_schedule(),
        }
    }
}

fn default_retention_days() -> i64 {
    30
}

/// Daily at 03:00.
fn default_purge_schedule() -> String {
    "0 0 3 * * *".to_string()
}
