//! Built-in scheduled job implementations.

pub mod trash_purge;

pub use trash_purge::{PurgeSummary, TrashPurgeJob};
