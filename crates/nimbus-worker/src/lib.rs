//! Scheduled background maintenance for Nimbus Drive.
//!
//! This crate provides:
//! - A cron scheduler for periodic maintenance tasks
//! - The trash retention sweep that hard-deletes expired trash

pub mod jobs;
pub mod scheduler;

pub use jobs::{PurgeSummary, TrashPurgeJob};
pub use scheduler::CronScheduler;
