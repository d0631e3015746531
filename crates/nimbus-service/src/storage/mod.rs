//! Storage usage services.

pub mod service;

pub use service::{StorageUsage, UsageService};
