//! # nimbus-database
//!
//! Store traits for the Nimbus Drive hierarchy engine plus the two
//! concrete backends: PostgreSQL repositories and in-memory stores used
//! for development and tests.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod prefix;
pub mod repositories;
pub mod store;

pub use connection::connect;
pub use store::{DriveStore, FileStore, FolderStore, MimeUsage, ShareStore};
