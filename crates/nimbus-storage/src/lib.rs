//! # nimbus-storage
//!
//! Blob store backends for Nimbus Drive: an S3-compatible object store
//! for production and an in-memory store for development and tests.

pub mod keys;
pub mod providers;

pub use providers::{MemoryBlobStore, S3BlobStore};
