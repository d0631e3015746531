//! Shared-drive services.

pub mod service;

pub use service::DriveService;
