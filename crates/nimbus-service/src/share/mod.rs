//! Sharing services.

pub mod link;
pub mod service;

pub use link::LinkService;
pub use service::{ShareAccess, ShareService, SharedItem};
