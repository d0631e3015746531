//! Trash services.

pub mod service;

pub use service::{TrashListing, TrashService, TrashedFile, TrashedFolder};
