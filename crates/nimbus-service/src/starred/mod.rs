//! Starred-item services.

pub mod service;

pub use service::{StarredListing, StarredService};
