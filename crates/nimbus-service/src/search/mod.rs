//! Search services.

pub mod service;

pub use service::{SearchResults, SearchService};
