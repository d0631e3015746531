//! # nimbus-api
//!
//! HTTP API layer for Nimbus Drive built on Axum.
//!
//! Provides all REST endpoints, the WebSocket event stream, extractors,
//! DTOs, and error mapping.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
