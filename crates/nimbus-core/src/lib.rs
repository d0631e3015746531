//! # nimbus-core
//!
//! Core crate for Nimbus Drive. Contains the materialized-path model,
//! configuration schemas, collaborator traits, domain events, shared
//! types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Nimbus crates.

pub mod config;
pub mod error;
pub mod events;
pub mod path;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
