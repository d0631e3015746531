//! Shared domain types.

pub mod scope;

pub use scope::{DeletedFilter, OwnerScope};
