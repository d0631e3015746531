//! Request extractors.

pub mod auth;
pub mod scope;

pub use auth::AuthUser;
pub use scope::ScopeQuery;
