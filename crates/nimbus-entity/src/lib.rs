//! # nimbus-entity
//!
//! Domain entity models for Nimbus Drive. Every struct in this crate
//! represents a metadata-store document or a domain value object. All
//! entities derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and
//! store-backed entities additionally derive `sqlx::FromRow`.

pub mod drive;
pub mod file;
pub mod folder;
pub mod share;
