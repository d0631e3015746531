//! HTTP request handlers, organized by domain.

pub mod drive;
pub mod file;
pub mod folder;
pub mod health;
pub mod search;
pub mod share;
pub mod starred;
pub mod storage;
pub mod trash;
pub mod ws;
