//! Folder hierarchy services.

pub mod export;
pub mod import;
pub mod service;

pub use export::ExportService;
pub use import::{ConflictAction, ImportService, ImportSummary};
pub use service::FolderService;
