//! Application state shared across all handlers.

use std::sync::Arc;

use nimbus_core::config::AppConfig;
use nimbus_realtime::EventHub;
use nimbus_service::{
    DriveService, ExportService, FileService, FolderService, ImportService, SearchService,
    ShareService, StarredService, TrashService, UsageService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,

    /// Realtime event hub
    pub hub: Arc<EventHub>,

    /// Folder service
    pub folder_service: Arc<FolderService>,
    /// File service
    pub file_service: Arc<FileService>,
    /// Zip import service
    pub import_service: Arc<ImportService>,
    /// Zip export service
    pub export_service: Arc<ExportService>,
    /// Trash service
    pub trash_service: Arc<TrashService>,
    /// Share service
    pub share_service: Arc<ShareService>,
    /// Shared-drive service
    pub drive_service: Arc<DriveService>,
    /// Storage usage service
    pub usage_service: Arc<UsageService>,
    /// Starred-items service
    pub starred_service: Arc<StarredService>,
    /// Search service
    pub search_service: Arc<SearchService>,
}
