//! Trash lifecycle: soft delete, listing, restore, permanent removal.
//!
//! Trashing a folder cascades over its whole subtree with one timestamp,
//! and restoring cascades back, so a folder and its contents always move
//! through the trash together. The listing shows only cascade roots: an
//! item whose container is itself trashed is represented by that
//! container.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use nimbus_core::config::trash::TrashConfig;
use nimbus_core::error::AppError;
use nimbus_core::path;
use nimbus_core::result::AppResult;
use nimbus_core::traits::blob::BlobStore;
use nimbus_database::{FileStore, FolderStore};
use nimbus_entity::file::File;
use nimbus_entity::folder::Folder;

use crate::access::AccessControl;
use crate::context::RequestContext;

/// A trashed folder with its remaining lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrashedFolder {
    /// The trashed folder record.
    #[serde(flatten)]
    pub folder: Folder,
    /// Days until the purge sweep removes it.
    pub days_remaining: i64,
}

/// A trashed file with its remaining lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrashedFile {
    /// The trashed file record.
    #[serde(flatten)]
    pub file: File,
    /// Days until the purge sweep removes it.
    pub days_remaining: i64,
}

/// The contents of a user's trash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrashListing {
    /// Trashed folders (cascade roots only).
    pub folders: Vec<TrashedFolder>,
    /// Trashed files (cascade roots only).
    pub files: Vec<TrashedFile>,
}

/// Manages the trash.
#[derive(Debug, Clone)]
pub struct TrashService {
    folders: Arc<dyn FolderStore>,
    files: Arc<dyn FileStore>,
    blobs: Arc<dyn BlobStore>,
    access: AccessControl,
    config: TrashConfig,
}

impl TrashService {
    /// Creates a new trash service.
    pub fn new(
        folders: Arc<dyn FolderStore>,
        files: Arc<dyn FileStore>,
        blobs: Arc<dyn BlobStore>,
        access: AccessControl,
        config: TrashConfig,
    ) -> Self {
        Self {
            folders,
            files,
            blobs,
            access,
            config,
        }
    }

    /// Moves a folder and its whole subtree to the trash.
    pub async fn trash_folder(&self, ctx: &RequestContext, folder_id: Uuid) -> AppResult<Folder> {
        let mut folder = self
            .folders
            .find_by_id(folder_id)
            .await?
            .filter(|f| !f.is_deleted)
            .ok_or_else(|| AppError::not_found("Folder not found"))?;
        let scope = folder.scope();
        self.access.require_write(ctx, &scope).await?;

        let deleted_at = Utc::now();
        folder.is_deleted = true;
        folder.deleted_at = Some(deleted_at);
        let folder = self.folders.update(&folder).await?;

        let full_path = folder.full_path();
        self.folders
            .mark_descendants_deleted(&scope, &full_path, deleted_at)
            .await?;
        self.files
            .mark_descendants_deleted(&scope, &full_path, deleted_at)
            .await?;

        info!(user_id = %ctx.user_id, folder_id = %folder_id, path = %full_path, "Folder trashed");
        Ok(folder)
    }

    /// Moves a single file to the trash.
    pub async fn trash_file(&self, ctx: &RequestContext, file_id: Uuid) -> AppResult<File> {
        let mut file = self
            .files
            .find_by_id(file_id)
            .await?
            .filter(|f| !f.is_deleted)
            .ok_or_else(|| AppError::not_found("File not found"))?;
        self.access.require_write(ctx, &file.scope()).await?;

        file.is_deleted = true;
        file.deleted_at = Some(Utc::now());
        let file = self.files.update(&file).await?;

        info!(user_id = %ctx.user_id, file_id = %file_id, "File trashed");
        Ok(file)
    }

    /// Lists the requester's trash, cascade roots only, with remaining
    /// lifetimes.
    pub async fn list(&self, ctx: &RequestContext) -> AppResult<TrashListing> {
        let folders = self.folders.list_deleted(ctx.user_id).await?;
        let files = self.files.list_deleted(ctx.user_id).await?;
        let now = ctx.request_time;

        let trashed_paths: Vec<String> = folders.iter().map(|f| f.full_path()).collect();
        let under_trashed = |container: &str| {
            trashed_paths
                .iter()
                .any(|p| path::is_descendant_or_self(container, p))
        };

        let root_folders = folders
            .iter()
            .filter(|f| !under_trashed(&f.parent_path))
            .map(|f| TrashedFolder {
                folder: f.clone(),
                days_remaining: self.days_remaining(f.deleted_at, now),
            })
            .collect();
        let root_files = files
            .iter()
            .filter(|f| !under_trashed(&f.folder_path))
            .map(|f| TrashedFile {
                file: f.clone(),
                days_remaining: self.days_remaining(f.deleted_at, now),
            })
            .collect();

        Ok(TrashListing {
            folders: root_folders,
            files: root_files,
        })
    }

    /// Restores a trashed folder and its whole subtree, in place.
    pub async fn restore_folder(&self, ctx: &RequestContext, folder_id: Uuid) -> AppResult<Folder> {
        let mut folder = self
            .folders
            .find_by_id(folder_id)
            .await?
            .filter(|f| f.is_deleted)
            .ok_or_else(|| AppError::not_found("Trashed folder not found"))?;
        let scope = folder.scope();
        self.access.require_write(ctx, &scope).await?;

        folder.is_deleted = false;
        folder.deleted_at = None;
        let folder = self.folders.update(&folder).await?;

        let full_path = folder.full_path();
        self.folders.restore_descendants(&scope, &full_path).await?;
        self.files.restore_descendants(&scope, &full_path).await?;

        info!(user_id = %ctx.user_id, folder_id = %folder_id, path = %full_path, "Folder restored");
        Ok(folder)
    }

    /// Restores a single trashed file, in place.
    pub async fn restore_file(&self, ctx: &RequestContext, file_id: Uuid) -> AppResult<File> {
        let mut file = self
            .files
            .find_by_id(file_id)
            .await?
            .filter(|f| f.is_deleted)
            .ok_or_else(|| AppError::not_found("Trashed file not found"))?;
        self.access.require_write(ctx, &file.scope()).await?;

        file.is_deleted = false;
        file.deleted_at = None;
        let file = self.files.update(&file).await?;

        info!(user_id = %ctx.user_id, file_id = %file_id, "File restored");
        Ok(file)
    }

    /// Permanently removes a trashed file: blob first (best-effort), then
    /// the record.
    pub async fn delete_file_permanently(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
    ) -> AppResult<()> {
        let file = self
            .files
            .find_by_id(file_id)
            .await?
            .filter(|f| f.is_deleted)
            .ok_or_else(|| AppError::not_found("Trashed file not found"))?;
        self.access.require_write(ctx, &file.scope()).await?;

        if let Err(e) = self.blobs.delete(&file.blob_key).await {
            warn!(blob_key = %file.blob_key, error = %e, "Blob delete failed, continuing");
        }
        self.files.delete_by_id(file.id).await?;

        info!(user_id = %ctx.user_id, file_id = %file_id, "File permanently deleted");
        Ok(())
    }

    /// Permanently removes a trashed folder and everything beneath it.
    pub async fn delete_folder_permanently(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
    ) -> AppResult<()> {
        let folder = self
            .folders
            .find_by_id(folder_id)
            .await?
            .filter(|f| f.is_deleted)
            .ok_or_else(|| AppError::not_found("Trashed folder not found"))?;
        let scope = folder.scope();
        self.access.require_write(ctx, &scope).await?;

        let full_path = folder.full_path();
        let files = self
            .files
            .find_descendants(&scope, &full_path, nimbus_core::types::DeletedFilter::Any)
            .await?;
        for file in &files {
            if let Err(e) = self.blobs.delete(&file.blob_key).await {
                warn!(blob_key = %file.blob_key, error = %e, "Blob delete failed, continuing");
            }
        }
        self.files.delete_descendants(&scope, &full_path).await?;
        self.folders.delete_descendants(&scope, &full_path).await?;
        self.folders.delete_by_id(folder.id).await?;

        info!(
            user_id = %ctx.user_id,
            folder_id = %folder_id,
            path = %full_path,
            "Folder permanently deleted from trash"
        );
        Ok(())
    }

    /// Empties the requester's trash.
    pub async fn empty(&self, ctx: &RequestContext) -> AppResult<u64> {
        let files = self.files.list_deleted(ctx.user_id).await?;
        for file in &files {
            if let Err(e) = self.blobs.delete(&file.blob_key).await {
                warn!(blob_key = %file.blob_key, error = %e, "Blob delete failed, continuing");
            }
        }
        let removed_files = self.files.delete_deleted(ctx.user_id).await?;
        let removed_folders = self.folders.delete_deleted(ctx.user_id).await?;

        info!(
            user_id = %ctx.user_id,
            files = removed_files,
            folders = removed_folders,
            "Trash emptied"
        );
        Ok(removed_files + removed_folders)
    }

    fn days_remaining(&self, deleted_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> i64 {
        let Some(deleted_at) = deleted_at else {
            return self.config.retention_days;
        };
        let elapsed = (now - deleted_at).num_days();
        (self.config.retention_days - elapsed).max(0)
    }
}
