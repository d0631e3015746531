//! Starring files and folders.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use nimbus_core::error::AppError;
use nimbus_core::result::AppResult;
use nimbus_database::{FileStore, FolderStore};
use nimbus_entity::file::File;
use nimbus_entity::folder::Folder;

use crate::access::AccessControl;
use crate::context::RequestContext;

/// A user's starred items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StarredListing {
    /// Starred live folders.
    pub folders: Vec<Folder>,
    /// Starred live files.
    pub files: Vec<File>,
}

/// Manages the starred flag.
#[derive(Debug, Clone)]
pub struct StarredService {
    folders: Arc<dyn FolderStore>,
    files: Arc<dyn FileStore>,
    access: AccessControl,
}

impl StarredService {
    /// Creates a new starred service.
    pub fn new(
        folders: Arc<dyn FolderStore>,
        files: Arc<dyn FileStore>,
        access: AccessControl,
    ) -> Self {
        Self {
            folders,
            files,
            access,
        }
    }

    /// Flips a folder's starred flag; returns the new state.
    pub async fn toggle_folder(&self, ctx: &RequestContext, folder_id: Uuid) -> AppResult<bool> {
        let mut folder = self
            .folders
            .find_by_id(folder_id)
            .await?
            .filter(|f| !f.is_deleted)
            .ok_or_else(|| AppError::not_found("Folder not found"))?;
        self.access.require_write(ctx, &folder.scope()).await?;
        folder.is_starred = !folder.is_starred;
        let folder = self.folders.update(&folder).await?;
        info!(user_id = %ctx.user_id, folder_id = %folder_id, starred = folder.is_starred, "Folder star toggled");
        Ok(folder.is_starred)
    }

    /// Flips a file's starred flag; returns the new state.
    pub async fn toggle_file(&self, ctx: &RequestContext, file_id: Uuid) -> AppResult<bool> {
        let mut file = self
            .files
            .find_by_id(file_id)
            .await?
            .filter(|f| !f.is_deleted)
            .ok_or_else(|| AppError::not_found("File not found"))?;
        self.access.require_write(ctx, &file.scope()).await?;
        file.is_starred = !file.is_starred;
        let file = self.files.update(&file).await?;
        info!(user_id = %ctx.user_id, file_id = %file_id, starred = file.is_starred, "File star toggled");
        Ok(file.is_starred)
    }

    /// The requester's starred folders and files.
    pub async fn list(&self, ctx: &RequestContext) -> AppResult<StarredListing> {
        Ok(StarredListing {
            folders: self.folders.list_starred(ctx.user_id).await?,
            files: self.files.list_starred(ctx.user_id).await?,
        })
    }
}
