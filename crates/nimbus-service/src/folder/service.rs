//! Folder hierarchy operations.
//!
//! The hierarchy is a materialized path: structural operations rewrite
//! the `parent_path` / `folder_path` strings of an entire subtree with a
//! boundary-exact prefix substitution. The substitution is idempotent, so
//! a retried move or rename converges instead of corrupting paths.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use nimbus_core::error::AppError;
use nimbus_core::events::DomainEvent;
use nimbus_core::path;
use nimbus_core::result::AppResult;
use nimbus_core::traits::blob::BlobStore;
use nimbus_core::traits::publisher::EventPublisher;
use nimbus_core::types::{DeletedFilter, OwnerScope};
use nimbus_database::{FileStore, FolderStore};
use nimbus_entity::folder::Folder;

use crate::access::AccessControl;
use crate::context::RequestContext;

/// Manages the folder hierarchy.
#[derive(Debug, Clone)]
pub struct FolderService {
    folders: Arc<dyn FolderStore>,
    files: Arc<dyn FileStore>,
    blobs: Arc<dyn BlobStore>,
    access: AccessControl,
    publisher: Arc<dyn EventPublisher>,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(
        folders: Arc<dyn FolderStore>,
        files: Arc<dyn FileStore>,
        blobs: Arc<dyn BlobStore>,
        access: AccessControl,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            folders,
            files,
            blobs,
            access,
            publisher,
        }
    }

    /// Gets a folder by id, enforcing scope access. Trashed folders are
    /// not found through this path.
    pub async fn get(&self, ctx: &RequestContext, folder_id: Uuid) -> AppResult<Folder> {
        let folder = self
            .folders
            .find_by_id(folder_id)
            .await?
            .filter(|f| !f.is_deleted)
            .ok_or_else(|| AppError::not_found("Folder not found"))?;
        self.access.require_read(ctx, &folder.scope()).await?;
        Ok(folder)
    }

    /// Lists the live folders directly under `parent_path`.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        scope: &OwnerScope,
        parent_path: &str,
    ) -> AppResult<Vec<Folder>> {
        self.access.require_read(ctx, scope).await?;
        let parent_path = path::normalize(parent_path);
        self.folders.list_children(scope, &parent_path).await
    }

    /// Whether a live folder with the given name exists at `parent_path`.
    pub async fn exists(
        &self,
        ctx: &RequestContext,
        scope: &OwnerScope,
        name: &str,
        parent_path: &str,
    ) -> AppResult<bool> {
        self.access.require_read(ctx, scope).await?;
        let parent_path = path::normalize(parent_path);
        Ok(self
            .folders
            .find_by_location(scope, name, &parent_path, DeletedFilter::LiveOnly)
            .await?
            .is_some())
    }

    /// Creates a folder under `parent_path`.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        scope: &OwnerScope,
        name: &str,
        parent_path: &str,
    ) -> AppResult<Folder> {
        self.access.require_write(ctx, scope).await?;
        if !path::is_valid_name(name) {
            return Err(AppError::validation("Invalid folder name"));
        }
        let parent_path = path::normalize(parent_path);
        if parent_path != path::ROOT && self.find_by_full_path(scope, &parent_path).await?.is_none()
        {
            return Err(AppError::not_found("Parent folder not found"));
        }
        if self
            .folders
            .find_by_location(scope, name, &parent_path, DeletedFilter::LiveOnly)
            .await?
            .is_some()
        {
            return Err(AppError::duplicate_name(format!(
                "A folder named '{name}' already exists here"
            )));
        }

        let folder = self
            .folders
            .insert(&Folder::new(scope, name, &parent_path))
            .await?;

        info!(
            user_id = %ctx.user_id,
            folder_id = %folder.id,
            path = %folder.full_path(),
            "Folder created"
        );

        Ok(folder)
    }

    /// Renames a folder and rewrites the paths of its entire subtree.
    pub async fn rename(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
        new_name: &str,
    ) -> AppResult<Folder> {
        if !path::is_valid_name(new_name) {
            return Err(AppError::validation("Invalid folder name"));
        }
        let mut folder = self.get(ctx, folder_id).await?;
        let scope = folder.scope();
        self.access.require_write(ctx, &scope).await?;

        if folder.name == new_name {
            return Ok(folder);
        }
        if self
            .folders
            .find_by_location(&scope, new_name, &folder.parent_path, DeletedFilter::LiveOnly)
            .await?
            .is_some()
        {
            return Err(AppError::duplicate_name(format!(
                "A folder named '{new_name}' already exists here"
            )));
        }

        let old_path = folder.full_path();
        folder.name = new_name.to_string();
        let new_path = folder.full_path();

        let folder = self.folders.update(&folder).await?;
        self.rewrite_subtree(&scope, &old_path, &new_path).await?;

        info!(
            user_id = %ctx.user_id,
            folder_id = %folder_id,
            old_path = %old_path,
            new_path = %new_path,
            "Folder renamed"
        );
        self.publisher.publish(
            ctx.user_id,
            DomainEvent::FolderMoved {
                folder_id,
                old_path,
                new_path,
            },
        );

        Ok(folder)
    }

    /// Moves a folder under a new parent path and rewrites the paths of
    /// its entire subtree.
    ///
    /// Rejects self-containment before touching anything: the destination
    /// must not equal the folder's own path or lie beneath it.
    pub async fn move_to(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
        new_parent_path: &str,
    ) -> AppResult<Folder> {
        let mut folder = self.get(ctx, folder_id).await?;
        let scope = folder.scope();
        self.access.require_write(ctx, &scope).await?;

        let new_parent_path = path::normalize(new_parent_path);
        let old_path = folder.full_path();

        if path::is_descendant_or_self(&new_parent_path, &old_path) {
            return Err(AppError::invalid_move(
                "Cannot move a folder into itself or its own subtree",
            ));
        }
        if new_parent_path == folder.parent_path {
            return Ok(folder);
        }
        if new_parent_path != path::ROOT
            && self
                .find_by_full_path(&scope, &new_parent_path)
                .await?
                .is_none()
        {
            return Err(AppError::not_found("Destination folder not found"));
        }
        if self
            .folders
            .find_by_location(&scope, &folder.name, &new_parent_path, DeletedFilter::LiveOnly)
            .await?
            .is_some()
        {
            return Err(AppError::duplicate_name(format!(
                "A folder named '{}' already exists at the destination",
                folder.name
            )));
        }

        folder.parent_path = new_parent_path;
        let folder = self.folders.update(&folder).await?;
        let new_path = folder.full_path();
        self.rewrite_subtree(&scope, &old_path, &new_path).await?;

        info!(
            user_id = %ctx.user_id,
            folder_id = %folder_id,
            old_path = %old_path,
            new_path = %new_path,
            "Folder moved"
        );
        self.publisher.publish(
            ctx.user_id,
            DomainEvent::FolderMoved {
                folder_id,
                old_path,
                new_path,
            },
        );

        Ok(folder)
    }

    /// Permanently deletes a folder and everything beneath it.
    ///
    /// Blobs go first, best-effort: a blob the store fails to delete is
    /// logged and skipped, never blocking metadata removal. Then file
    /// records, then descendant folders, then the folder itself.
    pub async fn delete_permanently(&self, ctx: &RequestContext, folder_id: Uuid) -> AppResult<()> {
        let folder = self
            .folders
            .find_by_id(folder_id)
            .await?
            .ok_or_else(|| AppError::not_found("Folder not found"))?;
        let scope = folder.scope();
        self.access.require_write(ctx, &scope).await?;

        let full_path = folder.full_path();
        let files = self
            .files
            .find_descendants(&scope, &full_path, DeletedFilter::Any)
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
            file_count = files.len(),
            "Folder permanently deleted"
        );

        Ok(())
    }

    /// Creates every missing folder along `folder_path`, top down.
    /// Existing live folders are reused, so repeated calls converge on
    /// the same records.
    pub async fn ensure_path(&self, scope: &OwnerScope, folder_path: &str) -> AppResult<()> {
        let folder_path = path::normalize(folder_path);
        let mut parent = path::ROOT.to_string();
        for segment in path::segments(&folder_path) {
            self.folders
                .upsert_by_location(scope, segment, &parent)
                .await?;
            parent = path::full_path(&parent, segment);
        }
        Ok(())
    }

    /// Resolve a live folder by its full path. The root has no record.
    pub(crate) async fn find_by_full_path(
        &self,
        scope: &OwnerScope,
        full_path: &str,
    ) -> AppResult<Option<Folder>> {
        if full_path == path::ROOT {
            return Ok(None);
        }
        self.folders
            .find_by_location(
                scope,
                path::leaf_of(full_path),
                path::parent_of(full_path),
                DeletedFilter::LiveOnly,
            )
            .await
    }

    async fn rewrite_subtree(
        &self,
        scope: &OwnerScope,
        old_path: &str,
        new_path: &str,
    ) -> AppResult<()> {
        let folders = self
            .folders
            .rewrite_descendant_parent_paths(scope, old_path, new_path)
            .await?;
        let files = self
            .files
            .rewrite_descendant_folder_paths(scope, old_path, new_path)
            .await?;
        info!(
            old_path = %old_path,
            new_path = %new_path,
            folders,
            files,
            "Subtree paths rewritten"
        );
        Ok(())
    }
}
