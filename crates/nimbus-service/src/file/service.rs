//! File operations: upload, listing, signed access URLs, rename, move.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use nimbus_core::config::storage::StorageConfig;
use nimbus_core::error::AppError;
use nimbus_core::events::DomainEvent;
use nimbus_core::path;
use nimbus_core::result::AppResult;
use nimbus_core::traits::blob::BlobStore;
use nimbus_core::traits::publisher::EventPublisher;
use nimbus_core::types::{DeletedFilter, OwnerScope};
use nimbus_database::{FileStore, FolderStore};
use nimbus_entity::file::File;
use nimbus_storage::keys::blob_key;

use crate::access::AccessControl;
use crate::context::RequestContext;

/// Manages file records and their blobs.
#[derive(Debug, Clone)]
pub struct FileService {
    files: Arc<dyn FileStore>,
    folders: Arc<dyn FolderStore>,
    blobs: Arc<dyn BlobStore>,
    access: AccessControl,
    publisher: Arc<dyn EventPublisher>,
    config: StorageConfig,
}

impl FileService {
    /// Creates a new file service.
    pub fn new(
        files: Arc<dyn FileStore>,
        folders: Arc<dyn FolderStore>,
        blobs: Arc<dyn BlobStore>,
        access: AccessControl,
        publisher: Arc<dyn EventPublisher>,
        config: StorageConfig,
    ) -> Self {
        Self {
            files,
            folders,
            blobs,
            access,
            publisher,
            config,
        }
    }

    /// Gets a file by id, enforcing scope access. Trashed files are not
    /// found through this path.
    pub async fn get(&self, ctx: &RequestContext, file_id: Uuid) -> AppResult<File> {
        let file = self
            .files
            .find_by_id(file_id)
            .await?
            .filter(|f| !f.is_deleted)
            .ok_or_else(|| AppError::not_found("File not found"))?;
        self.access.require_read(ctx, &file.scope()).await?;
        Ok(file)
    }

    /// Lists the live files directly inside `folder_path`.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        scope: &OwnerScope,
        folder_path: &str,
    ) -> AppResult<Vec<File>> {
        self.access.require_read(ctx, scope).await?;
        let folder_path = path::normalize(folder_path);
        self.files.list_in_folder(scope, &folder_path).await
    }

    /// Uploads a file into `folder_path`.
    ///
    /// The blob goes in first; the metadata record follows. A live file
    /// with the same name in the same folder is replaced, and its old
    /// blob is dropped best-effort.
    pub async fn upload(
        &self,
        ctx: &RequestContext,
        scope: &OwnerScope,
        folder_path: &str,
        file_name: &str,
        mime_type: Option<String>,
        data: Bytes,
    ) -> AppResult<File> {
        self.access.require_write(ctx, scope).await?;
        if !path::is_valid_name(file_name) {
            return Err(AppError::validation("Invalid file name"));
        }
        let size = data.len() as u64;
        if size > self.config.max_upload_size_bytes {
            return Err(AppError::validation(format!(
                "File exceeds the maximum upload size of {} bytes",
                self.config.max_upload_size_bytes
            )));
        }
        let folder_path = path::normalize(folder_path);
        if folder_path != path::ROOT && !self.folder_exists(scope, &folder_path).await? {
            return Err(AppError::not_found("Destination folder not found"));
        }
        if let OwnerScope::User(owner_id) = scope {
            self.check_quota(*owner_id, size).await?;
        }

        let key = blob_key(scope, file_name);
        self.blobs
            .put(&key, data.clone(), mime_type.as_deref())
            .await?;

        let existing = self
            .files
            .list_in_folder(scope, &folder_path)
            .await?
            .into_iter()
            .find(|f| f.file_name == file_name);

        let file = match existing {
            Some(mut f) => {
                let old_key = std::mem::replace(&mut f.blob_key, key);
                f.size_bytes = size as i64;
                f.mime_type = mime_type;
                let updated = self.files.update(&f).await?;
                if let Err(e) = self.blobs.delete(&old_key).await {
                    warn!(blob_key = %old_key, error = %e, "Blob delete failed, continuing");
                }
                updated
            }
            None => {
                self.files
                    .insert(&File::new(
                        scope,
                        file_name,
                        key,
                        size as i64,
                        mime_type,
                        &folder_path,
                    ))
                    .await?
            }
        };

        info!(
            user_id = %ctx.user_id,
            file_id = %file.id,
            folder_path = %file.folder_path,
            size_bytes = file.size_bytes,
            "File uploaded"
        );
        self.publisher.publish(
            ctx.user_id,
            DomainEvent::FileUploaded {
                file_id: file.id,
                file_name: file.file_name.clone(),
                folder_path: file.folder_path.clone(),
            },
        );

        Ok(file)
    }

    /// Issues a signed URL for inline preview.
    pub async fn preview_url(&self, ctx: &RequestContext, file_id: Uuid) -> AppResult<String> {
        let file = self.get(ctx, file_id).await?;
        self.blobs
            .signed_url(&file.blob_key, self.signed_url_ttl(), None)
            .await
    }

    /// Issues a signed URL that downloads as an attachment under the
    /// file's original name.
    pub async fn download_url(&self, ctx: &RequestContext, file_id: Uuid) -> AppResult<String> {
        let file = self.get(ctx, file_id).await?;
        let disposition = format!("attachment; filename=\"{}\"", file.file_name);
        self.blobs
            .signed_url(&file.blob_key, self.signed_url_ttl(), Some(&disposition))
            .await
    }

    /// Renames a file in place.
    pub async fn rename(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
        new_name: &str,
    ) -> AppResult<File> {
        if !path::is_valid_name(new_name) {
            return Err(AppError::validation("Invalid file name"));
        }
        let mut file = self.get(ctx, file_id).await?;
        let scope = file.scope();
        self.access.require_write(ctx, &scope).await?;
        if file.file_name == new_name {
            return Ok(file);
        }
        if self.name_taken(&scope, &file.folder_path, new_name).await? {
            return Err(AppError::duplicate_name(format!(
                "A file named '{new_name}' already exists here"
            )));
        }
        file.file_name = new_name.to_string();
        let file = self.files.update(&file).await?;
        info!(user_id = %ctx.user_id, file_id = %file_id, new_name, "File renamed");
        Ok(file)
    }

    /// Moves a file to a different folder within its scope.
    pub async fn move_to(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
        new_folder_path: &str,
    ) -> AppResult<File> {
        let mut file = self.get(ctx, file_id).await?;
        let scope = file.scope();
        self.access.require_write(ctx, &scope).await?;

        let new_folder_path = path::normalize(new_folder_path);
        if new_folder_path == file.folder_path {
            return Ok(file);
        }
        if new_folder_path != path::ROOT && !self.folder_exists(&scope, &new_folder_path).await? {
            return Err(AppError::not_found("Destination folder not found"));
        }
        if self
            .name_taken(&scope, &new_folder_path, &file.file_name)
            .await?
        {
            return Err(AppError::duplicate_name(format!(
                "A file named '{}' already exists at the destination",
                file.file_name
            )));
        }

        file.folder_path = new_folder_path;
        let file = self.files.update(&file).await?;
        info!(
            user_id = %ctx.user_id,
            file_id = %file_id,
            folder_path = %file.folder_path,
            "File moved"
        );
        Ok(file)
    }

    fn signed_url_ttl(&self) -> Duration {
        Duration::from_secs(self.config.signed_url_ttl_seconds)
    }

    async fn folder_exists(&self, scope: &OwnerScope, full_path: &str) -> AppResult<bool> {
        Ok(self
            .folders
            .find_by_location(
                scope,
                path::leaf_of(full_path),
                path::parent_of(full_path),
                DeletedFilter::LiveOnly,
            )
            .await?
            .is_some())
    }

    async fn name_taken(
        &self,
        scope: &OwnerScope,
        folder_path: &str,
        file_name: &str,
    ) -> AppResult<bool> {
        Ok(self
            .files
            .list_in_folder(scope, folder_path)
            .await?
            .iter()
            .any(|f| f.file_name == file_name))
    }

    async fn check_quota(&self, owner_id: Uuid, incoming: u64) -> AppResult<()> {
        let used: i64 = self
            .files
            .usage_by_mime(owner_id)
            .await?
            .iter()
            .map(|u| u.total_bytes)
            .sum();
        if used as u64 + incoming > self.config.user_quota_bytes {
            return Err(AppError::validation(format!(
                "Storage quota of {} bytes exceeded",
                self.config.user_quota_bytes
            )));
        }
        Ok(())
    }
}
