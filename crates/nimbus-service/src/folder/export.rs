//! Zip archive export.

use std::io::{Cursor, Write};
use std::sync::Arc;

use bytes::Bytes;
use tracing::info;
use uuid::Uuid;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use nimbus_core::error::AppError;
use nimbus_core::result::AppResult;
use nimbus_core::traits::blob::BlobStore;
use nimbus_core::types::DeletedFilter;
use nimbus_database::{FileStore, FolderStore};

use crate::access::AccessControl;
use crate::context::RequestContext;

/// Packs a folder subtree into a zip archive.
#[derive(Debug, Clone)]
pub struct ExportService {
    folders: Arc<dyn FolderStore>,
    files: Arc<dyn FileStore>,
    blobs: Arc<dyn BlobStore>,
    access: AccessControl,
}

impl ExportService {
    /// Creates a new export service.
    pub fn new(
        folders: Arc<dyn FolderStore>,
        files: Arc<dyn FileStore>,
        blobs: Arc<dyn BlobStore>,
        access: AccessControl,
    ) -> Self {
        Self {
            folders,
            files,
            blobs,
            access,
        }
    }

    /// Builds a zip archive of the folder's live subtree. Returns the
    /// suggested download name and the archive bytes.
    pub async fn export_zip(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
    ) -> AppResult<(String, Bytes)> {
        let folder = self
            .folders
            .find_by_id(folder_id)
            .await?
            .filter(|f| !f.is_deleted)
            .ok_or_else(|| AppError::not_found("Folder not found"))?;
        let scope = folder.scope();
        self.access.require_read(ctx, &scope).await?;

        let full_path = folder.full_path();
        let sub_folders = self
            .folders
            .find_descendants(&scope, &full_path, DeletedFilter::LiveOnly)
            .await?;
        let files = self
            .files
            .find_descendants(&scope, &full_path, DeletedFilter::LiveOnly)
            .await?;

        // Entry names are relative to the exported folder's parent, so
        // the archive unpacks into a single "<name>/" directory.
        let rel = |p: &str| format!("{}{}", folder.name, &p[full_path.len()..]);

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();

        writer
            .add_directory(format!("{}/", folder.name), options)
            .map_err(|e| AppError::internal(format!("Zip write failed: {e}")))?;
        for sub in &sub_folders {
            writer
                .add_directory(format!("{}/", rel(&sub.full_path())), options)
                .map_err(|e| AppError::internal(format!("Zip write failed: {e}")))?;
        }
        for file in &files {
            let data = self.blobs.get(&file.blob_key).await?;
            let entry = format!("{}/{}", rel(&file.folder_path), file.file_name);
            writer
                .start_file(entry, options)
                .map_err(|e| AppError::internal(format!("Zip write failed: {e}")))?;
            writer.write_all(&data)?;
        }

        let cursor = writer
            .finish()
            .map_err(|e| AppError::internal(format!("Zip finalize failed: {e}")))?;

        info!(
            user_id = %ctx.user_id,
            folder_id = %folder_id,
            path = %full_path,
            files = files.len(),
            "Folder exported"
        );

        Ok((format!("{}.zip", folder.name), Bytes::from(cursor.into_inner())))
    }
}
