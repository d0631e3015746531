//! Zip archive import.
//!
//! Expands an uploaded archive into the hierarchy: one file record plus
//! blob per file entry, with folders materialized from each file's
//! directory spine. Directory-only entries carry no content and create
//! no records. Folder creation goes through create-if-absent upserts,
//! so re-importing the same archive (or two concurrent imports of
//! archives sharing a directory spine) converges on a single record per
//! path.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::io::{Cursor, Read};
use std::sync::Arc;

use bytes::Bytes;
use futures::stream::{self, TryStreamExt};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use zip::ZipArchive;

use nimbus_core::error::AppError;
use nimbus_core::path;
use nimbus_core::result::AppResult;
use nimbus_core::traits::blob::BlobStore;
use nimbus_core::types::{DeletedFilter, OwnerScope};
use nimbus_database::{FileStore, FolderStore};
use nimbus_entity::file::File;
use nimbus_storage::keys::blob_key;

use crate::access::AccessControl;
use crate::context::RequestContext;

/// How many blob uploads to run concurrently during an import.
const UPLOAD_CONCURRENCY: usize = 8;

/// What to do when the archive's root folder name is already taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictAction {
    /// Merge into the existing folder; files with the same name are
    /// replaced.
    Merge,
    /// Delete the existing folder subtree first, then import.
    Replace,
    /// Import under a fresh `name (n)` folder.
    Rename,
}

impl Default for ConflictAction {
    fn default() -> Self {
        Self::Merge
    }
}

/// Outcome of an archive import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSummary {
    /// Full path of the root folder the archive landed in.
    pub root_path: String,
    /// Number of folder records the import touched.
    pub folders: u64,
    /// Number of files imported.
    pub files: u64,
}

/// Expands zip archives into the folder hierarchy.
#[derive(Debug, Clone)]
pub struct ImportService {
    folders: Arc<dyn FolderStore>,
    files: Arc<dyn FileStore>,
    blobs: Arc<dyn BlobStore>,
    access: AccessControl,
}

struct PendingFile {
    folder_path: String,
    file_name: String,
    data: Bytes,
}

impl ImportService {
    /// Creates a new import service.
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

    /// Imports a zip archive under `dest_path`.
    ///
    /// The archive lands inside a root folder named after the archive
    /// file; `conflict` decides what happens when that name is taken.
    pub async fn import(
        &self,
        ctx: &RequestContext,
        scope: &OwnerScope,
        dest_path: &str,
        archive_name: &str,
        data: Bytes,
        conflict: ConflictAction,
    ) -> AppResult<ImportSummary> {
        self.access.require_write(ctx, scope).await?;
        let dest_path = path::normalize(dest_path);

        let base_name = archive_name
            .strip_suffix(".zip")
            .unwrap_or(archive_name)
            .trim();
        if !path::is_valid_name(base_name) {
            return Err(AppError::validation("Invalid archive name"));
        }

        let root_name = self
            .resolve_root_name(scope, base_name, &dest_path, conflict)
            .await?;
        let root = self
            .folders
            .upsert_by_location(scope, &root_name, &dest_path)
            .await?;
        let root_path = root.full_path();

        let pending = read_archive(&data, &root_path)?;

        // Directory spine first, parents before children. Folders exist
        // only as the ancestry of some file entry.
        let mut created: HashSet<String> = HashSet::new();
        created.insert(root_path.clone());
        let mut parents: Vec<String> = pending.iter().map(|f| f.folder_path.clone()).collect();
        parents.sort();
        let mut folder_count = 1u64;
        for dir in parents {
            folder_count += self.ensure_dirs(scope, &dir, &mut created).await?;
        }

        // Blob uploads run concurrently; record writes follow.
        let file_count = pending.len() as u64;
        let keyed: Vec<(PendingFile, String)> = pending
            .into_iter()
            .map(|f| {
                let key = blob_key(scope, &f.file_name);
                (f, key)
            })
            .collect();
        stream::iter(keyed.iter().map(Ok::<_, AppError>))
            .try_for_each_concurrent(UPLOAD_CONCURRENCY, |(f, key)| {
                let blobs = Arc::clone(&self.blobs);
                async move { blobs.put(key, f.data.clone(), None).await }
            })
            .await?;

        let mut listings: HashMap<String, Vec<File>> = HashMap::new();
        for (pending, key) in keyed {
            self.record_file(scope, pending, key, &mut listings).await?;
        }

        info!(
            user_id = %ctx.user_id,
            root_path = %root_path,
            folders = folder_count,
            files = file_count,
            "Archive imported"
        );

        Ok(ImportSummary {
            root_path,
            folders: folder_count,
            files: file_count,
        })
    }

    async fn resolve_root_name(
        &self,
        scope: &OwnerScope,
        base_name: &str,
        dest_path: &str,
        conflict: ConflictAction,
    ) -> AppResult<String> {
        let existing = self
            .folders
            .find_by_location(scope, base_name, dest_path, DeletedFilter::LiveOnly)
            .await?;
        let Some(existing) = existing else {
            return Ok(base_name.to_string());
        };
        match conflict {
            ConflictAction::Merge => Ok(base_name.to_string()),
            ConflictAction::Replace => {
                self.delete_subtree(scope, &existing).await?;
                Ok(base_name.to_string())
            }
            ConflictAction::Rename => {
                for n in 1.. {
                    let candidate = format!("{base_name} ({n})");
                    if self
                        .folders
                        .find_by_location(scope, &candidate, dest_path, DeletedFilter::LiveOnly)
                        .await?
                        .is_none()
                    {
                        return Ok(candidate);
                    }
                }
                unreachable!()
            }
        }
    }

    async fn delete_subtree(
        &self,
        scope: &OwnerScope,
        folder: &nimbus_entity::folder::Folder,
    ) -> AppResult<()> {
        let full_path = folder.full_path();
        let files = self
            .files
            .find_descendants(scope, &full_path, DeletedFilter::Any)
            .await?;
        for file in &files {
            if let Err(e) = self.blobs.delete(&file.blob_key).await {
                warn!(blob_key = %file.blob_key, error = %e, "Blob delete failed, continuing");
            }
        }
        self.files.delete_descendants(scope, &full_path).await?;
        self.folders.delete_descendants(scope, &full_path).await?;
        self.folders.delete_by_id(folder.id).await?;
        Ok(())
    }

    /// Upsert every folder along `dir`, skipping paths already handled in
    /// this import. Returns how many new paths were touched.
    async fn ensure_dirs(
        &self,
        scope: &OwnerScope,
        dir: &str,
        created: &mut HashSet<String>,
    ) -> AppResult<u64> {
        let mut parent = path::ROOT.to_string();
        let mut touched = 0;
        for segment in path::segments(dir) {
            let full = path::full_path(&parent, segment);
            if created.insert(full.clone()) {
                self.folders
                    .upsert_by_location(scope, segment, &parent)
                    .await?;
                touched += 1;
            }
            parent = full;
        }
        Ok(touched)
    }

    /// Write the metadata record for an uploaded entry. A live file with
    /// the same name in the same folder is replaced: its record points at
    /// the new blob and the old blob is dropped best-effort.
    async fn record_file(
        &self,
        scope: &OwnerScope,
        pending: PendingFile,
        key: String,
        listings: &mut HashMap<String, Vec<File>>,
    ) -> AppResult<()> {
        let listing = match listings.entry(pending.folder_path.clone()) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(v) => {
                let listing = self.files.list_in_folder(scope, &pending.folder_path).await?;
                v.insert(listing)
            }
        };

        let size = pending.data.len() as i64;
        if let Some(existing) = listing.iter_mut().find(|f| f.file_name == pending.file_name) {
            let old_key = std::mem::replace(&mut existing.blob_key, key);
            existing.size_bytes = size;
            let updated = self.files.update(existing).await?;
            *existing = updated;
            if let Err(e) = self.blobs.delete(&old_key).await {
                warn!(blob_key = %old_key, error = %e, "Blob delete failed, continuing");
            }
        } else {
            let file = File::new(
                scope,
                &pending.file_name,
                key,
                size,
                None,
                &pending.folder_path,
            );
            let inserted = self.files.insert(&file).await?;
            listing.push(inserted);
        }
        Ok(())
    }
}

/// Parse the archive into file entries rooted at `root_path`.
/// Directory entries carry no content and are skipped; entries that
/// escape the archive root are skipped.
fn read_archive(data: &Bytes, root_path: &str) -> AppResult<Vec<PendingFile>> {
    let mut archive = ZipArchive::new(Cursor::new(data.as_ref()))
        .map_err(|e| AppError::validation(format!("Invalid zip archive: {e}")))?;

    let mut files = Vec::new();
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| AppError::validation(format!("Corrupt zip entry: {e}")))?;
        if entry.is_dir() {
            continue;
        }
        let Some(rel) = entry.enclosed_name() else {
            warn!(entry = entry.name(), "Skipping unsafe archive entry");
            continue;
        };
        let rel = rel.to_string_lossy().replace('\\', "/");
        let full = path::normalize(&format!("{root_path}/{rel}"));
        let file_name = path::leaf_of(&full).to_string();
        let folder_path = path::parent_of(&full).to_string();
        let mut buf = Vec::with_capacity(entry.size() as usize);
        entry
            .read_to_end(&mut buf)
            .map_err(|e| AppError::validation(format!("Corrupt zip entry: {e}")))?;
        files.push(PendingFile {
            folder_path,
            file_name,
            data: Bytes::from(buf),
        });
    }
    Ok(files)
}
