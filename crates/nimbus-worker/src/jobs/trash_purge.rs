//! Trash retention sweep.
//!
//! Hard-deletes items whose trash residency has exceeded the retention
//! window. Blobs are cleared before their metadata so a crash mid-sweep
//! leaves records behind for the next run, never orphaned blobs with no
//! record pointing at them.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{info, warn};

use nimbus_core::result::AppResult;
use nimbus_core::traits::blob::BlobStore;
use nimbus_database::{FileStore, FolderStore};

/// Counts reported by one purge run.
#[derive(Debug, Clone, Copy, Default, serde::Serialize)]
pub struct PurgeSummary {
    /// File records hard-deleted.
    pub files_removed: u64,
    /// Folder records hard-deleted.
    pub folders_removed: u64,
}

/// Sweeps expired trash across every owner and drive.
#[derive(Clone)]
pub struct TrashPurgeJob {
    folders: Arc<dyn FolderStore>,
    files: Arc<dyn FileStore>,
    blobs: Arc<dyn BlobStore>,
    retention_days: i64,
}

impl std::fmt::Debug for TrashPurgeJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrashPurgeJob")
            .field("retention_days", &self.retention_days)
            .finish()
    }
}

impl TrashPurgeJob {
    pub fn new(
        folders: Arc<dyn FolderStore>,
        files: Arc<dyn FileStore>,
        blobs: Arc<dyn BlobStore>,
        retention_days: i64,
    ) -> Self {
        Self {
            folders,
            files,
            blobs,
            retention_days,
        }
    }

    /// Run one sweep. Blob deletes are best-effort; a failed blob delete
    /// is logged and the metadata record is removed anyway.
    pub async fn run(&self) -> AppResult<PurgeSummary> {
        let cutoff = Utc::now() - Duration::days(self.retention_days);
        info!(%cutoff, retention_days = self.retention_days, "Running trash purge");

        let expired = self.files.find_deleted_before(cutoff).await?;
        let mut summary = PurgeSummary::default();

        for file in &expired {
            if let Err(e) = self.blobs.delete(&file.blob_key).await {
                warn!(
                    file_id = %file.id,
                    blob_key = %file.blob_key,
                    error = %e,
                    "Failed to delete blob during purge"
                );
            }
            if self.files.delete_by_id(file.id).await? {
                summary.files_removed += 1;
            }
        }

        summary.folders_removed = self.folders.delete_deleted_before(cutoff).await?;

        info!(
            files_removed = summary.files_removed,
            folders_removed = summary.folders_removed,
            "Trash purge finished"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use bytes::Bytes;
    use uuid::Uuid;

    use nimbus_core::types::OwnerScope;
    use nimbus_database::memory::{MemoryFileStore, MemoryFolderStore};
    use nimbus_entity::file::File;
    use nimbus_entity::folder::Folder;
    use nimbus_storage::MemoryBlobStore;

    async fn trashed_file(
        files: &MemoryFileStore,
        blobs: &MemoryBlobStore,
        scope: &OwnerScope,
        name: &str,
        days_ago: i64,
    ) -> File {
        let key = format!("users/test/{name}");
        blobs
            .put(&key, Bytes::from_static(b"x"), None)
            .await
            .unwrap();
        let mut file = File::new(scope, name, &key, 1, None, "/");
        file.is_deleted = true;
        file.deleted_at = Some(Utc::now() - Duration::days(days_ago));
        files.insert(&file).await.unwrap();
        file
    }

    #[tokio::test]
    async fn purge_removes_only_items_past_retention() {
        let folders = Arc::new(MemoryFolderStore::new());
        let files = Arc::new(MemoryFileStore::new());
        let blobs = Arc::new(MemoryBlobStore::new());
        let scope = OwnerScope::User(Uuid::new_v4());

        let old = trashed_file(&files, &blobs, &scope, "old.txt", 40).await;
        let recent = trashed_file(&files, &blobs, &scope, "recent.txt", 5).await;

        let mut folder = Folder::new(&scope, "Docs", "/");
        folder.is_deleted = true;
        folder.deleted_at = Some(Utc::now() - Duration::days(40));
        folders.insert(&folder).await.unwrap();

        let job = TrashPurgeJob::new(folders.clone(), files.clone(), blobs.clone(), 30);
        let summary = job.run().await.unwrap();

        assert_eq!(summary.files_removed, 1);
        assert_eq!(summary.folders_removed, 1);
        assert!(files.find_by_id(old.id).await.unwrap().is_none());
        assert!(files.find_by_id(recent.id).await.unwrap().is_some());
        assert!(!blobs.contains(&old.blob_key));
        assert!(blobs.contains(&recent.blob_key));
    }

    #[derive(Debug)]
    struct FailingDeleteBlobStore;

    #[async_trait::async_trait]
    impl BlobStore for FailingDeleteBlobStore {
        fn provider_type(&self) -> &str {
            "memory"
        }

        async fn put(&self, _key: &str, _data: Bytes, _content_type: Option<&str>) -> AppResult<()> {
            Ok(())
        }

        async fn get(&self, _key: &str) -> AppResult<Bytes> {
            Ok(Bytes::new())
        }

        async fn delete(&self, _key: &str) -> AppResult<()> {
            Err(nimbus_core::error::AppError::upstream(
                "Simulated blob outage",
            ))
        }

        async fn signed_url(
            &self,
            key: &str,
            _ttl: std::time::Duration,
            _disposition: Option<&str>,
        ) -> AppResult<String> {
            Ok(format!("memory://{key}"))
        }
    }

    #[tokio::test]
    async fn purge_drops_records_even_when_blob_deletes_fail() {
        let folders = Arc::new(MemoryFolderStore::new());
        let files = Arc::new(MemoryFileStore::new());
        let blobs = Arc::new(FailingDeleteBlobStore);
        let scope = OwnerScope::User(Uuid::new_v4());

        let mut file = File::new(&scope, "ghost.txt", "users/test/ghost", 1, None, "/");
        file.is_deleted = true;
        file.deleted_at = Some(Utc::now() - Duration::days(31));
        files.insert(&file).await.unwrap();

        let job = TrashPurgeJob::new(folders, files.clone(), blobs, 30);
        let summary = job.run().await.unwrap();

        assert_eq!(summary.files_removed, 1);
        assert!(files.find_by_id(file.id).await.unwrap().is_none());
    }
}
