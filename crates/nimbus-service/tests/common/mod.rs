//! Shared test harness: the full service graph wired to in-memory
//! backends.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use uuid::Uuid;

use nimbus_core::config::auth::AuthConfig;
use nimbus_core::config::storage::StorageConfig;
use nimbus_core::config::trash::TrashConfig;
use nimbus_core::error::AppError;
use nimbus_core::result::AppResult;
use nimbus_core::traits::blob::BlobStore;
use nimbus_core::traits::publisher::NullPublisher;
use nimbus_database::memory::{
    MemoryDriveStore, MemoryFileStore, MemoryFolderStore, MemoryShareStore,
};
use nimbus_service::{
    AccessControl, DriveService, ExportService, FileService, FolderService, ImportService,
    LogMailer, RequestContext, SearchService, ShareService, StarredService, TrashService,
    UsageService,
};
use nimbus_storage::MemoryBlobStore;

/// Blob store whose deletes always fail; puts and gets pass through.
/// Used to verify that metadata cleanup never blocks on blob cleanup.
#[derive(Debug)]
pub struct FailingDeleteBlobStore {
    inner: MemoryBlobStore,
}

impl FailingDeleteBlobStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryBlobStore::new(),
        }
    }
}

#[async_trait]
impl BlobStore for FailingDeleteBlobStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn put(&self, key: &str, data: Bytes, content_type: Option<&str>) -> AppResult<()> {
        self.inner.put(key, data, content_type).await
    }

    async fn get(&self, key: &str) -> AppResult<Bytes> {
        self.inner.get(key).await
    }

    async fn delete(&self, _key: &str) -> AppResult<()> {
        Err(AppError::upstream("Simulated blob delete outage"))
    }

    async fn signed_url(
        &self,
        key: &str,
        ttl: Duration,
        disposition: Option<&str>,
    ) -> AppResult<String> {
        self.inner.signed_url(key, ttl, disposition).await
    }
}

/// The whole service graph on in-memory backends.
pub struct TestEnv {
    pub folders: Arc<MemoryFolderStore>,
    pub files: Arc<MemoryFileStore>,
    pub shares: Arc<MemoryShareStore>,
    pub drives: Arc<MemoryDriveStore>,
    pub blobs: Arc<dyn BlobStore>,
    pub folder_svc: FolderService,
    pub file_svc: FileService,
    pub import_svc: ImportService,
    pub export_svc: ExportService,
    pub trash_svc: TrashService,
    pub share_svc: ShareService,
    pub drive_svc: DriveService,
    pub usage_svc: UsageService,
    pub starred_svc: StarredService,
    pub search_svc: SearchService,
}

impl TestEnv {
    pub fn new() -> Self {
        Self::build(Arc::new(MemoryBlobStore::new()), StorageConfig::default())
    }

    pub fn with_failing_blob_deletes() -> Self {
        Self::build(
            Arc::new(FailingDeleteBlobStore::new()),
            StorageConfig::default(),
        )
    }

    pub fn with_storage_config(storage_config: StorageConfig) -> Self {
        Self::build(Arc::new(MemoryBlobStore::new()), storage_config)
    }

    fn build(blobs: Arc<dyn BlobStore>, storage_config: StorageConfig) -> Self {
        let folders = Arc::new(MemoryFolderStore::new());
        let files = Arc::new(MemoryFileStore::new());
        let shares = Arc::new(MemoryShareStore::new());
        let drives = Arc::new(MemoryDriveStore::new());
        let publisher = Arc::new(NullPublisher);
        let mailer = Arc::new(LogMailer);
        let access = AccessControl::new(drives.clone());
        let trash_config = TrashConfig::default();
        let auth_config = AuthConfig::default();

        let folder_svc = FolderService::new(
            folders.clone(),
            files.clone(),
            blobs.clone(),
            access.clone(),
            publisher.clone(),
        );
        let file_svc = FileService::new(
            files.clone(),
            folders.clone(),
            blobs.clone(),
            access.clone(),
            publisher.clone(),
            storage_config.clone(),
        );
        let import_svc = ImportService::new(
            folders.clone(),
            files.clone(),
            blobs.clone(),
            access.clone(),
        );
        let export_svc = ExportService::new(
            folders.clone(),
            files.clone(),
            blobs.clone(),
            access.clone(),
        );
        let trash_svc = TrashService::new(
            folders.clone(),
            files.clone(),
            blobs.clone(),
            access.clone(),
            trash_config,
        );
        let share_svc = ShareService::new(
            shares.clone(),
            files.clone(),
            folders.clone(),
            blobs.clone(),
            mailer.clone(),
            publisher.clone(),
            auth_config,
            storage_config.clone(),
        );
        let drive_svc = DriveService::new(
            drives.clone(),
            folders.clone(),
            files.clone(),
            blobs.clone(),
            access.clone(),
            mailer,
            publisher,
        );
        let usage_svc = UsageService::new(files.clone(), storage_config);
        let starred_svc = StarredService::new(folders.clone(), files.clone(), access.clone());
        let search_svc = SearchService::new(folders.clone(), files.clone());

        Self {
            folders,
            files,
            shares,
            drives,
            blobs,
            folder_svc,
            file_svc,
            import_svc,
            export_svc,
            trash_svc,
            share_svc,
            drive_svc,
            usage_svc,
            starred_svc,
            search_svc,
        }
    }
}

pub fn user_ctx() -> RequestContext {
    RequestContext::new(Uuid::new_v4(), format!("{}@example.com", Uuid::new_v4()))
}

/// Build a small zip archive from (path, contents) pairs. Paths ending
/// in `/` become directory entries.
pub fn make_zip(entries: &[(&str, &[u8])]) -> Bytes {
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, data) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, options).unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            writer.write_all(data).unwrap();
        }
    }
    Bytes::from(writer.finish().unwrap().into_inner())
}
