//! Document-store traits the hierarchy engine operates against.
//!
//! The engine only needs find / bulk-update / bulk-delete with
//! boundary-exact path-prefix matching, so that is the whole contract.
//! Two backends implement it: PostgreSQL ([`crate::repositories`]) and an
//! in-memory single-node store ([`crate::memory`]) used for development
//! and tests. Each individual store call is atomic; multi-call operations
//! are not, and callers are expected to keep every bulk rewrite idempotent
//! so retries converge.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use nimbus_core::result::AppResult;
use nimbus_core::types::{DeletedFilter, OwnerScope};
use nimbus_entity::drive::SharedDrive;
use nimbus_entity::file::File;
use nimbus_entity::folder::Folder;
use nimbus_entity::share::Share;

/// Per-MIME-type usage aggregate for the storage breakdown.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, sqlx::FromRow)]
pub struct MimeUsage {
    /// MIME type, if recorded at upload time.
    pub mime_type: Option<String>,
    /// Total live bytes for this MIME type.
    pub total_bytes: i64,
    /// Number of live files of this MIME type.
    pub file_count: i64,
}

/// Folder metadata store.
#[async_trait]
pub trait FolderStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a folder by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Folder>>;

    /// Find a folder by its (scope, name, parent_path) location key.
    async fn find_by_location(
        &self,
        scope: &OwnerScope,
        name: &str,
        parent_path: &str,
        filter: DeletedFilter,
    ) -> AppResult<Option<Folder>>;

    /// List live folders whose parent is exactly `parent_path`.
    async fn list_children(&self, scope: &OwnerScope, parent_path: &str)
    -> AppResult<Vec<Folder>>;

    /// Insert a new folder record.
    async fn insert(&self, folder: &Folder) -> AppResult<Folder>;

    /// Create-if-absent by location key; returns the existing live folder
    /// when one is already there. Concurrent callers racing on the same
    /// key must both observe a single record.
    async fn upsert_by_location(
        &self,
        scope: &OwnerScope,
        name: &str,
        parent_path: &str,
    ) -> AppResult<Folder>;

    /// Persist all mutable fields of a folder.
    async fn update(&self, folder: &Folder) -> AppResult<Folder>;

    /// Rewrite `parent_path` by boundary-exact prefix substitution for
    /// every folder whose `parent_path` is `old_prefix` or lies beneath
    /// it. Returns the number of rewritten records.
    async fn rewrite_descendant_parent_paths(
        &self,
        scope: &OwnerScope,
        old_prefix: &str,
        new_prefix: &str,
    ) -> AppResult<u64>;

    /// Folders whose `parent_path` is descendant-or-self of `prefix`.
    async fn find_descendants(
        &self,
        scope: &OwnerScope,
        prefix: &str,
        filter: DeletedFilter,
    ) -> AppResult<Vec<Folder>>;

    /// Hard-delete all folders whose `parent_path` is descendant-or-self
    /// of `prefix`.
    async fn delete_descendants(&self, scope: &OwnerScope, prefix: &str) -> AppResult<u64>;

    /// Hard-delete one folder. Returns `true` if a record was removed.
    async fn delete_by_id(&self, id: Uuid) -> AppResult<bool>;

    /// Soft-delete every live folder whose `parent_path` is
    /// descendant-or-self of `prefix`.
    async fn mark_descendants_deleted(
        &self,
        scope: &OwnerScope,
        prefix: &str,
        deleted_at: DateTime<Utc>,
    ) -> AppResult<u64>;

    /// Restore every trashed folder whose `parent_path` is
    /// descendant-or-self of `prefix`.
    async fn restore_descendants(&self, scope: &OwnerScope, prefix: &str) -> AppResult<u64>;

    /// Trashed folders of a personal owner, newest deletion first.
    async fn list_deleted(&self, owner_id: Uuid) -> AppResult<Vec<Folder>>;

    /// Hard-delete all trashed folders of a personal owner.
    async fn delete_deleted(&self, owner_id: Uuid) -> AppResult<u64>;

    /// Hard-delete trashed folders (any scope) deleted before `cutoff`.
    async fn delete_deleted_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64>;

    /// Starred live folders of a personal owner.
    async fn list_starred(&self, owner_id: Uuid) -> AppResult<Vec<Folder>>;

    /// Case-insensitive name search over live folders.
    async fn search(&self, owner_id: Uuid, query: &str, limit: i64) -> AppResult<Vec<Folder>>;

    /// Hard-delete every folder belonging to a shared drive.
    async fn delete_by_drive(&self, drive_id: Uuid) -> AppResult<u64>;
}

/// File metadata store.
#[async_trait]
pub trait FileStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a file by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<File>>;

    /// List live files whose containing folder is exactly `folder_path`.
    async fn list_in_folder(&self, scope: &OwnerScope, folder_path: &str)
    -> AppResult<Vec<File>>;

    /// Insert a new file record.
    async fn insert(&self, file: &File) -> AppResult<File>;

    /// Persist all mutable fields of a file.
    async fn update(&self, file: &File) -> AppResult<File>;

    /// Rewrite `folder_path` by boundary-exact prefix substitution for
    /// every file whose `folder_path` is `old_prefix` or lies beneath it.
    async fn rewrite_descendant_folder_paths(
        &self,
        scope: &OwnerScope,
        old_prefix: &str,
        new_prefix: &str,
    ) -> AppResult<u64>;

    /// Files whose `folder_path` is descendant-or-self of `prefix`.
    async fn find_descendants(
        &self,
        scope: &OwnerScope,
        prefix: &str,
        filter: DeletedFilter,
    ) -> AppResult<Vec<File>>;

    /// Hard-delete all files whose `folder_path` is descendant-or-self of
    /// `prefix`.
    async fn delete_descendants(&self, scope: &OwnerScope, prefix: &str) -> AppResult<u64>;

    /// Hard-delete one file. Returns `true` if a record was removed.
    async fn delete_by_id(&self, id: Uuid) -> AppResult<bool>;

    /// Soft-delete every live file whose `folder_path` is
    /// descendant-or-self of `prefix`.
    async fn mark_descendants_deleted(
        &self,
        scope: &OwnerScope,
        prefix: &str,
        deleted_at: DateTime<Utc>,
    ) -> AppResult<u64>;

    /// Restore every trashed file whose `folder_path` is
    /// descendant-or-self of `prefix`.
    async fn restore_descendants(&self, scope: &OwnerScope, prefix: &str) -> AppResult<u64>;

    /// Trashed files of a personal owner, newest deletion first.
    async fn list_deleted(&self, owner_id: Uuid) -> AppResult<Vec<File>>;

    /// Hard-delete all trashed files of a personal owner.
    async fn delete_deleted(&self, owner_id: Uuid) -> AppResult<u64>;

    /// Trashed files (any scope) deleted before `cutoff`. Returned whole
    /// so the purge sweep can clear their blobs first.
    async fn find_deleted_before(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<File>>;

    /// Starred live files of a personal owner.
    async fn list_starred(&self, owner_id: Uuid) -> AppResult<Vec<File>>;

    /// Case-insensitive name search over live files.
    async fn search(&self, owner_id: Uuid, query: &str, limit: i64) -> AppResult<Vec<File>>;

    /// Live usage aggregates per MIME type for a personal owner.
    async fn usage_by_mime(&self, owner_id: Uuid) -> AppResult<Vec<MimeUsage>>;

    /// All files belonging to a shared drive (for blob cleanup).
    async fn list_by_drive(&self, drive_id: Uuid) -> AppResult<Vec<File>>;

    /// Hard-delete every file belonging to a shared drive.
    async fn delete_by_drive(&self, drive_id: Uuid) -> AppResult<u64>;
}

/// Share store.
#[async_trait]
pub trait ShareStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a new share.
    async fn insert(&self, share: &Share) -> AppResult<Share>;

    /// Find a share by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Share>>;

    /// Resolve a share by its bearer token.
    async fn find_by_token(&self, token: &str) -> AppResult<Option<Share>>;

    /// Shares granted to the given email, newest first.
    async fn list_for_recipient(&self, email: &str) -> AppResult<Vec<Share>>;

    /// Shares created by the given user, newest first.
    async fn list_by_creator(&self, user_id: Uuid) -> AppResult<Vec<Share>>;

    /// Delete a share. Returns `true` if a record was removed.
    async fn delete_by_id(&self, id: Uuid) -> AppResult<bool>;
}

/// Shared-drive store.
#[async_trait]
pub trait DriveStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a new drive.
    async fn insert(&self, drive: &SharedDrive) -> AppResult<SharedDrive>;

    /// Find a drive by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<SharedDrive>>;

    /// Drives in which the given email is a member, newest first.
    async fn list_for_member(&self, email: &str) -> AppResult<Vec<SharedDrive>>;

    /// Persist name, description, and member list.
    async fn update(&self, drive: &SharedDrive) -> AppResult<SharedDrive>;

    /// Delete a drive. Returns `true` if a record was removed.
    async fn delete_by_id(&self, id: Uuid) -> AppResult<bool>;
}
