//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use nimbus_core::types::OwnerScope;

/// A file stored in Nimbus Drive.
///
/// `folder_path` is the absolute path of the containing folder — a
/// materialized path, not a folder id. The hierarchy engine keeps it equal
/// to that folder's full path across moves and renames.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct File {
    /// Unique file identifier.
    pub id: Uuid,
    /// Personal owner (null for shared-drive files).
    pub owner_id: Option<Uuid>,
    /// Owning shared drive (null for personal files).
    pub drive_id: Option<Uuid>,
    /// The file name (including extension).
    pub file_name: String,
    /// Key of the blob in the object store.
    pub blob_key: String,
    /// File size in bytes.
    pub size_bytes: i64,
    /// MIME type of the file.
    pub mime_type: Option<String>,
    /// Absolute path of the containing folder (`/` for top-level files).
    pub folder_path: String,
    /// Whether the file is in the trash.
    pub is_deleted: bool,
    /// When the file was trashed.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Whether the file is starred.
    pub is_starred: bool,
    /// When the file was created.
    pub created_at: DateTime<Utc>,
    /// When the file was last updated.
    pub updated_at: DateTime<Utc>,
}

impl File {
    /// Build a fresh live file record for the given scope.
    pub fn new(
        scope: &OwnerScope,
        file_name: impl Into<String>,
        blob_key: impl Into<String>,
        size_bytes: i64,
        mime_type: Option<String>,
        folder_path: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id: scope.owner_id(),
            drive_id: scope.drive_id(),
            file_name: file_name.into(),
            blob_key: blob_key.into(),
            size_bytes,
            mime_type,
            folder_path: folder_path.into(),
            is_deleted: false,
            deleted_at: None,
            is_starred: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// The owning scope of this file.
    pub fn scope(&self) -> OwnerScope {
        match self.drive_id {
            Some(drive_id) => OwnerScope::Drive(drive_id),
            None => OwnerScope::User(self.owner_id.unwrap_or_default()),
        }
    }
}
