//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use nimbus_core::path;
use nimbus_core::types::OwnerScope;

/// A folder in the virtual hierarchy.
///
/// Containment is encoded as a materialized path: `parent_path` holds the
/// absolute path of the parent container rather than a foreign key. The
/// hierarchy engine keeps it equal to the parent's full path across all
/// structural operations.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: Uuid,
    /// Personal owner (null for shared-drive folders).
    pub owner_id: Option<Uuid>,
    /// Owning shared drive (null for personal folders).
    pub drive_id: Option<Uuid>,
    /// Folder name.
    pub name: String,
    /// Absolute path of the parent container (`/` for top-level folders).
    pub parent_path: String,
    /// Whether the folder is in the trash.
    pub is_deleted: bool,
    /// When the folder was trashed.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Whether the folder is starred.
    pub is_starred: bool,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    /// Build a fresh live folder for the given scope.
    pub fn new(scope: &OwnerScope, name: impl Into<String>, parent_path: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id: scope.owner_id(),
            drive_id: scope.drive_id(),
            name: name.into(),
            parent_path: parent_path.into(),
            is_deleted: false,
            deleted_at: None,
            is_starred: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// The folder's full path, derived from its parent path and name.
    pub fn full_path(&self) -> String {
        path::full_path(&self.parent_path, &self.name)
    }

    /// The owning scope of this folder.
    pub fn scope(&self) -> OwnerScope {
        match self.drive_id {
            Some(drive_id) => OwnerScope::Drive(drive_id),
            None => OwnerScope::User(self.owner_id.unwrap_or_default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_path_respects_root_parent() {
        let scope = OwnerScope::User(Uuid::new_v4());
        let top = Folder::new(&scope, "Docs", "/");
        let nested = Folder::new(&scope, "Q3", "/Docs");
        assert_eq!(top.full_path(), "/Docs");
        assert_eq!(nested.full_path(), "/Docs/Q3");
    }
}
