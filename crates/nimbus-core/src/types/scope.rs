//! Owning scope for folders and files.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who a folder or file belongs to: a personal owner or a shared drive.
/// The two are mutually exclusive; drive-owned records carry a null
/// personal owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum OwnerScope {
    /// Personal drive of a single user.
    User(Uuid),
    /// A shared drive.
    Drive(Uuid),
}

impl OwnerScope {
    /// The personal owner column value for this scope.
    pub fn owner_id(&self) -> Option<Uuid> {
        match self {
            Self::User(id) => Some(*id),
            Self::Drive(_) => None,
        }
    }

    /// The shared-drive column value for this scope.
    pub fn drive_id(&self) -> Option<Uuid> {
        match self {
            Self::User(_) => None,
            Self::Drive(id) => Some(*id),
        }
    }
}

/// Soft-delete filter applied to store queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletedFilter {
    /// Only records that are not in the trash.
    LiveOnly,
    /// Only records that are in the trash.
    DeletedOnly,
    /// Both live and trashed records.
    Any,
}
