//! Shared-drive entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

use super::member::{DriveMember, DriveRole};

/// A shared drive: a container of folders/files owned collectively by a
/// member list instead of a single user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SharedDrive {
    /// Unique drive identifier.
    pub id: Uuid,
    /// Drive display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// User who created the drive; the only one who may delete it.
    pub owner_id: Uuid,
    /// Member list, stored as a JSON document.
    pub members: Json<Vec<DriveMember>>,
    /// When the drive was created.
    pub created_at: DateTime<Utc>,
}

impl SharedDrive {
    /// Build a fresh drive whose creator is its first admin member.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        owner_id: Uuid,
        owner_email: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            owner_id,
            members: Json(vec![DriveMember::new(
                Some(owner_id),
                owner_email,
                DriveRole::Admin,
            )]),
            created_at: Utc::now(),
        }
    }

    /// Look up a member by email.
    pub fn member(&self, email: &str) -> Option<&DriveMember> {
        self.members.iter().find(|m| m.email == email)
    }

    /// Whether the given email belongs to a member.
    pub fn is_member(&self, email: &str) -> bool {
        self.member(email).is_some()
    }
}
