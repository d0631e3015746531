//! Shared-drive membership types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of a member within a shared drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriveRole {
    /// Manages membership and content.
    Admin,
    /// Mutates content.
    Editor,
    /// Read-only access.
    Viewer,
}

impl DriveRole {
    /// Whether this role may mutate drive content.
    pub fn can_edit(&self) -> bool {
        matches!(self, Self::Admin | Self::Editor)
    }

    /// Lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Editor => "editor",
            Self::Viewer => "viewer",
        }
    }
}

impl Default for DriveRole {
    fn default() -> Self {
        Self::Editor
    }
}

/// A member of a shared drive, keyed by email. The linked user id is
/// filled in lazily when the invited address registers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveMember {
    /// Linked account, if the email belongs to a registered user.
    pub user_id: Option<Uuid>,
    /// Member email address.
    pub email: String,
    /// Granted role.
    #[serde(default)]
    pub role: DriveRole,
    /// When the member joined.
    pub joined_at: DateTime<Utc>,
}

impl DriveMember {
    /// Build a member entry joined now.
    pub fn new(user_id: Option<Uuid>, email: impl Into<String>, role: DriveRole) -> Self {
        Self {
            user_id,
            email: email.into(),
            role,
            joined_at: Utc::now(),
        }
    }
}
