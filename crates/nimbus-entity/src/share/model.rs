//! Share entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Kind of resource a share points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum ResourceType {
    /// A single file.
    File,
    /// A folder subtree.
    Folder,
}

impl ResourceType {
    /// Lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Folder => "folder",
        }
    }
}

/// Permission level granted by a share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum SharePermission {
    /// Read-only preview.
    View,
    /// Preview plus download.
    Download,
    /// Full edit access.
    Edit,
}

impl Default for SharePermission {
    fn default() -> Self {
        Self::Download
    }
}

/// A grant of one resource to an email address, carrying an opaque bearer
/// token for link-based access.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Share {
    /// Unique share identifier.
    pub id: Uuid,
    /// Kind of resource shared.
    pub resource_type: ResourceType,
    /// The shared resource's id.
    pub resource_id: Uuid,
    /// User who created the share.
    pub shared_by: Uuid,
    /// Recipient email address.
    pub shared_with: String,
    /// Opaque bearer token for link-based access.
    pub token: String,
    /// Granted permission level.
    pub permission: SharePermission,
    /// Optional expiry; a share past this moment is `Gone`.
    pub expires_at: Option<DateTime<Utc>>,
    /// When the share was created.
    pub created_at: DateTime<Utc>,
}

impl Share {
    /// Whether the share has expired.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| now > at)
    }
}
