//! Request DTOs with validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use nimbus_entity::drive::DriveRole;
use nimbus_entity::share::{ResourceType, SharePermission};
use nimbus_service::ConflictAction;

/// Create folder request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFolderRequest {
    /// Folder name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Parent path; defaults to the root.
    #[serde(default = "default_path")]
    pub parent_path: String,
    /// Shared-drive id; absent means personal space.
    pub drive_id: Option<Uuid>,
}

/// Rename request, shared by folders and files.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RenameRequest {
    /// New name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

/// Move request, shared by folders and files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Destination path within the same scope.
    pub new_path: String,
}

/// Create share request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateShareRequest {
    /// What kind of resource is shared.
    pub resource_type: ResourceType,
    /// The shared resource.
    pub resource_id: Uuid,
    /// Recipient email.
    pub shared_with: String,
    /// Granted permission.
    pub permission: SharePermission,
    /// Optional expiry.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Create or update drive request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DriveRequest {
    /// Drive name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Drive description.
    #[serde(default)]
    pub description: String,
}

/// Add or update a drive member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveMemberRequest {
    /// Member email.
    pub email: String,
    /// Member role.
    pub role: DriveRole,
}

/// Remove a drive member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveMemberRequest {
    /// Member email.
    pub email: String,
}

/// Move a file between personal space and a drive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossScopeMoveRequest {
    /// Destination path in the target scope; defaults to the root.
    #[serde(default = "default_path")]
    pub dest_path: String,
}

/// Query parameters for the folder existence probe.
#[derive(Debug, Clone, Deserialize)]
pub struct ExistsQuery {
    /// Folder name to look for.
    pub name: String,
    /// Parent path to look under; defaults to the root.
    #[serde(default = "default_path")]
    pub parent_path: String,
    /// Shared-drive id; absent means personal space.
    pub drive_id: Option<Uuid>,
}

/// Query parameters accepted by the zip import endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportQuery {
    /// Destination path; defaults to the root.
    #[serde(default = "default_path")]
    pub path: String,
    /// Shared-drive id; absent means personal space.
    pub drive_id: Option<Uuid>,
    /// What to do when the archive's root folder name is taken.
    #[serde(default)]
    pub conflict: ConflictAction,
    /// Root folder name override; the archive's file name otherwise.
    pub custom_name: Option<String>,
}

impl ImportQuery {
    /// The name the imported root folder should get.
    pub fn root_name<'a>(&'a self, archive_name: &'a str) -> &'a str {
        match self.custom_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => archive_name,
        }
    }
}

/// Search query parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    /// Search string.
    pub q: String,
}

fn default_path() -> String {
    "/".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_name_overrides_the_archive_name() {
        let query = ImportQuery {
            path: "/".into(),
            drive_id: None,
            conflict: ConflictAction::default(),
            custom_name: Some("Photos 2024".into()),
        };
        assert_eq!(query.root_name("upload.zip"), "Photos 2024");
    }

    #[test]
    fn blank_custom_name_falls_back_to_the_archive_name() {
        let mut query = ImportQuery {
            path: "/".into(),
            drive_id: None,
            conflict: ConflictAction::default(),
            custom_name: None,
        };
        assert_eq!(query.root_name("upload.zip"), "upload.zip");
        query.custom_name = Some("   ".into());
        assert_eq!(query.root_name("upload.zip"), "upload.zip");
    }
}
