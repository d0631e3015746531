//! Domain events published to the realtime hub.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events the hierarchy and sharing layers publish to online users.
///
/// Serialized with a `type` tag so realtime clients can dispatch on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// A file finished uploading into a path the user can see.
    FileUploaded {
        /// The new file's id.
        file_id: Uuid,
        /// File name.
        file_name: String,
        /// Containing folder path.
        folder_path: String,
    },
    /// A folder was moved or renamed; clients should refresh both paths.
    FolderMoved {
        /// The moved folder's id.
        folder_id: Uuid,
        /// Full path before the move.
        old_path: String,
        /// Full path after the move.
        new_path: String,
    },
    /// A resource was shared with the recipient.
    ShareCreated {
        /// The share's id.
        share_id: Uuid,
        /// "file" or "folder".
        resource_type: String,
        /// Display name of the shared resource.
        resource_name: String,
        /// Email of the user who shared it.
        shared_by: String,
    },
    /// The recipient was added to a shared drive.
    DriveMemberAdded {
        /// The drive's id.
        drive_id: Uuid,
        /// Drive display name.
        drive_name: String,
        /// Granted role.
        role: String,
        /// Email of the admin who added them.
        added_by: String,
    },
}
