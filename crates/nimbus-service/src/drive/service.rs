//! Shared drives: collectively owned containers with role-based members.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use nimbus_core::error::AppError;
use nimbus_core::events::DomainEvent;
use nimbus_core::path;
use nimbus_core::result::AppResult;
use nimbus_core::traits::blob::BlobStore;
use nimbus_core::traits::mailer::Mailer;
use nimbus_core::traits::publisher::EventPublisher;
use nimbus_core::types::{DeletedFilter, OwnerScope};
use nimbus_database::{DriveStore, FileStore, FolderStore};
use nimbus_entity::drive::{DriveMember, DriveRole, SharedDrive};
use nimbus_entity::file::File;
use nimbus_entity::folder::Folder;

use crate::access::AccessControl;
use crate::context::RequestContext;

/// Manages shared drives and their membership.
#[derive(Debug, Clone)]
pub struct DriveService {
    drives: Arc<dyn DriveStore>,
    folders: Arc<dyn FolderStore>,
    files: Arc<dyn FileStore>,
    blobs: Arc<dyn BlobStore>,
    access: AccessControl,
    mailer: Arc<dyn Mailer>,
    publisher: Arc<dyn EventPublisher>,
}

impl DriveService {
    /// Creates a new drive service.
    pub fn new(
        drives: Arc<dyn DriveStore>,
        folders: Arc<dyn FolderStore>,
        files: Arc<dyn FileStore>,
        blobs: Arc<dyn BlobStore>,
        access: AccessControl,
        mailer: Arc<dyn Mailer>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            drives,
            folders,
            files,
            blobs,
            access,
            mailer,
            publisher,
        }
    }

    /// Creates a drive with the requester as its first admin.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        name: &str,
        description: &str,
    ) -> AppResult<SharedDrive> {
        if name.trim().is_empty() {
            return Err(AppError::validation("Drive name cannot be empty"));
        }
        let drive = self
            .drives
            .insert(&SharedDrive::new(name.trim(), description, ctx.user_id, &ctx.email))
            .await?;
        info!(user_id = %ctx.user_id, drive_id = %drive.id, name = %drive.name, "Drive created");
        Ok(drive)
    }

    /// Drives the requester is a member of.
    pub async fn list(&self, ctx: &RequestContext) -> AppResult<Vec<SharedDrive>> {
        self.drives.list_for_member(&ctx.email).await
    }

    /// Gets a drive; members only.
    pub async fn get(&self, ctx: &RequestContext, drive_id: Uuid) -> AppResult<SharedDrive> {
        let (drive, _) = self.access.require_drive_member(ctx, drive_id).await?;
        Ok(drive)
    }

    /// Updates name and description; admins only.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        drive_id: Uuid,
        name: &str,
        description: &str,
    ) -> AppResult<SharedDrive> {
        if name.trim().is_empty() {
            return Err(AppError::validation("Drive name cannot be empty"));
        }
        let mut drive = self.access.require_drive_admin(ctx, drive_id).await?;
        drive.name = name.trim().to_string();
        drive.description = description.to_string();
        let drive = self.drives.update(&drive).await?;
        info!(user_id = %ctx.user_id, drive_id = %drive_id, "Drive updated");
        Ok(drive)
    }

    /// Adds a member by email; admins only. Invitation mail and realtime
    /// notification are best-effort.
    pub async fn add_member(
        &self,
        ctx: &RequestContext,
        drive_id: Uuid,
        email: &str,
        role: DriveRole,
    ) -> AppResult<SharedDrive> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::validation("Invalid member email"));
        }
        let mut drive = self.access.require_drive_admin(ctx, drive_id).await?;
        if drive.is_member(&email) {
            return Err(AppError::duplicate_name(format!(
                "{email} is already a member of this drive"
            )));
        }
        drive.members.0.push(DriveMember::new(None, &email, role));
        let drive = self.drives.update(&drive).await?;

        if let Err(e) = self
            .mailer
            .send_drive_invitation(&email, &ctx.email, &drive.name, role.as_str())
            .await
        {
            warn!(to = %email, error = %e, "Drive invitation mail failed, continuing");
        }
        self.publisher.publish_to_email(
            &email,
            DomainEvent::DriveMemberAdded {
                drive_id,
                drive_name: drive.name.clone(),
                role: role.as_str().to_string(),
                added_by: ctx.email.clone(),
            },
        );

        info!(
            user_id = %ctx.user_id,
            drive_id = %drive_id,
            member = %email,
            role = role.as_str(),
            "Drive member added"
        );
        Ok(drive)
    }

    /// Changes a member's role; admins only. The owner's role is fixed.
    pub async fn update_member_role(
        &self,
        ctx: &RequestContext,
        drive_id: Uuid,
        email: &str,
        role: DriveRole,
    ) -> AppResult<SharedDrive> {
        let email = email.trim().to_lowercase();
        let mut drive = self.access.require_drive_admin(ctx, drive_id).await?;
        if drive
            .member(&email)
            .is_some_and(|m| m.user_id == Some(drive.owner_id))
        {
            return Err(AppError::access_denied("The drive owner's role cannot change"));
        }
        let member = drive
            .members
            .0
            .iter_mut()
            .find(|m| m.email == email)
            .ok_or_else(|| AppError::not_found("Drive member not found"))?;
        member.role = role;
        let drive = self.drives.update(&drive).await?;
        info!(
            user_id = %ctx.user_id,
            drive_id = %drive_id,
            member = %email,
            role = role.as_str(),
            "Drive member role updated"
        );
        Ok(drive)
    }

    /// Removes a member; admins only. The owner cannot be removed.
    pub async fn remove_member(
        &self,
        ctx: &RequestContext,
        drive_id: Uuid,
        email: &str,
    ) -> AppResult<SharedDrive> {
        let email = email.trim().to_lowercase();
        let mut drive = self.access.require_drive_admin(ctx, drive_id).await?;
        if drive
            .member(&email)
            .is_some_and(|m| m.user_id == Some(drive.owner_id))
        {
            return Err(AppError::access_denied("The drive owner cannot be removed"));
        }
        let before = drive.members.len();
        drive.members.0.retain(|m| m.email != email);
        if drive.members.len() == before {
            return Err(AppError::not_found("Drive member not found"));
        }
        let drive = self.drives.update(&drive).await?;
        info!(user_id = %ctx.user_id, drive_id = %drive_id, member = %email, "Drive member removed");
        Ok(drive)
    }

    /// Deletes a drive and all its content. Only the drive's owner may
    /// do this; blobs are dropped best-effort before the records.
    pub async fn delete(&self, ctx: &RequestContext, drive_id: Uuid) -> AppResult<()> {
        let drive = self
            .drives
            .find_by_id(drive_id)
            .await?
            .ok_or_else(|| AppError::not_found("Shared drive not found"))?;
        if drive.owner_id != ctx.user_id {
            return Err(AppError::access_denied("Only the drive's owner may delete it"));
        }

        let files = self.files.list_by_drive(drive_id).await?;
        for file in &files {
            if let Err(e) = self.blobs.delete(&file.blob_key).await {
                warn!(blob_key = %file.blob_key, error = %e, "Blob delete failed, continuing");
            }
        }
        self.files.delete_by_drive(drive_id).await?;
        self.folders.delete_by_drive(drive_id).await?;
        self.drives.delete_by_id(drive_id).await?;

        info!(
            user_id = %ctx.user_id,
            drive_id = %drive_id,
            files = files.len(),
            "Drive deleted"
        );
        Ok(())
    }

    /// Lists the live folders and files at a path inside the drive;
    /// members only.
    pub async fn contents(
        &self,
        ctx: &RequestContext,
        drive_id: Uuid,
        folder_path: &str,
    ) -> AppResult<(Vec<Folder>, Vec<File>)> {
        self.access.require_drive_member(ctx, drive_id).await?;
        let scope = OwnerScope::Drive(drive_id);
        let folder_path = path::normalize(folder_path);
        let folders = self.folders.list_children(&scope, &folder_path).await?;
        let files = self.files.list_in_folder(&scope, &folder_path).await?;
        Ok((folders, files))
    }

    /// Moves a personal file into the drive. Requires owning the file and
    /// an editing role in the drive. The blob stays where it is; only the
    /// metadata changes hands.
    pub async fn move_file_in(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
        drive_id: Uuid,
        dest_path: &str,
    ) -> AppResult<File> {
        let mut file = self
            .files
            .find_by_id(file_id)
            .await?
            .filter(|f| !f.is_deleted)
            .ok_or_else(|| AppError::not_found("File not found"))?;
        if file.owner_id != Some(ctx.user_id) {
            return Err(AppError::access_denied("Not the owner of this file"));
        }
        let drive_scope = OwnerScope::Drive(drive_id);
        self.access.require_write(ctx, &drive_scope).await?;

        let dest_path = path::normalize(dest_path);
        self.require_dest(&drive_scope, &dest_path, &file.file_name)
            .await?;

        file.owner_id = None;
        file.drive_id = Some(drive_id);
        file.folder_path = dest_path;
        let file = self.files.update(&file).await?;

        info!(
            user_id = %ctx.user_id,
            file_id = %file_id,
            drive_id = %drive_id,
            folder_path = %file.folder_path,
            "File moved into drive"
        );
        Ok(file)
    }

    /// Moves a drive file back into the requester's personal space.
    /// Requires an editing role in the drive.
    pub async fn move_file_out(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
        dest_path: &str,
    ) -> AppResult<File> {
        let mut file = self
            .files
            .find_by_id(file_id)
            .await?
            .filter(|f| !f.is_deleted)
            .ok_or_else(|| AppError::not_found("File not found"))?;
        let Some(drive_id) = file.drive_id else {
            return Err(AppError::validation("File is not in a shared drive"));
        };
        self.access
            .require_write(ctx, &OwnerScope::Drive(drive_id))
            .await?;

        let personal = OwnerScope::User(ctx.user_id);
        let dest_path = path::normalize(dest_path);
        self.require_dest(&personal, &dest_path, &file.file_name)
            .await?;

        file.drive_id = None;
        file.owner_id = Some(ctx.user_id);
        file.folder_path = dest_path;
        let file = self.files.update(&file).await?;

        info!(
            user_id = %ctx.user_id,
            file_id = %file_id,
            drive_id = %drive_id,
            folder_path = %file.folder_path,
            "File moved out of drive"
        );
        Ok(file)
    }

    /// Destination checks shared by both cross-scope moves: the folder
    /// must exist (the root always does) and the name must be free.
    async fn require_dest(
        &self,
        scope: &OwnerScope,
        dest_path: &str,
        file_name: &str,
    ) -> AppResult<()> {
        if dest_path != path::ROOT {
            let found = self
                .folders
                .find_by_location(
                    scope,
                    path::leaf_of(dest_path),
                    path::parent_of(dest_path),
                    DeletedFilter::LiveOnly,
                )
                .await?;
            if found.is_none() {
                return Err(AppError::not_found("Destination folder not found"));
            }
        }
        let taken = self
            .files
            .list_in_folder(scope, dest_path)
            .await?
            .iter()
            .any(|f| f.file_name == file_name);
        if taken {
            return Err(AppError::duplicate_name(format!(
                "A file named '{file_name}' already exists at the destination"
            )));
        }
        Ok(())
    }
}
