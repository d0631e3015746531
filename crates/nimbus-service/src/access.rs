//! Scope access checks.
//!
//! Personal records are visible only to their owner. Shared-drive records
//! are visible to every drive member; mutation additionally requires an
//! editing role, and membership management requires admin.

use std::sync::Arc;

use nimbus_core::error::AppError;
use nimbus_core::result::AppResult;
use nimbus_core::types::OwnerScope;
use nimbus_database::DriveStore;
use nimbus_entity::drive::{DriveRole, SharedDrive};

use crate::context::RequestContext;

/// Resolves whether a request may touch a given owning scope.
#[derive(Debug, Clone)]
pub struct AccessControl {
    drives: Arc<dyn DriveStore>,
}

impl AccessControl {
    /// Creates a new access resolver.
    pub fn new(drives: Arc<dyn DriveStore>) -> Self {
        Self { drives }
    }

    /// Require read access to a scope.
    pub async fn require_read(&self, ctx: &RequestContext, scope: &OwnerScope) -> AppResult<()> {
        match scope {
            OwnerScope::User(owner_id) if *owner_id == ctx.user_id => Ok(()),
            OwnerScope::User(_) => Err(AppError::access_denied("Not the owner of this resource")),
            OwnerScope::Drive(drive_id) => {
                self.require_drive_member(ctx, *drive_id).await.map(|_| ())
            }
        }
    }

    /// Require write access to a scope. Drive viewers are read-only.
    pub async fn require_write(&self, ctx: &RequestContext, scope: &OwnerScope) -> AppResult<()> {
        match scope {
            OwnerScope::User(owner_id) if *owner_id == ctx.user_id => Ok(()),
            OwnerScope::User(_) => Err(AppError::access_denied("Not the owner of this resource")),
            OwnerScope::Drive(drive_id) => {
                let (_, role) = self.require_drive_member(ctx, *drive_id).await?;
                if role.can_edit() {
                    Ok(())
                } else {
                    Err(AppError::access_denied(
                        "Viewers cannot modify drive content",
                    ))
                }
            }
        }
    }

    /// Require that the requester is a member of the drive; returns the
    /// drive and the member's role.
    pub async fn require_drive_member(
        &self,
        ctx: &RequestContext,
        drive_id: uuid::Uuid,
    ) -> AppResult<(SharedDrive, DriveRole)> {
        let drive = self
            .drives
            .find_by_id(drive_id)
            .await?
            .ok_or_else(|| AppError::not_found("Shared drive not found"))?;
        let role = drive
            .member(&ctx.email)
            .map(|m| m.role)
            .ok_or_else(|| AppError::access_denied("Not a member of this drive"))?;
        Ok((drive, role))
    }

    /// Require that the requester is a drive admin.
    pub async fn require_drive_admin(
        &self,
        ctx: &RequestContext,
        drive_id: uuid::Uuid,
    ) -> AppResult<SharedDrive> {
        let (drive, role) = self.require_drive_member(ctx, drive_id).await?;
        if role == DriveRole::Admin {
            Ok(drive)
        } else {
            Err(AppError::access_denied("Drive admin role required"))
        }
    }
}
