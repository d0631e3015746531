//! Sharing: grants keyed by email plus token link access.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use nimbus_core::config::auth::AuthConfig;
use nimbus_core::config::storage::StorageConfig;
use nimbus_core::error::AppError;
use nimbus_core::events::DomainEvent;
use nimbus_core::result::AppResult;
use nimbus_core::traits::blob::BlobStore;
use nimbus_core::traits::mailer::Mailer;
use nimbus_core::traits::publisher::EventPublisher;
use nimbus_database::{FileStore, FolderStore, ShareStore};
use nimbus_entity::file::File;
use nimbus_entity::folder::Folder;
use nimbus_entity::share::{ResourceType, Share, SharePermission};

use crate::context::RequestContext;
use crate::share::link::LinkService;

/// A share joined with its resource's display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedItem {
    /// The share record.
    #[serde(flatten)]
    pub share: Share,
    /// Display name of the shared resource, if it still exists.
    pub resource_name: Option<String>,
}

/// What a share token grants to its bearer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareAccess {
    /// The share record.
    pub share: Share,
    /// The shared file, when the share points at a file.
    pub file: Option<File>,
    /// The shared folder, when the share points at a folder.
    pub folder: Option<Folder>,
    /// Signed retrieval URL for file shares.
    pub url: Option<String>,
}

/// Manages shares.
#[derive(Debug, Clone)]
pub struct ShareService {
    shares: Arc<dyn ShareStore>,
    files: Arc<dyn FileStore>,
    folders: Arc<dyn FolderStore>,
    blobs: Arc<dyn BlobStore>,
    mailer: Arc<dyn Mailer>,
    publisher: Arc<dyn EventPublisher>,
    link: LinkService,
    auth: AuthConfig,
    storage: StorageConfig,
}

impl ShareService {
    /// Creates a new share service.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        shares: Arc<dyn ShareStore>,
        files: Arc<dyn FileStore>,
        folders: Arc<dyn FolderStore>,
        blobs: Arc<dyn BlobStore>,
        mailer: Arc<dyn Mailer>,
        publisher: Arc<dyn EventPublisher>,
        auth: AuthConfig,
        storage: StorageConfig,
    ) -> Self {
        Self {
            shares,
            files,
            folders,
            blobs,
            mailer,
            publisher,
            link: LinkService::new(),
            auth,
            storage,
        }
    }

    /// Shares a personal file or folder with an email address.
    ///
    /// Mail and realtime notification are both best-effort: the share is
    /// created even when neither reaches the recipient.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        resource_type: ResourceType,
        resource_id: Uuid,
        shared_with: &str,
        permission: SharePermission,
        expires_at: Option<DateTime<Utc>>,
    ) -> AppResult<Share> {
        let shared_with = shared_with.trim().to_lowercase();
        if shared_with.is_empty() || !shared_with.contains('@') {
            return Err(AppError::validation("Invalid recipient email"));
        }

        let resource_name = self
            .resolve_owned(ctx, resource_type, resource_id)
            .await?;

        let share = Share {
            id: Uuid::new_v4(),
            resource_type,
            resource_id,
            shared_by: ctx.user_id,
            shared_with: shared_with.clone(),
            token: self.link.generate_token(),
            permission,
            expires_at,
            created_at: Utc::now(),
        };
        let share = self.shares.insert(&share).await?;

        let link = format!("{}/shared/{}", self.auth.client_url, share.token);
        if let Err(e) = self
            .mailer
            .send_share_notification(
                &shared_with,
                &ctx.email,
                &resource_name,
                resource_type.as_str(),
                &link,
            )
            .await
        {
            warn!(to = %shared_with, error = %e, "Share notification mail failed, continuing");
        }
        self.publisher.publish_to_email(
            &shared_with,
            DomainEvent::ShareCreated {
                share_id: share.id,
                resource_type: resource_type.as_str().to_string(),
                resource_name: resource_name.clone(),
                shared_by: ctx.email.clone(),
            },
        );

        info!(
            user_id = %ctx.user_id,
            share_id = %share.id,
            resource_type = resource_type.as_str(),
            shared_with = %shared_with,
            "Share created"
        );
        Ok(share)
    }

    /// Shares granted to the requester's email.
    pub async fn list_received(&self, ctx: &RequestContext) -> AppResult<Vec<SharedItem>> {
        let shares = self.shares.list_for_recipient(&ctx.email).await?;
        self.join_names(shares).await
    }

    /// Shares the requester has created.
    pub async fn list_sent(&self, ctx: &RequestContext) -> AppResult<Vec<SharedItem>> {
        let shares = self.shares.list_by_creator(ctx.user_id).await?;
        self.join_names(shares).await
    }

    /// Revokes a share. Only its creator may do this.
    pub async fn revoke(&self, ctx: &RequestContext, share_id: Uuid) -> AppResult<()> {
        let share = self
            .shares
            .find_by_id(share_id)
            .await?
            .ok_or_else(|| AppError::not_found("Share not found"))?;
        if share.shared_by != ctx.user_id {
            return Err(AppError::access_denied("Only the share's creator may revoke it"));
        }
        self.shares.delete_by_id(share_id).await?;
        info!(user_id = %ctx.user_id, share_id = %share_id, "Share revoked");
        Ok(())
    }

    /// Resolves a share token for its bearer. An unknown token is not
    /// found; a known-but-expired one is gone.
    pub async fn access_by_token(&self, token: &str) -> AppResult<ShareAccess> {
        let share = self
            .shares
            .find_by_token(token)
            .await?
            .ok_or_else(|| AppError::not_found("Share not found"))?;
        if share.is_expired(Utc::now()) {
            return Err(AppError::gone("This share link has expired"));
        }

        match share.resource_type {
            ResourceType::File => {
                let file = self
                    .files
                    .find_by_id(share.resource_id)
                    .await?
                    .filter(|f| !f.is_deleted)
                    .ok_or_else(|| AppError::not_found("Shared file no longer exists"))?;
                let ttl = Duration::from_secs(self.storage.signed_url_ttl_seconds);
                let url = match share.permission {
                    SharePermission::View => {
                        self.blobs.signed_url(&file.blob_key, ttl, None).await?
                    }
                    SharePermission::Download | SharePermission::Edit => {
                        let disposition =
                            format!("attachment; filename=\"{}\"", file.file_name);
                        self.blobs
                            .signed_url(&file.blob_key, ttl, Some(&disposition))
                            .await?
                    }
                };
                Ok(ShareAccess {
                    share,
                    file: Some(file),
                    folder: None,
                    url: Some(url),
                })
            }
            ResourceType::Folder => {
                let folder = self
                    .folders
                    .find_by_id(share.resource_id)
                    .await?
                    .filter(|f| !f.is_deleted)
                    .ok_or_else(|| AppError::not_found("Shared folder no longer exists"))?;
                Ok(ShareAccess {
                    share,
                    file: None,
                    folder: Some(folder),
                    url: None,
                })
            }
        }
    }

    /// Resolve the resource for a new share: it must be live, personal,
    /// and owned by the requester. Returns its display name.
    async fn resolve_owned(
        &self,
        ctx: &RequestContext,
        resource_type: ResourceType,
        resource_id: Uuid,
    ) -> AppResult<String> {
        let (name, owner_id) = match resource_type {
            ResourceType::File => self
                .files
                .find_by_id(resource_id)
                .await?
                .filter(|f| !f.is_deleted)
                .map(|f| (f.file_name, f.owner_id))
                .ok_or_else(|| AppError::not_found("Shared resource not found"))?,
            ResourceType::Folder => self
                .folders
                .find_by_id(resource_id)
                .await?
                .filter(|f| !f.is_deleted)
                .map(|f| (f.name.clone(), f.owner_id))
                .ok_or_else(|| AppError::not_found("Shared resource not found"))?,
        };
        if owner_id != Some(ctx.user_id) {
            return Err(AppError::access_denied(
                "Only the owner may share this resource",
            ));
        }
        Ok(name)
    }

    async fn resource_name(
        &self,
        resource_type: ResourceType,
        resource_id: Uuid,
    ) -> AppResult<Option<String>> {
        Ok(match resource_type {
            ResourceType::File => self
                .files
                .find_by_id(resource_id)
                .await?
                .filter(|f| !f.is_deleted)
                .map(|f| f.file_name),
            ResourceType::Folder => self
                .folders
                .find_by_id(resource_id)
                .await?
                .filter(|f| !f.is_deleted)
                .map(|f| f.name),
        })
    }

    async fn join_names(&self, shares: Vec<Share>) -> AppResult<Vec<SharedItem>> {
        let mut items = Vec::with_capacity(shares.len());
        for share in shares {
            let resource_name = self
                .resource_name(share.resource_type, share.resource_id)
                .await?;
            items.push(SharedItem {
                share,
                resource_name,
            });
        }
        Ok(items)
    }
}
