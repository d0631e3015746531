//! In-memory shared-drive store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use nimbus_core::error::AppError;
use nimbus_core::result::AppResult;
use nimbus_entity::drive::SharedDrive;

use crate::store::DriveStore;

/// Shared-drive store holding records in process memory.
#[derive(Debug, Default)]
pub struct MemoryDriveStore {
    drives: RwLock<HashMap<Uuid, SharedDrive>>,
}

impl MemoryDriveStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DriveStore for MemoryDriveStore {
    async fn insert(&self, drive: &SharedDrive) -> AppResult<SharedDrive> {
        self.drives.write().await.insert(drive.id, drive.clone());
        Ok(drive.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<SharedDrive>> {
        Ok(self.drives.read().await.get(&id).cloned())
    }

    async fn list_for_member(&self, email: &str) -> AppResult<Vec<SharedDrive>> {
        let mut drives: Vec<SharedDrive> = self
            .drives
            .read()
            .await
            .values()
            .filter(|d| d.is_member(email))
            .cloned()
            .collect();
        drives.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(drives)
    }

    async fn update(&self, drive: &SharedDrive) -> AppResult<SharedDrive> {
        let mut drives = self.drives.write().await;
        if !drives.contains_key(&drive.id) {
            return Err(AppError::not_found(format!("Drive {} not found", drive.id)));
        }
        drives.insert(drive.id, drive.clone());
        Ok(drive.clone())
    }

    async fn delete_by_id(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.drives.write().await.remove(&id).is_some())
    }
}
