//! In-memory share store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use nimbus_core::result::AppResult;
use nimbus_entity::share::Share;

use crate::store::ShareStore;

/// Share store holding records in process memory.
#[derive(Debug, Default)]
pub struct MemoryShareStore {
    shares: RwLock<HashMap<Uuid, Share>>,
}

impl MemoryShareStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ShareStore for MemoryShareStore {
    async fn insert(&self, share: &Share) -> AppResult<Share> {
        self.shares.write().await.insert(share.id, share.clone());
        Ok(share.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Share>> {
        Ok(self.shares.read().await.get(&id).cloned())
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<Share>> {
        Ok(self
            .shares
            .read()
            .await
            .values()
            .find(|s| s.token == token)
            .cloned())
    }

    async fn list_for_recipient(&self, email: &str) -> AppResult<Vec<Share>> {
        let mut shares: Vec<Share> = self
            .shares
            .read()
            .await
            .values()
            .filter(|s| s.shared_with == email)
            .cloned()
            .collect();
        shares.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(shares)
    }

    async fn list_by_creator(&self, user_id: Uuid) -> AppResult<Vec<Share>> {
        let mut shares: Vec<Share> = self
            .shares
            .read()
            .await
            .values()
            .filter(|s| s.shared_by == user_id)
            .cloned()
            .collect();
        shares.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(shares)
    }

    async fn delete_by_id(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.shares.write().await.remove(&id).is_some())
    }
}
