//! In-memory folder store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use nimbus_core::error::AppError;
use nimbus_core::path;
use nimbus_core::result::AppResult;
use nimbus_core::types::{DeletedFilter, OwnerScope};
use nimbus_entity::folder::Folder;

use crate::store::FolderStore;

use super::matches_filter;

/// Folder store holding records in process memory.
#[derive(Debug, Default)]
pub struct MemoryFolderStore {
    folders: RwLock<HashMap<Uuid, Folder>>,
}

impl MemoryFolderStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn in_scope(folder: &Folder, scope: &OwnerScope) -> bool {
        folder.owner_id == scope.owner_id() && folder.drive_id == scope.drive_id()
    }

    fn in_subtree(folder: &Folder, scope: &OwnerScope, prefix: &str) -> bool {
        Self::in_scope(folder, scope) && path::is_descendant_or_self(&folder.parent_path, prefix)
    }
}

#[async_trait]
impl FolderStore for MemoryFolderStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Folder>> {
        Ok(self.folders.read().await.get(&id).cloned())
    }

    async fn find_by_location(
        &self,
        scope: &OwnerScope,
        name: &str,
        parent_path: &str,
        filter: DeletedFilter,
    ) -> AppResult<Option<Folder>> {
        Ok(self
            .folders
            .read()
            .await
            .values()
            .find(|f| {
                Self::in_scope(f, scope)
                    && f.name == name
                    && f.parent_path == parent_path
                    && matches_filter(f.is_deleted, filter)
            })
            .cloned())
    }

    async fn list_children(
        &self,
        scope: &OwnerScope,
        parent_path: &str,
    ) -> AppResult<Vec<Folder>> {
        let mut children: Vec<Folder> = self
            .folders
            .read()
            .await
            .values()
            .filter(|f| Self::in_scope(f, scope) && f.parent_path == parent_path && !f.is_deleted)
            .cloned()
            .collect();
        children.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(children)
    }

    async fn insert(&self, folder: &Folder) -> AppResult<Folder> {
        self.folders
            .write()
            .await
            .insert(folder.id, folder.clone());
        Ok(folder.clone())
    }

    async fn upsert_by_location(
        &self,
        scope: &OwnerScope,
        name: &str,
        parent_path: &str,
    ) -> AppResult<Folder> {
        let mut folders = self.folders.write().await;
        if let Some(existing) = folders.values_mut().find(|f| {
            Self::in_scope(f, scope)
                && f.name == name
                && f.parent_path == parent_path
                && !f.is_deleted
        }) {
            existing.updated_at = Utc::now();
            return Ok(existing.clone());
        }
        let folder = Folder::new(scope, name, parent_path);
        folders.insert(folder.id, folder.clone());
        Ok(folder)
    }

    async fn update(&self, folder: &Folder) -> AppResult<Folder> {
        let mut folders = self.folders.write().await;
        if !folders.contains_key(&folder.id) {
            return Err(AppError::not_found(format!(
                "Folder {} not found",
                folder.id
            )));
        }
        let mut updated = folder.clone();
        updated.updated_at = Utc::now();
        folders.insert(updated.id, updated.clone());
        Ok(updated)
    }

    async fn rewrite_descendant_parent_paths(
        &self,
        scope: &OwnerScope,
        old_prefix: &str,
        new_prefix: &str,
    ) -> AppResult<u64> {
        let mut count = 0;
        for folder in self.folders.write().await.values_mut() {
            if Self::in_subtree(folder, scope, old_prefix) {
                folder.parent_path = path::replace_prefix(&folder.parent_path, old_prefix, new_prefix);
                folder.updated_at = Utc::now();
                count += 1;
            }
        }
        Ok(count)
    }

    async fn find_descendants(
        &self,
        scope: &OwnerScope,
        prefix: &str,
        filter: DeletedFilter,
    ) -> AppResult<Vec<Folder>> {
        let mut found: Vec<Folder> = self
            .folders
            .read()
            .await
            .values()
            .filter(|f| Self::in_subtree(f, scope, prefix) && matches_filter(f.is_deleted, filter))
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            a.parent_path
                .cmp(&b.parent_path)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(found)
    }

    async fn delete_descendants(&self, scope: &OwnerScope, prefix: &str) -> AppResult<u64> {
        let mut folders = self.folders.write().await;
        let before = folders.len();
        folders.retain(|_, f| !Self::in_subtree(f, scope, prefix));
        Ok((before - folders.len()) as u64)
    }

    async fn delete_by_id(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.folders.write().await.remove(&id).is_some())
    }

    async fn mark_descendants_deleted(
        &self,
        scope: &OwnerScope,
        prefix: &str,
        deleted_at: DateTime<Utc>,
    ) -> AppResult<u64> {
        let mut count = 0;
        for folder in self.folders.write().await.values_mut() {
            if Self::in_subtree(folder, scope, prefix) && !folder.is_deleted {
                folder.is_deleted = true;
                folder.deleted_at = Some(deleted_at);
                folder.updated_at = Utc::now();
                count += 1;
            }
        }
        Ok(count)
    }

    async fn restore_descendants(&self, scope: &OwnerScope, prefix: &str) -> AppResult<u64> {
        let mut count = 0;
        for folder in self.folders.write().await.values_mut() {
            if Self::in_subtree(folder, scope, prefix) && folder.is_deleted {
                folder.is_deleted = false;
                folder.deleted_at = None;
                folder.updated_at = Utc::now();
                count += 1;
            }
        }
        Ok(count)
    }

    async fn list_deleted(&self, owner_id: Uuid) -> AppResult<Vec<Folder>> {
        let mut trashed: Vec<Folder> = self
            .folders
            .read()
            .await
            .values()
            .filter(|f| f.owner_id == Some(owner_id) && f.is_deleted)
            .cloned()
            .collect();
        trashed.sort_by(|a, b| b.deleted_at.cmp(&a.deleted_at));
        Ok(trashed)
    }

    async fn delete_deleted(&self, owner_id: Uuid) -> AppResult<u64> {
        let mut folders = self.folders.write().await;
        let before = folders.len();
        folders.retain(|_, f| !(f.owner_id == Some(owner_id) && f.is_deleted));
        Ok((before - folders.len()) as u64)
    }

    async fn delete_deleted_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let mut folders = self.folders.write().await;
        let before = folders.len();
        folders.retain(|_, f| !(f.is_deleted && f.deleted_at.is_some_and(|at| at < cutoff)));
        Ok((before - folders.len()) as u64)
    }

    async fn list_starred(&self, owner_id: Uuid) -> AppResult<Vec<Folder>> {
        let mut starred: Vec<Folder> = self
            .folders
            .read()
            .await
            .values()
            .filter(|f| f.owner_id == Some(owner_id) && f.is_starred && !f.is_deleted)
            .cloned()
            .collect();
        starred.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(starred)
    }

    async fn search(&self, owner_id: Uuid, query: &str, limit: i64) -> AppResult<Vec<Folder>> {
        let needle = query.to_lowercase();
        let mut matched: Vec<Folder> = self
            .folders
            .read()
            .await
            .values()
            .filter(|f| {
                f.owner_id == Some(owner_id)
                    && !f.is_deleted
                    && f.name.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.name.cmp(&b.name));
        matched.truncate(limit as usize);
        Ok(matched)
    }

    async fn delete_by_drive(&self, drive_id: Uuid) -> AppResult<u64> {
        let mut folders = self.folders.write().await;
        let before = folders.len();
        folders.retain(|_, f| f.drive_id != Some(drive_id));
        Ok((before - folders.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope() -> OwnerScope {
        OwnerScope::User(Uuid::new_v4())
    }

    #[tokio::test]
    async fn rewrite_is_boundary_exact() {
        let store = MemoryFolderStore::new();
        let s = scope();
        store.insert(&Folder::new(&s, "a", "/Test")).await.unwrap();
        store.insert(&Folder::new(&s, "b", "/Test2")).await.unwrap();

        let n = store
            .rewrite_descendant_parent_paths(&s, "/Test", "/Moved")
            .await
            .unwrap();
        assert_eq!(n, 1);

        let untouched = store
            .find_by_location(&s, "b", "/Test2", DeletedFilter::LiveOnly)
            .await
            .unwrap();
        assert!(untouched.is_some());
        let moved = store
            .find_by_location(&s, "a", "/Moved", DeletedFilter::LiveOnly)
            .await
            .unwrap();
        assert!(moved.is_some());
    }

    #[tokio::test]
    async fn upsert_returns_existing_record() {
        let store = MemoryFolderStore::new();
        let s = scope();
        let first = store.upsert_by_location(&s, "docs", "/").await.unwrap();
        let second = store.upsert_by_location(&s, "docs", "/").await.unwrap();
        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn scopes_do_not_leak() {
        let store = MemoryFolderStore::new();
        let a = scope();
        let b = scope();
        store.insert(&Folder::new(&a, "docs", "/")).await.unwrap();
        assert!(store.list_children(&b, "/").await.unwrap().is_empty());
    }
}
