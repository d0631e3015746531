//! In-memory file store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use nimbus_core::error::AppError;
use nimbus_core::path;
use nimbus_core::result::AppResult;
use nimbus_core::types::{DeletedFilter, OwnerScope};
use nimbus_entity::file::File;

use crate::store::{FileStore, MimeUsage};

use super::matches_filter;

/// File store holding records in process memory.
#[derive(Debug, Default)]
pub struct MemoryFileStore {
    files: RwLock<HashMap<Uuid, File>>,
}

impl MemoryFileStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn in_scope(file: &File, scope: &OwnerScope) -> bool {
        file.owner_id == scope.owner_id() && file.drive_id == scope.drive_id()
    }

    fn in_subtree(file: &File, scope: &OwnerScope, prefix: &str) -> bool {
        Self::in_scope(file, scope) && path::is_descendant_or_self(&file.folder_path, prefix)
    }
}

#[async_trait]
impl FileStore for MemoryFileStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<File>> {
        Ok(self.files.read().await.get(&id).cloned())
    }

    async fn list_in_folder(
        &self,
        scope: &OwnerScope,
        folder_path: &str,
    ) -> AppResult<Vec<File>> {
        let mut files: Vec<File> = self
            .files
            .read()
            .await
            .values()
            .filter(|f| Self::in_scope(f, scope) && f.folder_path == folder_path && !f.is_deleted)
            .cloned()
            .collect();
        files.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(files)
    }

    async fn insert(&self, file: &File) -> AppResult<File> {
        self.files.write().await.insert(file.id, file.clone());
        Ok(file.clone())
    }

    async fn update(&self, file: &File) -> AppResult<File> {
        let mut files = self.files.write().await;
        if !files.contains_key(&file.id) {
            return Err(AppError::not_found(format!("File {} not found", file.id)));
        }
        let mut updated = file.clone();
        updated.updated_at = Utc::now();
        files.insert(updated.id, updated.clone());
        Ok(updated)
    }

    async fn rewrite_descendant_folder_paths(
        &self,
        scope: &OwnerScope,
        old_prefix: &str,
        new_prefix: &str,
    ) -> AppResult<u64> {
        let mut count = 0;
        for file in self.files.write().await.values_mut() {
            if Self::in_subtree(file, scope, old_prefix) {
                file.folder_path = path::replace_prefix(&file.folder_path, old_prefix, new_prefix);
                file.updated_at = Utc::now();
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
    ) -> AppResult<Vec<File>> {
        let mut found: Vec<File> = self
            .files
            .read()
            .await
            .values()
            .filter(|f| Self::in_subtree(f, scope, prefix) && matches_filter(f.is_deleted, filter))
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            a.folder_path
                .cmp(&b.folder_path)
                .then_with(|| a.file_name.cmp(&b.file_name))
        });
        Ok(found)
    }

    async fn delete_descendants(&self, scope: &OwnerScope, prefix: &str) -> AppResult<u64> {
        let mut files = self.files.write().await;
        let before = files.len();
        files.retain(|_, f| !Self::in_subtree(f, scope, prefix));
        Ok((before - files.len()) as u64)
    }

    async fn delete_by_id(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.files.write().await.remove(&id).is_some())
    }

    async fn mark_descendants_deleted(
        &self,
        scope: &OwnerScope,
        prefix: &str,
        deleted_at: DateTime<Utc>,
    ) -> AppResult<u64> {
        let mut count = 0;
        for file in self.files.write().await.values_mut() {
            if Self::in_subtree(file, scope, prefix) && !file.is_deleted {
                file.is_deleted = true;
                file.deleted_at = Some(deleted_at);
                file.updated_at = Utc::now();
                count += 1;
            }
        }
        Ok(count)
    }

    async fn restore_descendants(&self, scope: &OwnerScope, prefix: &str) -> AppResult<u64> {
        let mut count = 0;
        for file in self.files.write().await.values_mut() {
            if Self::in_subtree(file, scope, prefix) && file.is_deleted {
                file.is_deleted = false;
                file.deleted_at = None;
                file.updated_at = Utc::now();
                count += 1;
            }
        }
        Ok(count)
    }

    async fn list_deleted(&self, owner_id: Uuid) -> AppResult<Vec<File>> {
        let mut trashed: Vec<File> = self
            .files
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
        let mut files = self.files.write().await;
        let before = files.len();
        files.retain(|_, f| !(f.owner_id == Some(owner_id) && f.is_deleted));
        Ok((before - files.len()) as u64)
    }

    async fn find_deleted_before(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<File>> {
        Ok(self
            .files
            .read()
            .await
            .values()
            .filter(|f| f.is_deleted && f.deleted_at.is_some_and(|at| at < cutoff))
            .cloned()
            .collect())
    }

    async fn list_starred(&self, owner_id: Uuid) -> AppResult<Vec<File>> {
        let mut starred: Vec<File> = self
            .files
            .read()
            .await
            .values()
            .filter(|f| f.owner_id == Some(owner_id) && f.is_starred && !f.is_deleted)
            .cloned()
            .collect();
        starred.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(starred)
    }

    async fn search(&self, owner_id: Uuid, query: &str, limit: i64) -> AppResult<Vec<File>> {
        let needle = query.to_lowercase();
        let mut matched: Vec<File> = self
            .files
            .read()
            .await
            .values()
            .filter(|f| {
                f.owner_id == Some(owner_id)
                    && !f.is_deleted
                    && f.file_name.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        matched.truncate(limit as usize);
        Ok(matched)
    }

    async fn usage_by_mime(&self, owner_id: Uuid) -> AppResult<Vec<MimeUsage>> {
        let mut buckets: HashMap<Option<String>, (i64, i64)> = HashMap::new();
        for file in self.files.read().await.values() {
            if file.owner_id == Some(owner_id) && !file.is_deleted {
                let entry = buckets.entry(file.mime_type.clone()).or_default();
                entry.0 += file.size_bytes;
                entry.1 += 1;
            }
        }
        let mut usage: Vec<MimeUsage> = buckets
            .into_iter()
            .map(|(mime_type, (total_bytes, file_count))| MimeUsage {
                mime_type,
                total_bytes,
                file_count,
            })
            .collect();
        usage.sort_by(|a, b| a.mime_type.cmp(&b.mime_type));
        Ok(usage)
    }

    async fn list_by_drive(&self, drive_id: Uuid) -> AppResult<Vec<File>> {
        Ok(self
            .files
            .read()
            .await
            .values()
            .filter(|f| f.drive_id == Some(drive_id))
            .cloned()
            .collect())
    }

    async fn delete_by_drive(&self, drive_id: Uuid) -> AppResult<u64> {
        let mut files = self.files.write().await;
        let before = files.len();
        files.retain(|_, f| f.drive_id != Some(drive_id));
        Ok((before - files.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn usage_groups_by_mime() {
        let store = MemoryFileStore::new();
        let owner = Uuid::new_v4();
        let scope = OwnerScope::User(owner);
        let a = File::new(&scope, "a.txt", "blob-a", 100, Some("text/plain".into()), "/");
        let b = File::new(&scope, "b.txt", "blob-b", 50, Some("text/plain".into()), "/");
        let c = File::new(&scope, "c.png", "blob-c", 10, Some("image/png".into()), "/");
        store.insert(&a).await.unwrap();
        store.insert(&b).await.unwrap();
        store.insert(&c).await.unwrap();

        let usage = store.usage_by_mime(owner).await.unwrap();
        let text = usage
            .iter()
            .find(|u| u.mime_type.as_deref() == Some("text/plain"))
            .unwrap();
        assert_eq!(text.total_bytes, 150);
        assert_eq!(text.file_count, 2);
    }

    #[tokio::test]
    async fn trashed_files_hidden_from_folder_listing() {
        let store = MemoryFileStore::new();
        let scope = OwnerScope::User(Uuid::new_v4());
        let file = File::new(&scope, "a.txt", "blob-a", 1, None, "/docs");
        store.insert(&file).await.unwrap();
        store
            .mark_descendants_deleted(&scope, "/docs", Utc::now())
            .await
            .unwrap();
        assert!(store.list_in_folder(&scope, "/docs").await.unwrap().is_empty());
    }
}
