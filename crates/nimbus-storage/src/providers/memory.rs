//! In-memory blob store for development and tests.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;

use nimbus_core::error::AppError;
use nimbus_core::result::AppResult;
use nimbus_core::traits::blob::BlobStore;

/// Blob store holding objects in a process-local map.
///
/// Signed URLs are synthetic `memory://` URIs; they carry the key and
/// TTL so tests can assert on what would have been issued.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    objects: DashMap<String, Bytes>,
}

impl MemoryBlobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the store holds no blobs.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Whether a blob exists under the given key.
    pub fn contains(&self, key: &str) -> bool {
        self.objects.contains_key(key)
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn put(&self, key: &str, data: Bytes, _content_type: Option<&str>) -> AppResult<()> {
        self.objects.insert(key.to_string(), data);
        Ok(())
    }

    async fn get(&self, key: &str) -> AppResult<Bytes> {
        self.objects
            .get(key)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AppError::not_found(format!("Blob {key} not found")))
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.objects.remove(key);
        Ok(())
    }

    async fn signed_url(
        &self,
        key: &str,
        ttl: Duration,
        disposition: Option<&str>,
    ) -> AppResult<String> {
        if !self.objects.contains_key(key) {
            return Err(AppError::not_found(format!("Blob {key} not found")));
        }
        let mut url = format!("memory://{}?expires_in={}", key, ttl.as_secs());
        if let Some(disposition) = disposition {
            url.push_str("&disposition=");
            url.push_str(disposition);
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_get_delete_round_trip() {
        let store = MemoryBlobStore::new();
        store
            .put("users/a/file", Bytes::from_static(b"hello"), None)
            .await
            .unwrap();
        assert_eq!(store.get("users/a/file").await.unwrap(), "hello");
        store.delete("users/a/file").await.unwrap();
        assert!(store.get("users/a/file").await.is_err());
    }

    #[tokio::test]
    async fn signed_url_requires_existing_blob() {
        let store = MemoryBlobStore::new();
        assert!(store
            .signed_url("missing", Duration::from_secs(300), None)
            .await
            .is_err());
    }
}
