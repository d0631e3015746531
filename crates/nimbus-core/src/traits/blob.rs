//! Blob store gateway trait.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Key-addressed object storage with time-limited signed-URL issuance.
///
/// Implemented for S3 and for an in-memory backend in `nimbus-storage`.
/// The store is an external collaborator: callers treat failures during
/// upload as fatal (`Upstream`) and failures during cleanup as advisory
/// (log and continue).
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "s3", "memory").
    fn provider_type(&self) -> &str;

    /// Store a blob under the given key.
    async fn put(&self, key: &str, data: Bytes, content_type: Option<&str>) -> AppResult<()>;

    /// Fetch a blob's full contents.
    async fn get(&self, key: &str) -> AppResult<Bytes>;

    /// Delete the blob at the given key.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Issue a time-limited signed retrieval URL. When `disposition` is
    /// set it is applied as the response content-disposition, which lets
    /// download links force an attachment with the original file name.
    async fn signed_url(
        &self,
        key: &str,
        ttl: Duration,
        disposition: Option<&str>,
    ) -> AppResult<String>;
}
