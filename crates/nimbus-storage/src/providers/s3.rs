//! S3-compatible object storage backend.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;

use nimbus_core::config::storage::S3Config;
use nimbus_core::error::AppError;
use nimbus_core::result::AppResult;
use nimbus_core::traits::blob::BlobStore;

/// Blob store backed by an S3-compatible object store.
#[derive(Debug, Clone)]
pub struct S3BlobStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3BlobStore {
    /// Build a client from the ambient AWS credential chain plus the
    /// configured region and optional custom endpoint.
    pub async fn new(config: &S3Config) -> AppResult<Self> {
        tracing::info!(
            bucket = %config.bucket,
            region = %config.region,
            "Initializing S3 blob store"
        );

        let region = aws_config::Region::new(config.region.clone());
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest()).region(region);
        if !config.endpoint.is_empty() {
            loader = loader.endpoint_url(&config.endpoint);
        }
        let sdk_config = loader.load().await;

        Ok(Self {
            client: aws_sdk_s3::Client::new(&sdk_config),
            bucket: config.bucket.clone(),
        })
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    fn provider_type(&self) -> &str {
        "s3"
    }

    async fn put(&self, key: &str, data: Bytes, content_type: Option<&str>) -> AppResult<()> {
        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data));
        if let Some(content_type) = content_type {
            request = request.content_type(content_type);
        }
        request
            .send()
            .await
            .map_err(|e| AppError::upstream(format!("S3 put failed for {key}: {e}")))?;
        Ok(())
    }

    async fn get(&self, key: &str) -> AppResult<Bytes> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| AppError::upstream(format!("S3 get failed for {key}: {e}")))?;
        let data = output
            .body
            .collect()
            .await
            .map_err(|e| AppError::upstream(format!("S3 body read failed for {key}: {e}")))?;
        Ok(data.into_bytes())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| AppError::upstream(format!("S3 delete failed for {key}: {e}")))?;
        Ok(())
    }

    async fn signed_url(
        &self,
        key: &str,
        ttl: Duration,
        disposition: Option<&str>,
    ) -> AppResult<String> {
        let presigning = PresigningConfig::expires_in(ttl)
            .map_err(|e| AppError::upstream(format!("Invalid presign TTL: {e}")))?;
        let mut request = self.client.get_object().bucket(&self.bucket).key(key);
        if let Some(disposition) = disposition {
            request = request.response_content_disposition(disposition);
        }
        let presigned = request
            .presigned(presigning)
            .await
            .map_err(|e| AppError::upstream(format!("S3 presign failed for {key}: {e}")))?;
        Ok(presigned.uri().to_string())
    }
}
