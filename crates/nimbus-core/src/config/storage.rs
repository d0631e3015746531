//! Blob store configuration.

use serde::{Deserialize, Serialize};

/// Top-level blob storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Blob store provider: `"s3"` or `"memory"` (single-node/dev only).
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Maximum upload size in bytes (default 1 GiB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
    /// Per-user storage quota in bytes (default 15 GiB).
    #[serde(default = "default_user_quota")]
    pub user_quota_bytes: u64,
    /// Lifetime of signed preview/download URLs in seconds.
    #[serde(default = "default_signed_url_ttl")]
    pub signed_url_ttl_seconds: u64,
    /// S3 settings (used when `provider = "s3"`).
    #[serde(default)]
    pub s3: S3Config,
}

/// S3-compatible object storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Config {
    /// Bucket name.
    #[serde(default)]
    pub bucket: String,
    /// AWS region.
    #[serde(default = "default_region")]
    pub region: String,
    /// Endpoint URL override (for non-AWS services like MinIO).
    #[serde(default)]
    pub endpoint: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            max_upload_size_bytes: default_max_upload(),
            user_quota_bytes: default_user_quota(),
            signed_url_ttl_seconds: default_signed_url_ttl(),
            s3: S3Config::default(),
        }
    }
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            region: default_region(),
            endpoint: String::new(),
        }
    }
}

fn default_provider() -> String {
    "s3".to_string()
}

fn default_max_upload() -> u64 {
    1024 * 1024 * 1024
}

fn default_user_quota() -> u64 {
    15 * 1024 * 1024 * 1024
}

fn default_signed_url_ttl() -> u64 {
    300
}

fn default_region() -> String {
    "us-east-1".to_string()
}
