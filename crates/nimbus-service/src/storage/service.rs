//! Storage usage reporting.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use nimbus_core::config::storage::StorageConfig;
use nimbus_core::result::AppResult;
use nimbus_database::{FileStore, MimeUsage};

use crate::context::RequestContext;

/// A user's storage consumption against their quota.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageUsage {
    /// Total live bytes stored.
    pub used_bytes: i64,
    /// The configured quota.
    pub quota_bytes: u64,
    /// Number of live files.
    pub file_count: i64,
    /// Usage broken down per MIME type.
    pub breakdown: Vec<MimeUsage>,
}

/// Reports per-user storage usage.
#[derive(Debug, Clone)]
pub struct UsageService {
    files: Arc<dyn FileStore>,
    config: StorageConfig,
}

impl UsageService {
    /// Creates a new usage service.
    pub fn new(files: Arc<dyn FileStore>, config: StorageConfig) -> Self {
        Self { files, config }
    }

    /// The requester's live usage with a per-MIME breakdown. Trashed
    /// files do not count.
    pub async fn usage(&self, ctx: &RequestContext) -> AppResult<StorageUsage> {
        let breakdown = self.files.usage_by_mime(ctx.user_id).await?;
        let used_bytes = breakdown.iter().map(|u| u.total_bytes).sum();
        let file_count = breakdown.iter().map(|u| u.file_count).sum();
        Ok(StorageUsage {
            used_bytes,
            quota_bytes: self.config.user_quota_bytes,
            file_count,
            breakdown,
        })
    }
}
