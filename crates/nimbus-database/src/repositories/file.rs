//! PostgreSQL file store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use nimbus_core::error::{AppError, ErrorKind};
use nimbus_core::result::AppResult;
use nimbus_core::types::{DeletedFilter, OwnerScope};
use nimbus_entity::file::File;

use crate::prefix::descendant_pattern;
use crate::store::{FileStore, MimeUsage};

use super::deleted_clause;

/// File store backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgFileStore {
    pool: PgPool,
}

impl PgFileStore {
    /// Create a new file store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileStore for PgFileStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
    }

    async fn list_in_folder(
        &self,
        scope: &OwnerScope,
        folder_path: &str,
    ) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>(
            "SELECT * FROM files \
             WHERE owner_id IS NOT DISTINCT FROM $1 AND drive_id IS NOT DISTINCT FROM $2 \
             AND folder_path = $3 AND is_deleted = FALSE ORDER BY file_name ASC",
        )
        .bind(scope.owner_id())
        .bind(scope.drive_id())
        .bind(folder_path)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list files", e))
    }

    async fn insert(&self, file: &File) -> AppResult<File> {
        sqlx::query_as::<_, File>(
            "INSERT INTO files \
             (id, owner_id, drive_id, file_name, blob_key, size_bytes, mime_type, folder_path, \
              is_deleted, deleted_at, is_starred, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) RETURNING *",
        )
        .bind(file.id)
        .bind(file.owner_id)
        .bind(file.drive_id)
        .bind(&file.file_name)
        .bind(&file.blob_key)
        .bind(file.size_bytes)
        .bind(&file.mime_type)
        .bind(&file.folder_path)
        .bind(file.is_deleted)
        .bind(file.deleted_at)
        .bind(file.is_starred)
        .bind(file.created_at)
        .bind(file.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create file", e))
    }

    async fn update(&self, file: &File) -> AppResult<File> {
        sqlx::query_as::<_, File>(
            "UPDATE files SET owner_id = $2, drive_id = $3, file_name = $4, blob_key = $5, \
             size_bytes = $6, mime_type = $7, folder_path = $8, is_deleted = $9, \
             deleted_at = $10, is_starred = $11, updated_at = $12 \
             WHERE id = $1 RETURNING *",
        )
        .bind(file.id)
        .bind(file.owner_id)
        .bind(file.drive_id)
        .bind(&file.file_name)
        .bind(&file.blob_key)
        .bind(file.size_bytes)
        .bind(&file.mime_type)
        .bind(&file.folder_path)
        .bind(file.is_deleted)
        .bind(file.deleted_at)
        .bind(file.is_starred)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update file", e))?
        .ok_or_else(|| AppError::not_found(format!("File {} not found", file.id)))
    }

    async fn rewrite_descendant_folder_paths(
        &self,
        scope: &OwnerScope,
        old_prefix: &str,
        new_prefix: &str,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE files \
             SET folder_path = $4 || substr(folder_path, char_length($3::text) + 1), \
                 updated_at = NOW() \
             WHERE owner_id IS NOT DISTINCT FROM $1 AND drive_id IS NOT DISTINCT FROM $2 \
             AND (folder_path = $3 OR folder_path LIKE $5 ESCAPE '\\')",
        )
        .bind(scope.owner_id())
        .bind(scope.drive_id())
        .bind(old_prefix)
        .bind(new_prefix)
        .bind(descendant_pattern(old_prefix))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to rewrite file paths", e)
        })?;
        Ok(result.rows_affected())
    }

    async fn find_descendants(
        &self,
        scope: &OwnerScope,
        prefix: &str,
        filter: DeletedFilter,
    ) -> AppResult<Vec<File>> {
        let sql = format!(
            "SELECT * FROM files \
             WHERE owner_id IS NOT DISTINCT FROM $1 AND drive_id IS NOT DISTINCT FROM $2 \
             AND (folder_path = $3 OR folder_path LIKE $4 ESCAPE '\\'){} \
             ORDER BY folder_path ASC, file_name ASC",
            deleted_clause(filter)
        );
        sqlx::query_as::<_, File>(&sql)
            .bind(scope.owner_id())
            .bind(scope.drive_id())
            .bind(prefix)
            .bind(descendant_pattern(prefix))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list descendant files", e)
            })
    }

    async fn delete_descendants(&self, scope: &OwnerScope, prefix: &str) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM files \
             WHERE owner_id IS NOT DISTINCT FROM $1 AND drive_id IS NOT DISTINCT FROM $2 \
             AND (folder_path = $3 OR folder_path LIKE $4 ESCAPE '\\')",
        )
        .bind(scope.owner_id())
        .bind(scope.drive_id())
        .bind(prefix)
        .bind(descendant_pattern(prefix))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to delete descendant files", e)
        })?;
        Ok(result.rows_affected())
    }

    async fn delete_by_id(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete file", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn mark_descendants_deleted(
        &self,
        scope: &OwnerScope,
        prefix: &str,
        deleted_at: DateTime<Utc>,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE files SET is_deleted = TRUE, deleted_at = $4, updated_at = NOW() \
             WHERE owner_id IS NOT DISTINCT FROM $1 AND drive_id IS NOT DISTINCT FROM $2 \
             AND (folder_path = $3 OR folder_path LIKE $5 ESCAPE '\\') \
             AND is_deleted = FALSE",
        )
        .bind(scope.owner_id())
        .bind(scope.drive_id())
        .bind(prefix)
        .bind(deleted_at)
        .bind(descendant_pattern(prefix))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to trash files", e))?;
        Ok(result.rows_affected())
    }

    async fn restore_descendants(&self, scope: &OwnerScope, prefix: &str) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE files SET is_deleted = FALSE, deleted_at = NULL, updated_at = NOW() \
             WHERE owner_id IS NOT DISTINCT FROM $1 AND drive_id IS NOT DISTINCT FROM $2 \
             AND (folder_path = $3 OR folder_path LIKE $4 ESCAPE '\\') \
             AND is_deleted = TRUE",
        )
        .bind(scope.owner_id())
        .bind(scope.drive_id())
        .bind(prefix)
        .bind(descendant_pattern(prefix))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to restore files", e))?;
        Ok(result.rows_affected())
    }

    async fn list_deleted(&self, owner_id: Uuid) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>(
            "SELECT * FROM files WHERE owner_id = $1 AND is_deleted = TRUE \
             ORDER BY deleted_at DESC NULLS LAST",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list trashed files", e)
        })
    }

    async fn delete_deleted(&self, owner_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM files WHERE owner_id = $1 AND is_deleted = TRUE")
            .bind(owner_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to empty trash", e))?;
        Ok(result.rows_affected())
    }

    async fn find_deleted_before(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>(
            "SELECT * FROM files WHERE is_deleted = TRUE AND deleted_at < $1",
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find purgeable files", e)
        })
    }

    async fn list_starred(&self, owner_id: Uuid) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>(
            "SELECT * FROM files WHERE owner_id = $1 AND is_starred = TRUE \
             AND is_deleted = FALSE ORDER BY file_name ASC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list starred files", e)
        })
    }

    async fn search(&self, owner_id: Uuid, query: &str, limit: i64) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>(
            "SELECT * FROM files WHERE owner_id = $1 AND is_deleted = FALSE \
             AND file_name ILIKE $2 ESCAPE '\\' ORDER BY file_name ASC LIMIT $3",
        )
        .bind(owner_id)
        .bind(format!("%{}%", crate::prefix::escape_like(query)))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to search files", e))
    }

    async fn usage_by_mime(&self, owner_id: Uuid) -> AppResult<Vec<MimeUsage>> {
        sqlx::query_as::<_, MimeUsage>(
            "SELECT mime_type, COALESCE(SUM(size_bytes), 0)::BIGINT AS total_bytes, \
             COUNT(*)::BIGINT AS file_count \
             FROM files WHERE owner_id = $1 AND is_deleted = FALSE GROUP BY mime_type",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to aggregate usage", e))
    }

    async fn list_by_drive(&self, drive_id: Uuid) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE drive_id = $1")
            .bind(drive_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list drive files", e)
            })
    }

    async fn delete_by_drive(&self, drive_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM files WHERE drive_id = $1")
            .bind(drive_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete drive files", e)
            })?;
        Ok(result.rows_affected())
    }
}
