//! PostgreSQL folder store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use nimbus_core::error::{AppError, ErrorKind};
use nimbus_core::result::AppResult;
use nimbus_core::types::{DeletedFilter, OwnerScope};
use nimbus_entity::folder::Folder;

use crate::prefix::descendant_pattern;
use crate::store::FolderStore;

use super::deleted_clause;

/// Folder store backed by PostgreSQL.
///
/// Subtree queries use boundary-exact prefix matching:
/// `parent_path = $prefix OR parent_path LIKE $prefix || '/%'` with `LIKE`
/// wildcards escaped, so `/Test` never matches `/Test2`.
#[derive(Debug, Clone)]
pub struct PgFolderStore {
    pool: PgPool,
}

impl PgFolderStore {
    /// Create a new folder store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FolderStore for PgFolderStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find folder", e))
    }

    async fn find_by_location(
        &self,
        scope: &OwnerScope,
        name: &str,
        parent_path: &str,
        filter: DeletedFilter,
    ) -> AppResult<Option<Folder>> {
        let sql = format!(
            "SELECT * FROM folders \
             WHERE owner_id IS NOT DISTINCT FROM $1 AND drive_id IS NOT DISTINCT FROM $2 \
             AND name = $3 AND parent_path = $4{}",
            deleted_clause(filter)
        );
        sqlx::query_as::<_, Folder>(&sql)
            .bind(scope.owner_id())
            .bind(scope.drive_id())
            .bind(name)
            .bind(parent_path)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find folder by location", e)
            })
    }

    async fn list_children(
        &self,
        scope: &OwnerScope,
        parent_path: &str,
    ) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders \
             WHERE owner_id IS NOT DISTINCT FROM $1 AND drive_id IS NOT DISTINCT FROM $2 \
             AND parent_path = $3 AND is_deleted = FALSE ORDER BY name ASC",
        )
        .bind(scope.owner_id())
        .bind(scope.drive_id())
        .bind(parent_path)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list folders", e))
    }

    async fn insert(&self, folder: &Folder) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "INSERT INTO folders \
             (id, owner_id, drive_id, name, parent_path, is_deleted, deleted_at, is_starred, \
              created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING *",
        )
        .bind(folder.id)
        .bind(folder.owner_id)
        .bind(folder.drive_id)
        .bind(&folder.name)
        .bind(&folder.parent_path)
        .bind(folder.is_deleted)
        .bind(folder.deleted_at)
        .bind(folder.is_starred)
        .bind(folder.created_at)
        .bind(folder.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("folders_location_live_key") =>
            {
                AppError::duplicate_name(format!(
                    "A folder named '{}' already exists at '{}'",
                    folder.name, folder.parent_path
                ))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create folder", e),
        })
    }

    async fn upsert_by_location(
        &self,
        scope: &OwnerScope,
        name: &str,
        parent_path: &str,
    ) -> AppResult<Folder> {
        // DO UPDATE instead of DO NOTHING so the existing row is returned
        // to racing callers.
        sqlx::query_as::<_, Folder>(
            "INSERT INTO folders \
             (id, owner_id, drive_id, name, parent_path, is_deleted, deleted_at, is_starred, \
              created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, FALSE, NULL, FALSE, NOW(), NOW()) \
             ON CONFLICT (owner_id, drive_id, name, parent_path) WHERE is_deleted = FALSE \
             DO UPDATE SET updated_at = NOW() \
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(scope.owner_id())
        .bind(scope.drive_id())
        .bind(name)
        .bind(parent_path)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to upsert folder", e))
    }

    async fn update(&self, folder: &Folder) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "UPDATE folders SET owner_id = $2, drive_id = $3, name = $4, parent_path = $5, \
             is_deleted = $6, deleted_at = $7, is_starred = $8, updated_at = $9 \
             WHERE id = $1 RETURNING *",
        )
        .bind(folder.id)
        .bind(folder.owner_id)
        .bind(folder.drive_id)
        .bind(&folder.name)
        .bind(&folder.parent_path)
        .bind(folder.is_deleted)
        .bind(folder.deleted_at)
        .bind(folder.is_starred)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update folder", e))?
        .ok_or_else(|| AppError::not_found(format!("Folder {} not found", folder.id)))
    }

    async fn rewrite_descendant_parent_paths(
        &self,
        scope: &OwnerScope,
        old_prefix: &str,
        new_prefix: &str,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE folders \
             SET parent_path = $4 || substr(parent_path, char_length($3::text) + 1), \
                 updated_at = NOW() \
             WHERE owner_id IS NOT DISTINCT FROM $1 AND drive_id IS NOT DISTINCT FROM $2 \
             AND (parent_path = $3 OR parent_path LIKE $5 ESCAPE '\\')",
        )
        .bind(scope.owner_id())
        .bind(scope.drive_id())
        .bind(old_prefix)
        .bind(new_prefix)
        .bind(descendant_pattern(old_prefix))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to rewrite folder paths", e)
        })?;
        Ok(result.rows_affected())
    }

    async fn find_descendants(
        &self,
        scope: &OwnerScope,
        prefix: &str,
        filter: DeletedFilter,
    ) -> AppResult<Vec<Folder>> {
        let sql = format!(
            "SELECT * FROM folders \
             WHERE owner_id IS NOT DISTINCT FROM $1 AND drive_id IS NOT DISTINCT FROM $2 \
             AND (parent_path = $3 OR parent_path LIKE $4 ESCAPE '\\'){} \
             ORDER BY parent_path ASC, name ASC",
            deleted_clause(filter)
        );
        sqlx::query_as::<_, Folder>(&sql)
            .bind(scope.owner_id())
            .bind(scope.drive_id())
            .bind(prefix)
            .bind(descendant_pattern(prefix))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list descendant folders", e)
            })
    }

    async fn delete_descendants(&self, scope: &OwnerScope, prefix: &str) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM folders \
             WHERE owner_id IS NOT DISTINCT FROM $1 AND drive_id IS NOT DISTINCT FROM $2 \
             AND (parent_path = $3 OR parent_path LIKE $4 ESCAPE '\\')",
        )
        .bind(scope.owner_id())
        .bind(scope.drive_id())
        .bind(prefix)
        .bind(descendant_pattern(prefix))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to delete descendant folders", e)
        })?;
        Ok(result.rows_affected())
    }

    async fn delete_by_id(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM folders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete folder", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    async fn mark_descendants_deleted(
        &self,
        scope: &OwnerScope,
        prefix: &str,
        deleted_at: DateTime<Utc>,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE folders SET is_deleted = TRUE, deleted_at = $4, updated_at = NOW() \
             WHERE owner_id IS NOT DISTINCT FROM $1 AND drive_id IS NOT DISTINCT FROM $2 \
             AND (parent_path = $3 OR parent_path LIKE $5 ESCAPE '\\') \
             AND is_deleted = FALSE",
        )
        .bind(scope.owner_id())
        .bind(scope.drive_id())
        .bind(prefix)
        .bind(deleted_at)
        .bind(descendant_pattern(prefix))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to trash folders", e))?;
        Ok(result.rows_affected())
    }

    async fn restore_descendants(&self, scope: &OwnerScope, prefix: &str) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE folders SET is_deleted = FALSE, deleted_at = NULL, updated_at = NOW() \
             WHERE owner_id IS NOT DISTINCT FROM $1 AND drive_id IS NOT DISTINCT FROM $2 \
             AND (parent_path = $3 OR parent_path LIKE $4 ESCAPE '\\') \
             AND is_deleted = TRUE",
        )
        .bind(scope.owner_id())
        .bind(scope.drive_id())
        .bind(prefix)
        .bind(descendant_pattern(prefix))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to restore folders", e))?;
        Ok(result.rows_affected())
    }

    async fn list_deleted(&self, owner_id: Uuid) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE owner_id = $1 AND is_deleted = TRUE \
             ORDER BY deleted_at DESC NULLS LAST",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list trashed folders", e)
        })
    }

    async fn delete_deleted(&self, owner_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM folders WHERE owner_id = $1 AND is_deleted = TRUE")
            .bind(owner_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to empty trash", e))?;
        Ok(result.rows_affected())
    }

    async fn delete_deleted_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let result =
            sqlx::query("DELETE FROM folders WHERE is_deleted = TRUE AND deleted_at < $1")
                .bind(cutoff)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to purge folders", e)
                })?;
        Ok(result.rows_affected())
    }

    async fn list_starred(&self, owner_id: Uuid) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE owner_id = $1 AND is_starred = TRUE \
             AND is_deleted = FALSE ORDER BY name ASC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list starred folders", e)
        })
    }

    async fn search(&self, owner_id: Uuid, query: &str, limit: i64) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE owner_id = $1 AND is_deleted = FALSE \
             AND name ILIKE $2 ESCAPE '\\' ORDER BY name ASC LIMIT $3",
        )
        .bind(owner_id)
        .bind(format!("%{}%", crate::prefix::escape_like(query)))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to search folders", e))
    }

    async fn delete_by_drive(&self, drive_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM folders WHERE drive_id = $1")
            .bind(drive_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete drive folders", e)
            })?;
        Ok(result.rows_affected())
    }
}
