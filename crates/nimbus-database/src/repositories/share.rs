//! PostgreSQL share store.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use nimbus_core::error::{AppError, ErrorKind};
use nimbus_core::result::AppResult;
use nimbus_entity::share::Share;

use crate::store::ShareStore;

/// Share store backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgShareStore {
    pool: PgPool,
}

impl PgShareStore {
    /// Create a new share store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShareStore for PgShareStore {
    async fn insert(&self, share: &Share) -> AppResult<Share> {
        sqlx::query_as::<_, Share>(
            "INSERT INTO shares \
             (id, resource_type, resource_id, shared_by, shared_with, token, permission, \
              expires_at, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
        )
        .bind(share.id)
        .bind(share.resource_type)
        .bind(share.resource_id)
        .bind(share.shared_by)
        .bind(&share.shared_with)
        .bind(&share.token)
        .bind(share.permission)
        .bind(share.expires_at)
        .bind(share.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create share", e))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Share>> {
        sqlx::query_as::<_, Share>("SELECT * FROM shares WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find share", e))
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<Share>> {
        sqlx::query_as::<_, Share>("SELECT * FROM shares WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to resolve share token", e)
            })
    }

    async fn list_for_recipient(&self, email: &str) -> AppResult<Vec<Share>> {
        sqlx::query_as::<_, Share>(
            "SELECT * FROM shares WHERE shared_with = $1 ORDER BY created_at DESC",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list received shares", e)
        })
    }

    async fn list_by_creator(&self, user_id: Uuid) -> AppResult<Vec<Share>> {
        sqlx::query_as::<_, Share>(
            "SELECT * FROM shares WHERE shared_by = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list created shares", e)
        })
    }

    async fn delete_by_id(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM shares WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete share", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
