//! PostgreSQL shared-drive store.
//!
//! Members are stored as a JSONB document on the drive row, so membership
//! lookups use a containment probe on the `email` field.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use nimbus_core::error::{AppError, ErrorKind};
use nimbus_core::result::AppResult;
use nimbus_entity::drive::SharedDrive;

use crate::store::DriveStore;

/// Shared-drive store backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgDriveStore {
    pool: PgPool,
}

impl PgDriveStore {
    /// Create a new drive store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DriveStore for PgDriveStore {
    async fn insert(&self, drive: &SharedDrive) -> AppResult<SharedDrive> {
        sqlx::query_as::<_, SharedDrive>(
            "INSERT INTO drives (id, name, description, owner_id, members, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(drive.id)
        .bind(&drive.name)
        .bind(&drive.description)
        .bind(drive.owner_id)
        .bind(&drive.members)
        .bind(drive.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create drive", e))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<SharedDrive>> {
        sqlx::query_as::<_, SharedDrive>("SELECT * FROM drives WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find drive", e))
    }

    async fn list_for_member(&self, email: &str) -> AppResult<Vec<SharedDrive>> {
        sqlx::query_as::<_, SharedDrive>(
            "SELECT * FROM drives \
             WHERE members @> jsonb_build_array(jsonb_build_object('email', $1::text)) \
             ORDER BY created_at DESC",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list drives", e))
    }

    async fn update(&self, drive: &SharedDrive) -> AppResult<SharedDrive> {
        sqlx::query_as::<_, SharedDrive>(
            "UPDATE drives SET name = $2, description = $3, members = $4 \
             WHERE id = $1 RETURNING *",
        )
        .bind(drive.id)
        .bind(&drive.name)
        .bind(&drive.description)
        .bind(&drive.members)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update drive", e))?
        .ok_or_else(|| AppError::not_found(format!("Drive {} not found", drive.id)))
    }

    async fn delete_by_id(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM drives WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete drive", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
