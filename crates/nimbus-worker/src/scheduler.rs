//! Cron scheduler for periodic maintenance tasks.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing;

use nimbus_core::config::trash::TrashConfig;
use nimbus_core::error::AppError;

use crate::jobs::TrashPurgeJob;

/// Cron-based scheduler for periodic background tasks
pub struct CronScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
    /// Trash purge job, run on the configured schedule
    purge: Arc<TrashPurgeJob>,
    /// Cron expression for the purge sweep
    purge_schedule: String,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler")
            .field("purge_schedule", &self.purge_schedule)
            .finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler
    pub async fn new(purge: Arc<TrashPurgeJob>, config: &TrashConfig) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {}", e)))?;

        Ok(Self {
            scheduler,
            purge,
            purge_schedule: config.purge_schedule.clone(),
        })
    }

    /// Register all default scheduled tasks
    pub async fn register_default_tasks(&self) -> Result<(), AppError> {
        self.register_trash_purge().await?;

        tracing::info!("All scheduled tasks registered");
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {}", e)))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&self) -> Result<(), AppError> {
        let mut scheduler = self.scheduler.clone();
        scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {}", e)))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }

    /// Trash purge sweep, on the configured cron expression
    async fn register_trash_purge(&self) -> Result<(), AppError> {
        let purge = Arc::clone(&self.purge);
        let job = CronJob::new_async(self.purge_schedule.as_str(), move |_uuid, _lock| {
            let purge = Arc::clone(&purge);
            Box::pin(async move {
                match purge.run().await {
                    Ok(summary) => tracing::debug!(
                        files_removed = summary.files_removed,
                        folders_removed = summary.folders_removed,
                        "Trash purge run completed"
                    ),
                    Err(e) => tracing::error!("Trash purge run failed: {}", e),
                }
            })
        })
        .map_err(|e| AppError::internal(format!("Failed to create trash_purge schedule: {}", e)))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add trash_purge schedule: {}", e)))?;

        tracing::info!(schedule = %self.purge_schedule, "Registered: trash_purge");
        Ok(())
    }
}
