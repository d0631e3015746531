//! Nimbus Drive Server — multi-tenant virtual drive over an object store.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use nimbus_core::config::AppConfig;
use nimbus_core::error::AppError;
use nimbus_core::traits::{BlobStore, EventPublisher, Mailer};
use nimbus_database::memory::{
    MemoryDriveStore, MemoryFileStore, MemoryFolderStore, MemoryShareStore,
};
use nimbus_database::repositories::{PgDriveStore, PgFileStore, PgFolderStore, PgShareStore};
use nimbus_database::{DriveStore, FileStore, FolderStore, ShareStore};
use nimbus_realtime::EventHub;
use nimbus_service::{
    AccessControl, DriveService, ExportService, FileService, FolderService, ImportService,
    LogMailer, SearchService, ShareService, StarredService, TrashService, UsageService,
};
use nimbus_storage::{MemoryBlobStore, S3BlobStore};
use nimbus_worker::{CronScheduler, TrashPurgeJob};

#[tokio::main]
async fn main() {
    let env = std::env::var("NIMBUS_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!("Loaded configuration (env: {})", env);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Nimbus Drive v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Metadata stores ──────────────────────────────────
    let (folders, files, shares, drives): (
        Arc<dyn FolderStore>,
        Arc<dyn FileStore>,
        Arc<dyn ShareStore>,
        Arc<dyn DriveStore>,
    ) = match config.database.backend.as_str() {
        "memory" => {
            tracing::info!("Using in-memory metadata stores");
            (
                Arc::new(MemoryFolderStore::new()),
                Arc::new(MemoryFileStore::new()),
                Arc::new(MemoryShareStore::new()),
                Arc::new(MemoryDriveStore::new()),
            )
        }
        _ => {
            let pool = nimbus_database::connect(&config.database).await?;
            nimbus_database::migration::run_migrations(&pool).await?;
            (
                Arc::new(PgFolderStore::new(pool.clone())),
                Arc::new(PgFileStore::new(pool.clone())),
                Arc::new(PgShareStore::new(pool.clone())),
                Arc::new(PgDriveStore::new(pool)),
            )
        }
    };

    // ── Step 2: Blob store ───────────────────────────────────────
    let blobs: Arc<dyn BlobStore> = match config.storage.provider.as_str() {
        "s3" => {
            tracing::info!("Initializing S3 blob store...");
            Arc::new(S3BlobStore::new(&config.storage.s3).await?)
        }
        _ => {
            tracing::info!("Using in-memory blob store");
            Arc::new(MemoryBlobStore::new())
        }
    };

    // ── Step 3: Realtime hub, mailer, access control ─────────────
    let hub = Arc::new(EventHub::new());
    let publisher: Arc<dyn EventPublisher> = Arc::clone(&hub) as Arc<dyn EventPublisher>;
    let mailer: Arc<dyn Mailer> = Arc::new(LogMailer);
    let access = AccessControl::new(Arc::clone(&drives));

    // ── Step 4: Services ─────────────────────────────────────────
    tracing::info!("Initializing services...");
    let folder_service = Arc::new(FolderService::new(
        Arc::clone(&folders),
        Arc::clone(&files),
        Arc::clone(&blobs),
        access.clone(),
        Arc::clone(&publisher),
    ));
    let file_service = Arc::new(FileService::new(
        Arc::clone(&files),
        Arc::clone(&folders),
        Arc::clone(&blobs),
        access.clone(),
        Arc::clone(&publisher),
        config.storage.clone(),
    ));
    let import_service = Arc::new(ImportService::new(
        Arc::clone(&folders),
        Arc::clone(&files),
        Arc::clone(&blobs),
        access.clone(),
    ));
    let export_service = Arc::new(ExportService::new(
        Arc::clone(&folders),
        Arc::clone(&files),
        Arc::clone(&blobs),
        access.clone(),
    ));
    let trash_service = Arc::new(TrashService::new(
        Arc::clone(&folders),
        Arc::clone(&files),
        Arc::clone(&blobs),
        access.clone(),
        config.trash.clone(),
    ));
    let share_service = Arc::new(ShareService::new(
        Arc::clone(&shares),
        Arc::clone(&files),
        Arc::clone(&folders),
        Arc::clone(&blobs),
        Arc::clone(&mailer),
        Arc::clone(&publisher),
        config.auth.clone(),
        config.storage.clone(),
    ));
    let drive_service = Arc::new(DriveService::new(
        Arc::clone(&drives),
        Arc::clone(&folders),
        Arc::clone(&files),
        Arc::clone(&blobs),
        access.clone(),
        Arc::clone(&mailer),
        Arc::clone(&publisher),
    ));
    let usage_service = Arc::new(UsageService::new(
        Arc::clone(&files),
        config.storage.clone(),
    ));
    let starred_service = Arc::new(StarredService::new(
        Arc::clone(&folders),
        Arc::clone(&files),
        access.clone(),
    ));
    let search_service = Arc::new(SearchService::new(
        Arc::clone(&folders),
        Arc::clone(&files),
    ));
    tracing::info!("Services initialized");

    // ── Step 5: Background scheduler ─────────────────────────────
    tracing::info!("Starting background scheduler...");
    let purge_job = Arc::new(TrashPurgeJob::new(
        Arc::clone(&folders),
        Arc::clone(&files),
        Arc::clone(&blobs),
        config.trash.retention_days,
    ));
    let scheduler = CronScheduler::new(Arc::clone(&purge_job), &config.trash).await?;
    scheduler.register_default_tasks().await?;
    scheduler.start().await?;
    tracing::info!("Background scheduler started");

    // ── Step 6: Build and start HTTP server ──────────────────────
    let app_state = nimbus_api::AppState {
        config: Arc::new(config.clone()),
        hub: Arc::clone(&hub),
        folder_service,
        file_service,
        import_service,
        export_service,
        trash_service,
        share_service,
        drive_service,
        usage_service,
        starred_service,
        search_service,
    };

    let app = nimbus_api::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("Nimbus Drive server listening on {}", addr);

    // ── Step 7: Graceful shutdown ────────────────────────────────
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    scheduler.shutdown().await?;

    tracing::info!("Nimbus Drive server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
