//! Route definitions for the Nimbus Drive HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via
//! Axum's `State` extractor.

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let max_upload = state.config.storage.max_upload_size_bytes as usize;

    let api_routes = Router::new()
        .merge(folder_routes())
        .merge(file_routes())
        .merge(trash_routes())
        .merge(share_routes())
        .merge(drive_routes())
        .merge(starred_routes())
        .merge(storage_routes())
        .merge(search_routes())
        .merge(health_routes());

    let ws_routes = Router::new().route("/ws", get(handlers::ws::ws_upgrade));

    let cors = build_cors_layer(&state);

    Router::new()
        .nest("/api", api_routes)
        .merge(ws_routes)
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Folder CRUD, import, export
fn folder_routes() -> Router<AppState> {
    Router::new()
        .route("/folders", get(handlers::folder::list_folders))
        .route("/folders", post(handlers::folder::create_folder))
        .route("/folders/exists", get(handlers::folder::folder_exists))
        .route("/folders/import", post(handlers::folder::import_zip))
        .route("/folders/{id}", get(handlers::folder::get_folder))
        .route("/folders/{id}", put(handlers::folder::rename_folder))
        .route("/folders/{id}", delete(handlers::folder::trash_folder))
        .route("/folders/{id}/move", put(handlers::folder::move_folder))
        .route("/folders/{id}/export", get(handlers::folder::export_zip))
        .route("/folders/{id}/star", put(handlers::starred::toggle_folder))
}

/// File CRUD, upload, signed URLs
fn file_routes() -> Router<AppState> {
    Router::new()
        .route("/files", get(handlers::file::list_files))
        .route("/files/upload", post(handlers::file::upload_file))
        .route("/files/{id}", get(handlers::file::get_file))
        .route("/files/{id}", put(handlers::file::rename_file))
        .route("/files/{id}", delete(handlers::file::trash_file))
        .route("/files/{id}/move", put(handlers::file::move_file))
        .route("/files/{id}/download", get(handlers::file::download_url))
        .route("/files/{id}/preview", get(handlers::file::preview_url))
        .route("/files/{id}/star", put(handlers::starred::toggle_file))
}

/// Trash listing, restore, permanent delete
fn trash_routes() -> Router<AppState> {
    Router::new()
        .route("/trash", get(handlers::trash::list_trash))
        .route("/trash", delete(handlers::trash::empty_trash))
        .route(
            "/trash/folders/{id}/restore",
            post(handlers::trash::restore_folder),
        )
        .route(
            "/trash/files/{id}/restore",
            post(handlers::trash::restore_file),
        )
        .route("/trash/folders/{id}", delete(handlers::trash::delete_folder))
        .route("/trash/files/{id}", delete(handlers::trash::delete_file))
}

/// Share CRUD and public token access
fn share_routes() -> Router<AppState> {
    Router::new()
        .route("/shares", post(handlers::share::create_share))
        .route("/shares/received", get(handlers::share::list_received))
        .route("/shares/sent", get(handlers::share::list_sent))
        .route("/shares/{id}", delete(handlers::share::revoke_share))
        .route("/s/{token}", get(handlers::share::access_shared))
}

/// Shared-drive lifecycle, membership, contents
fn drive_routes() -> Router<AppState> {
    Router::new()
        .route("/drives", get(handlers::drive::list_drives))
        .route("/drives", post(handlers::drive::create_drive))
        .route("/drives/{id}", get(handlers::drive::get_drive))
        .route("/drives/{id}", put(handlers::drive::update_drive))
        .route("/drives/{id}", delete(handlers::drive::delete_drive))
        .route("/drives/{id}/contents", get(handlers::drive::drive_contents))
        .route("/drives/{id}/members", post(handlers::drive::add_member))
        .route(
            "/drives/{id}/members",
            put(handlers::drive::update_member_role),
        )
        .route(
            "/drives/{id}/members",
            delete(handlers::drive::remove_member),
        )
        .route(
            "/drives/{id}/files/{file_id}",
            post(handlers::drive::move_file_in),
        )
        .route(
            "/drives/files/{file_id}/move-out",
            post(handlers::drive::move_file_out),
        )
}

/// Starred listing
fn starred_routes() -> Router<AppState> {
    Router::new().route("/starred", get(handlers::starred::list_starred))
}

/// Storage usage
fn storage_routes() -> Router<AppState> {
    Router::new().route("/storage/usage", get(handlers::storage::get_usage))
}

/// Search
fn search_routes() -> Router<AppState> {
    Router::new().route("/search", get(handlers::search::search))
}

/// Health check endpoints (no auth required)
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
}

/// Build CORS layer from configuration
fn build_cors_layer(state: &AppState) -> CorsLayer {
    use axum::http::HeaderValue;
    use tower_http::cors::Any;

    let cors_config = &state.config.server.cors;

    if cors_config.allowed_origins.contains(&"*".to_string()) {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = cors_config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
