//! WebSocket upgrade handler for the realtime event stream.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::Response;
use futures::StreamExt;
use tracing::{info, warn};

use crate::error::ApiError;
use crate::extractors::auth::decode_token;
use crate::state::AppState;

/// Query parameter for WebSocket authentication.
#[derive(Debug, serde::Deserialize)]
pub struct WsQuery {
    /// Bearer token.
    pub token: String,
}

/// GET /ws?token={jwt} — WebSocket upgrade
pub async fn ws_upgrade(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
) -> Result<Response, ApiError> {
    // Authenticate before upgrade
    let claims = decode_token(&query.token, &state.config.auth.jwt_secret)?;

    Ok(ws.on_upgrade(move |socket| handle_ws_connection(state, claims.sub, claims.email, socket)))
}

/// Forwards domain events to an established WebSocket connection.
async fn handle_ws_connection(
    state: AppState,
    user_id: uuid::Uuid,
    email: String,
    socket: WebSocket,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut events = state.hub.subscribe(user_id, &email);

    info!(user_id = %user_id, "WebSocket connection established");

    // Outbound event forwarder
    let outbound_task = tokio::spawn(async move {
        use futures::SinkExt;
        while let Some(event) = events.recv().await {
            let json = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(e) => {
                    warn!(error = %e, "Failed to serialize domain event");
                    continue;
                }
            };
            if ws_tx.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    // Inbound messages are not part of the protocol; we only watch for
    // the connection ending.
    while let Some(result) = ws_rx.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    outbound_task.abort();
    state.hub.disconnect(user_id);

    info!(user_id = %user_id, "WebSocket connection closed");
}
