//! Sync endpoint routes.

use axum::{extract::State, routing::post, Json, Router};

use crate::handlers::{handle_sync, SyncRequest, SyncResponse};
use crate::AppState;

/// Create sync routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/sync", post(sync_handler))
}

/// POST /api/sync - Replay an offline operation queue.
async fn sync_handler(
    State(state): State<AppState>,
    Json(request): Json<SyncRequest>,
) -> Json<SyncResponse> {
    Json(handle_sync(&state.engine, request).await)
}
