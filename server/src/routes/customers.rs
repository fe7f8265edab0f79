//! Customer endpoints.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use motorpool_engine::{Customer, CustomerDraft, CustomerPatch};

use crate::error::Result;
use crate::AppState;

/// Create customer routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/customers", post(create))
        .route("/api/customers/{id}", get(show).patch(update))
}

/// POST /api/customers - Register a customer; the id is allocated
/// unless the draft carries one.
async fn create(
    State(state): State<AppState>,
    Json(draft): Json<CustomerDraft>,
) -> Result<Json<Customer>> {
    Ok(Json(state.engine.register_customer(draft).await?))
}

/// GET /api/customers/{id}
async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Customer>> {
    Ok(Json(state.engine.customer(&id).await?))
}

/// PATCH /api/customers/{id}
async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<CustomerPatch>,
) -> Result<Json<Customer>> {
    Ok(Json(state.engine.update_customer(&id, patch).await?))
}
