//! Reservation endpoints: create, inspect, edit, confirm, return,
//! cancel.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use motorpool_engine::{
    DateInterval, InitialStatus, Reservation, ReservationDraft, ReservationPatch,
};
use serde::Deserialize;

use crate::error::Result;
use crate::AppState;

/// Create reservation routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/reservations", post(create))
        .route("/api/reservations/{id}", get(show).patch(update))
        .route("/api/reservations/{id}/confirm", post(confirm))
        .route("/api/reservations/{id}/return", post(return_vehicle))
        .route("/api/reservations/{id}/cancel", post(cancel))
}

/// Request body for creating a reservation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    pub vehicle_id: String,
    pub customer_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub status: InitialStatus,
    #[serde(default)]
    pub advance_amount: i64,
    #[serde(default)]
    pub total_amount: Option<i64>,
}

/// Request body for returning a vehicle.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReturnRequest {
    /// Settles the final amount when present.
    pub total_amount: Option<i64>,
}

/// POST /api/reservations - Create a conflict-gated reservation.
async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateReservationRequest>,
) -> Result<Json<Reservation>> {
    let period = DateInterval::new(request.start_date, request.end_date)?;
    let draft = ReservationDraft {
        vehicle_id: request.vehicle_id,
        customer_id: request.customer_id,
        period,
        status: request.status,
        advance_amount: request.advance_amount,
        total_amount: request.total_amount,
    };
    let reservation = state.engine.create_reservation(draft).await?;
    Ok(Json(reservation))
}

/// GET /api/reservations/{id}
async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Reservation>> {
    Ok(Json(state.engine.reservation(&id).await?))
}

/// PATCH /api/reservations/{id} - Edit fields; rescheduling re-runs the
/// conflict check.
async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ReservationPatch>,
) -> Result<Json<Reservation>> {
    Ok(Json(state.engine.update_reservation(&id, patch).await?))
}

/// POST /api/reservations/{id}/confirm
async fn confirm(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Reservation>> {
    Ok(Json(state.engine.confirm_reservation(&id).await?))
}

/// POST /api/reservations/{id}/return
async fn return_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ReturnRequest>,
) -> Result<Json<Reservation>> {
    Ok(Json(
        state
            .engine
            .return_reservation(&id, request.total_amount)
            .await?,
    ))
}

/// POST /api/reservations/{id}/cancel
async fn cancel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Reservation>> {
    Ok(Json(state.engine.cancel_reservation(&id).await?))
}
