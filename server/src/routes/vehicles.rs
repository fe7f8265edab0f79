//! Fleet endpoints: registration, updates, availability queries.

use axum::{
    extract::{Path, Query, State},
    routing::{get, patch},
    Json, Router,
};
use chrono::NaiveDate;
use motorpool_engine::{DateInterval, Vehicle, VehicleDraft, VehiclePatch};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::AppState;

/// Create vehicle routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/vehicles", get(list).post(create))
        .route("/api/vehicles/available", get(available))
        .route("/api/vehicles/{id}", patch(update))
        .route("/api/vehicles/{id}/availability", get(availability))
}

/// Rental period query parameters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PeriodQuery {
    fn period(&self) -> Result<DateInterval> {
        Ok(DateInterval::new(self.start, self.end)?)
    }
}

/// Availability answer for one vehicle and period.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub vehicle_id: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub available: bool,
}

/// GET /api/vehicles
async fn list(State(state): State<AppState>) -> Result<Json<Vec<Vehicle>>> {
    Ok(Json(state.engine.vehicles().await?))
}

/// POST /api/vehicles - Register a vehicle under its fleet code.
async fn create(
    State(state): State<AppState>,
    Json(draft): Json<VehicleDraft>,
) -> Result<Json<Vehicle>> {
    Ok(Json(state.engine.add_vehicle(draft).await?))
}

/// PATCH /api/vehicles/{id}
async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<VehiclePatch>,
) -> Result<Json<Vehicle>> {
    Ok(Json(state.engine.update_vehicle(&id, patch).await?))
}

/// GET /api/vehicles/{id}/availability?start=..&end=..
///
/// The answer comes from the reservation intervals, not the cached
/// vehicle status.
async fn availability(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<AvailabilityResponse>> {
    let period = query.period()?;
    let available = state.engine.check_availability(&id, &period).await?;
    Ok(Json(AvailabilityResponse {
        vehicle_id: id,
        start: query.start,
        end: query.end,
        available,
    }))
}

/// GET /api/vehicles/available?start=..&end=.. - Vehicles free for the
/// whole period.
async fn available(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<Vec<Vehicle>>> {
    let period = query.period()?;
    Ok(Json(state.engine.available_vehicles(&period).await?))
}
