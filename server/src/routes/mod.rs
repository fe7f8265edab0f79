//! HTTP route definitions.

mod customers;
mod health;
mod reservations;
mod sync;
mod vehicles;

use crate::AppState;
use axum::Router;

/// Create all application routes.
pub fn create_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(vehicles::routes())
        .merge(customers::routes())
        .merge(reservations::routes())
        .merge(sync::routes())
}
