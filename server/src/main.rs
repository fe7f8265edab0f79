//! Motorpool Server - rental backend for fleet, customers and
//! reservations.
//!
//! Exposes the reservation engine over HTTP: conflict-gated booking
//! endpoints, availability queries, and an offline-queue sync endpoint
//! that replays client mutations through the reconciliation engine.

mod config;
mod db;
mod error;
mod handlers;
mod routes;

use crate::config::{Config, StoreBackend};
use axum::Router;
use motorpool_engine::{MemoryStore, RentalStore, ReservationEngine};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ReservationEngine>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "motorpool_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing::info!(
        "Starting Motorpool Server on {}:{}",
        config.host,
        config.port
    );

    // Select the store backend
    let store: Arc<dyn RentalStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .clone()
                .ok_or("DATABASE_URL is required for the postgres backend")?;
            let pool = db::create_pool(&url).await?;

            tracing::info!("Running database migrations...");
            db::run_migrations(&pool).await?;

            Arc::new(db::PgStore::new(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store; data will not survive a restart");
            Arc::new(MemoryStore::new())
        }
    };

    // Build application state
    let engine = Arc::new(ReservationEngine::new(store, config.engine_config()));
    let state = AppState {
        engine,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = Router::new()
        .merge(routes::create_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
