//! Unified error handling for the server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use motorpool_engine::{Error as EngineError, StoreError};
use serde::Serialize;

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Invalid request: {0}")]
    BadRequest(String),
}

/// Error response body.
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Engine(err) => match err {
                EngineError::InvalidInterval { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                EngineError::BookingConflict { .. } => StatusCode::CONFLICT,
                EngineError::RecordNotFound(_) => StatusCode::NOT_FOUND,
                EngineError::InvalidTransition { .. } | EngineError::ReservationClosed(_) => {
                    StatusCode::CONFLICT
                }
                EngineError::IdAllocationExhausted { .. } => StatusCode::SERVICE_UNAVAILABLE,
                EngineError::Store(StoreError::DuplicateKey(_)) => StatusCode::CONFLICT,
                EngineError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
                EngineError::Store(StoreError::Unavailable(_)) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed on a store error");
        } else {
            tracing::debug!(error = %self, status = %status, "request rejected");
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
            details: None,
        });
        (status, body).into_response()
    }
}

/// Result type alias for handlers.
pub type Result<T> = std::result::Result<T, AppError>;
