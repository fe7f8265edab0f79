//! Error types for the reservation engine.

use crate::{ReservationId, ReservationStatus, VehicleId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by the store capability.
///
/// These propagate through the engine unchanged so a caller can tell
/// "your request is invalid" apart from "the store could not answer".
/// In particular a failed read is never collapsed into "no conflict".
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StoreError {
    /// An insert hit an existing primary key.
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    /// An update targeted a record that does not exist.
    #[error("record not found: {0}")]
    NotFound(String),

    /// The store could not be reached or answered with a transient failure.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// All possible errors from the reservation engine.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Error {
    /// The requested period has its start after its end. Rejected before
    /// any store access.
    #[error("invalid interval: start {start} is after end {end}")]
    InvalidInterval { start: NaiveDate, end: NaiveDate },

    /// The requested period overlaps an existing occupying reservation
    /// on the same vehicle.
    #[error("booking conflict on vehicle {vehicle_id}: overlaps reservation {conflicting_id}")]
    BookingConflict {
        vehicle_id: VehicleId,
        conflicting_id: ReservationId,
    },

    /// Every candidate identifier up to the retry ceiling was already
    /// taken. Signals systemic contention on the sequence scope.
    #[error("id allocation exhausted for scope '{scope}' after {attempts} attempts")]
    IdAllocationExhausted { scope: String, attempts: u32 },

    /// A referenced record does not exist (deleted remotely, or never
    /// created).
    #[error("record not found: {0}")]
    RecordNotFound(String),

    /// The requested status change is not permitted by the lifecycle.
    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: ReservationStatus,
        to: ReservationStatus,
    },

    /// The reservation is in a terminal state and cannot be modified.
    #[error("reservation {0} is closed and cannot be modified")]
    ReservationClosed(ReservationId),

    /// A store-level failure, passed through unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
