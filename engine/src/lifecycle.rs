//! Reservation status transitions.
//!
//! Pending and Active are live; Returned and Cancelled are terminal.
//! Confirming an unchanged reservation needs no fresh conflict check;
//! returning or cancelling is always permitted and releases the
//! vehicle for future periods.

use crate::error::{Error, Result};
use crate::model::ReservationStatus;

/// Whether `from -> to` is a permitted status change. Staying on a live
/// status is allowed (idempotent confirms, no-op edits); terminal
/// states permit nothing, including themselves.
pub fn can_transition(from: ReservationStatus, to: ReservationStatus) -> bool {
    use ReservationStatus::*;
    match (from, to) {
        (Pending, Pending) => true,
        (Pending | Active, Active) => true,
        (Pending | Active, Returned) => true,
        (Pending | Active, Cancelled) => true,
        _ => false,
    }
}

/// Check a transition, failing with [`Error::InvalidTransition`].
pub fn ensure_transition(from: ReservationStatus, to: ReservationStatus) -> Result<()> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(Error::InvalidTransition { from, to })
    }
}
