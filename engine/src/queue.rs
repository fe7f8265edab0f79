//! Offline operation queue entries.
//!
//! A disconnected client records its mutations as queue entries and
//! hands the whole queue to [`reconcile`] once it is back online. Each
//! kind carries a statically-known payload, so replay can handle every
//! case exhaustively without inspecting dynamic data.
//!
//! [`reconcile`]: crate::ReservationEngine::reconcile

use serde::{Deserialize, Serialize};

use crate::model::{
    CustomerDraft, CustomerPatch, ReservationDraft, ReservationPatch, VehicleDraft, VehiclePatch,
};
use crate::{CustomerId, OperationId, ReservationId, VehicleId};

/// A queued mutation awaiting replay against the authoritative store.
///
/// The `op_id` is client-generated and only used for reporting; the
/// presence of a record id is what distinguishes an update from a
/// create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum PendingOperation {
    CreateVehicle {
        op_id: OperationId,
        draft: VehicleDraft,
    },
    UpdateVehicle {
        op_id: OperationId,
        id: VehicleId,
        patch: VehiclePatch,
    },
    CreateCustomer {
        op_id: OperationId,
        draft: CustomerDraft,
    },
    UpdateCustomer {
        op_id: OperationId,
        id: CustomerId,
        patch: CustomerPatch,
    },
    CreateBooking {
        op_id: OperationId,
        draft: ReservationDraft,
    },
    UpdateBooking {
        op_id: OperationId,
        id: ReservationId,
        patch: ReservationPatch,
    },
}

impl PendingOperation {
    /// Client-assigned id of this queue entry.
    pub fn op_id(&self) -> &OperationId {
        match self {
            Self::CreateVehicle { op_id, .. }
            | Self::UpdateVehicle { op_id, .. }
            | Self::CreateCustomer { op_id, .. }
            | Self::UpdateCustomer { op_id, .. }
            | Self::CreateBooking { op_id, .. }
            | Self::UpdateBooking { op_id, .. } => op_id,
        }
    }

    /// Wire name of this operation kind, for reporting.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CreateVehicle { .. } => "createVehicle",
            Self::UpdateVehicle { .. } => "updateVehicle",
            Self::CreateCustomer { .. } => "createCustomer",
            Self::UpdateCustomer { .. } => "updateCustomer",
            Self::CreateBooking { .. } => "createBooking",
            Self::UpdateBooking { .. } => "updateBooking",
        }
    }

    /// Whether replaying this entry can touch reservations, and so must
    /// stay strictly ordered relative to other booking entries.
    pub fn affects_bookings(&self) -> bool {
        matches!(
            self,
            Self::CreateBooking { .. } | Self::UpdateBooking { .. }
        )
    }
}
