//! The reservation engine facade.
//!
//! One value owns the store capability and the id policy; every public
//! operation is an independently invocable unit of work with no state
//! shared between calls.

use std::sync::Arc;

use chrono::Utc;

use crate::allocator::IdAllocator;
use crate::conflict::ConflictDetector;
use crate::error::{Error, Result, StoreError};
use crate::interval::DateInterval;
use crate::lifecycle::ensure_transition;
use crate::model::{
    Customer, CustomerDraft, CustomerPatch, Reservation, ReservationDraft, ReservationPatch,
    ReservationStatus, Vehicle, VehicleDraft, VehiclePatch, VehicleStatus,
};
use crate::store::RentalStore;

/// Identifier policy and allocation limits, passed in at construction.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Booking id prefix, e.g. `BK` in `BK-20240610-001`.
    pub booking_prefix: String,
    /// Customer id prefix, e.g. `CUST` in `CUST-0042`.
    pub customer_prefix: String,
    /// Zero-padding width of the per-date booking sequence.
    pub booking_seq_width: usize,
    /// Zero-padding width of the customer sequence.
    pub customer_seq_width: usize,
    /// How many candidate ids an allocation may try before giving up
    /// with `IdAllocationExhausted`.
    pub max_id_attempts: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            booking_prefix: "BK".into(),
            customer_prefix: "CUST".into(),
            booking_seq_width: 3,
            customer_seq_width: 4,
            max_id_attempts: 5,
        }
    }
}

/// The reservation engine: conflict-gated booking lifecycle, id
/// allocation, and offline-queue reconciliation over an abstract store.
pub struct ReservationEngine {
    store: Arc<dyn RentalStore>,
    config: EngineConfig,
}

impl ReservationEngine {
    pub fn new(store: Arc<dyn RentalStore>, config: EngineConfig) -> Self {
        Self { store, config }
    }

    fn detector(&self) -> ConflictDetector<'_> {
        ConflictDetector::new(self.store.as_ref())
    }

    fn allocator(&self) -> IdAllocator<'_> {
        IdAllocator::new(self.store.as_ref(), &self.config)
    }

    // ── Lookups ─────────────────────────────────────────────

    pub async fn reservation(&self, id: &str) -> Result<Reservation> {
        self.store
            .get_reservation(id)
            .await?
            .ok_or_else(|| Error::RecordNotFound(id.to_string()))
    }

    pub async fn vehicle(&self, id: &str) -> Result<Vehicle> {
        self.store
            .get_vehicle(id)
            .await?
            .ok_or_else(|| Error::RecordNotFound(id.to_string()))
    }

    pub async fn customer(&self, id: &str) -> Result<Customer> {
        self.store
            .get_customer(id)
            .await?
            .ok_or_else(|| Error::RecordNotFound(id.to_string()))
    }

    pub async fn vehicles(&self) -> Result<Vec<Vehicle>> {
        Ok(self.store.list_vehicles().await?)
    }

    // ── Availability ────────────────────────────────────────

    /// Whether `vehicle_id` is free for the whole of `period`.
    pub async fn check_availability(
        &self,
        vehicle_id: &str,
        period: &DateInterval,
    ) -> Result<bool> {
        Ok(!self
            .detector()
            .has_conflict(vehicle_id, period, None)
            .await?)
    }

    /// Vehicles with no occupying reservation overlapping `period`.
    pub async fn available_vehicles(&self, period: &DateInterval) -> Result<Vec<Vehicle>> {
        let detector = self.detector();
        let mut free = Vec::new();
        for vehicle in self.store.list_vehicles().await? {
            if !detector.has_conflict(&vehicle.id, period, None).await? {
                free.push(vehicle);
            }
        }
        Ok(free)
    }

    // ── Reservation lifecycle ───────────────────────────────

    /// Create a reservation: conflict-gate the requested period, then
    /// allocate an id and insert, walking the id sequence past
    /// duplicate-key races.
    pub async fn create_reservation(&self, draft: ReservationDraft) -> Result<Reservation> {
        self.vehicle(&draft.vehicle_id).await?;
        self.customer(&draft.customer_id).await?;

        if let Some(hit) = self
            .detector()
            .find_conflict(&draft.vehicle_id, &draft.period, None)
            .await?
        {
            return Err(Error::BookingConflict {
                vehicle_id: draft.vehicle_id,
                conflicting_id: hit.id,
            });
        }

        let allocator = self.allocator();
        let mut candidate = allocator.booking_candidate(draft.period.start()).await?;
        let now = Utc::now();
        loop {
            let reservation = Reservation::new(candidate.id.clone(), &draft, now);
            match self.store.insert_reservation(reservation.clone()).await {
                Ok(()) => {
                    if reservation.status == ReservationStatus::Active {
                        self.refresh_vehicle_status(&reservation.vehicle_id).await?;
                    }
                    return Ok(reservation);
                }
                Err(StoreError::DuplicateKey(_)) => {
                    candidate = allocator.next_candidate(candidate)?;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Confirm a pending reservation. The period is unchanged, so no
    /// fresh conflict check is needed.
    pub async fn confirm_reservation(&self, id: &str) -> Result<Reservation> {
        let current = self.reservation(id).await?;
        ensure_transition(current.status, ReservationStatus::Active)?;
        self.apply_status(&current, ReservationPatch::status(ReservationStatus::Active))
            .await
    }

    /// Hand the vehicle back, optionally settling the final amount.
    pub async fn return_reservation(
        &self,
        id: &str,
        total_amount: Option<i64>,
    ) -> Result<Reservation> {
        let current = self.reservation(id).await?;
        ensure_transition(current.status, ReservationStatus::Returned)?;
        let patch = ReservationPatch {
            status: Some(ReservationStatus::Returned),
            total_amount,
            ..Default::default()
        };
        self.apply_status(&current, patch).await
    }

    /// Call off a live reservation. Same release effect as a return.
    pub async fn cancel_reservation(&self, id: &str) -> Result<Reservation> {
        let current = self.reservation(id).await?;
        ensure_transition(current.status, ReservationStatus::Cancelled)?;
        self.apply_status(&current, ReservationPatch::status(ReservationStatus::Cancelled))
            .await
    }

    /// Edit a reservation. Moving it to a different vehicle or period
    /// re-runs the conflict check excluding the reservation itself; on
    /// conflict nothing is written and the prior interval stands.
    pub async fn update_reservation(
        &self,
        id: &str,
        patch: ReservationPatch,
    ) -> Result<Reservation> {
        let current = self.reservation(id).await?;

        if let Some(to) = patch.status {
            ensure_transition(current.status, to)?;
        } else if current.status.is_terminal() && !patch.is_empty() {
            return Err(Error::ReservationClosed(current.id));
        }

        let resulting_status = patch.status.unwrap_or(current.status);
        if patch.reschedules(&current) && resulting_status.occupies_vehicle() {
            let vehicle_id = patch
                .vehicle_id
                .clone()
                .unwrap_or_else(|| current.vehicle_id.clone());
            let period = patch.period.unwrap_or(current.period);
            if vehicle_id != current.vehicle_id {
                self.vehicle(&vehicle_id).await?;
            }
            if let Some(hit) = self
                .detector()
                .find_conflict(&vehicle_id, &period, Some(id))
                .await?
            {
                return Err(Error::BookingConflict {
                    vehicle_id,
                    conflicting_id: hit.id,
                });
            }
        }

        let moved_to = patch
            .vehicle_id
            .clone()
            .filter(|v| *v != current.vehicle_id);
        match self.store.update_reservation(id, patch).await {
            Ok(()) => {}
            Err(StoreError::NotFound(missing)) => return Err(Error::RecordNotFound(missing)),
            Err(err) => return Err(err.into()),
        }

        self.refresh_vehicle_status(&current.vehicle_id).await?;
        if let Some(vehicle_id) = moved_to {
            self.refresh_vehicle_status(&vehicle_id).await?;
        }

        self.reservation(id).await
    }

    async fn apply_status(
        &self,
        current: &Reservation,
        patch: ReservationPatch,
    ) -> Result<Reservation> {
        match self.store.update_reservation(&current.id, patch).await {
            Ok(()) => {}
            Err(StoreError::NotFound(missing)) => return Err(Error::RecordNotFound(missing)),
            Err(err) => return Err(err.into()),
        }
        self.refresh_vehicle_status(&current.vehicle_id).await?;
        self.reservation(&current.id).await
    }

    /// Re-derive the cached vehicle status from its active
    /// reservations. The cache is advisory and never consulted by
    /// conflict checks; `UnderMaintenance` is caller-owned and left
    /// alone.
    async fn refresh_vehicle_status(&self, vehicle_id: &str) -> Result<()> {
        let Some(vehicle) = self.store.get_vehicle(vehicle_id).await? else {
            return Ok(());
        };
        if vehicle.status == VehicleStatus::UnderMaintenance {
            return Ok(());
        }
        let active = self
            .store
            .reservations_for_vehicle(vehicle_id, &[ReservationStatus::Active])
            .await?;
        let derived = if active.is_empty() {
            VehicleStatus::Available
        } else {
            VehicleStatus::Rented
        };
        if derived != vehicle.status {
            self.store
                .update_vehicle(vehicle_id, VehiclePatch::status(derived))
                .await?;
        }
        Ok(())
    }

    // ── Fleet and customers ─────────────────────────────────

    /// Register a vehicle under its fleet code.
    pub async fn add_vehicle(&self, draft: VehicleDraft) -> Result<Vehicle> {
        let vehicle = Vehicle::new(draft, Utc::now());
        self.store.insert_vehicle(vehicle.clone()).await?;
        Ok(vehicle)
    }

    pub async fn update_vehicle(&self, id: &str, patch: VehiclePatch) -> Result<Vehicle> {
        match self.store.update_vehicle(id, patch).await {
            Ok(()) => self.vehicle(id).await,
            Err(StoreError::NotFound(missing)) => Err(Error::RecordNotFound(missing)),
            Err(err) => Err(err.into()),
        }
    }

    /// Register a customer. Without a pre-assigned id, allocates the
    /// next customer id, walking the sequence past duplicate-key races.
    pub async fn register_customer(&self, draft: CustomerDraft) -> Result<Customer> {
        let now = Utc::now();

        if let Some(id) = &draft.id {
            let customer = Customer::new(id.clone(), &draft, now);
            self.store.insert_customer(customer.clone()).await?;
            return Ok(customer);
        }

        let allocator = self.allocator();
        let mut candidate = allocator.customer_candidate().await?;
        loop {
            let customer = Customer::new(candidate.id.clone(), &draft, now);
            match self.store.insert_customer(customer.clone()).await {
                Ok(()) => return Ok(customer),
                Err(StoreError::DuplicateKey(_)) => {
                    candidate = allocator.next_candidate(candidate)?;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    pub async fn update_customer(&self, id: &str, patch: CustomerPatch) -> Result<Customer> {
        match self.store.update_customer(id, patch).await {
            Ok(()) => self.customer(id).await,
            Err(StoreError::NotFound(missing)) => Err(Error::RecordNotFound(missing)),
            Err(err) => Err(err.into()),
        }
    }
}
