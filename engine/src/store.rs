//! The store capability the engine depends on.
//!
//! Any backend that satisfies these contracts works: a hosted database,
//! PostgreSQL, or the in-memory [`MemoryStore`](crate::MemoryStore).
//! The engine itself holds no durable state; every call here is a
//! suspension point and everything between calls is synchronous.

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::model::{
    Customer, CustomerPatch, Reservation, ReservationPatch, ReservationStatus, Vehicle,
    VehiclePatch,
};

/// Narrow persistence interface for rental records.
///
/// Contracts the engine relies on:
///
/// - `insert_*` fails with [`StoreError::DuplicateKey`] when the id is
///   already taken, and must do so atomically with respect to
///   concurrent inserts (this is what the allocator's retry leans on).
/// - `update_*` fails with [`StoreError::NotFound`] when the target
///   does not exist and applies only the fields set in the patch.
/// - reads performed after a write in the same task observe that write
///   (read-your-writes), which sequential reconciliation depends on.
///
/// [`StoreError::DuplicateKey`]: crate::StoreError::DuplicateKey
/// [`StoreError::NotFound`]: crate::StoreError::NotFound
#[async_trait]
pub trait RentalStore: Send + Sync {
    // Vehicles
    async fn insert_vehicle(&self, vehicle: Vehicle) -> StoreResult<()>;
    async fn update_vehicle(&self, id: &str, patch: VehiclePatch) -> StoreResult<()>;
    async fn get_vehicle(&self, id: &str) -> StoreResult<Option<Vehicle>>;
    async fn list_vehicles(&self) -> StoreResult<Vec<Vehicle>>;

    // Customers
    async fn insert_customer(&self, customer: Customer) -> StoreResult<()>;
    async fn update_customer(&self, id: &str, patch: CustomerPatch) -> StoreResult<()>;
    async fn get_customer(&self, id: &str) -> StoreResult<Option<Customer>>;
    async fn count_customers(&self) -> StoreResult<u64>;

    // Reservations
    async fn insert_reservation(&self, reservation: Reservation) -> StoreResult<()>;
    async fn update_reservation(&self, id: &str, patch: ReservationPatch) -> StoreResult<()>;
    async fn get_reservation(&self, id: &str) -> StoreResult<Option<Reservation>>;

    /// All reservations for `vehicle_id` whose status is in `status_in`.
    async fn reservations_for_vehicle(
        &self,
        vehicle_id: &str,
        status_in: &[ReservationStatus],
    ) -> StoreResult<Vec<Reservation>>;

    /// Count of reservations whose id starts with `id_prefix`,
    /// regardless of status. Drives per-date booking sequences; ids are
    /// never reused even after cancellation.
    async fn count_reservations_prefixed(&self, id_prefix: &str) -> StoreResult<u64>;
}
