//! Conflict detection between a proposed rental period and existing
//! reservations.
//!
//! Only Pending and Active reservations occupy a vehicle. The cached
//! vehicle status is never consulted here; the interval scan against
//! the store is authoritative.

use crate::interval::DateInterval;
use crate::model::{Reservation, ReservationStatus};
use crate::store::RentalStore;
use crate::Result;

/// Statuses that occupy a vehicle for conflict purposes.
pub const OCCUPYING_STATUSES: [ReservationStatus; 2] =
    [ReservationStatus::Pending, ReservationStatus::Active];

/// Scans a vehicle's occupying reservations for period overlaps.
pub struct ConflictDetector<'a> {
    store: &'a dyn RentalStore,
}

impl<'a> ConflictDetector<'a> {
    pub fn new(store: &'a dyn RentalStore) -> Self {
        Self { store }
    }

    /// First occupying reservation on `vehicle_id` whose period
    /// overlaps `period`, excluding `exclude` (a reservation being
    /// edited is checked against everything but itself).
    ///
    /// An empty fetch means no conflict. A failed fetch is a propagated
    /// error, never `None`: allowing a double-booking because a read
    /// timed out would be a correctness bug, not a degraded experience.
    pub async fn find_conflict(
        &self,
        vehicle_id: &str,
        period: &DateInterval,
        exclude: Option<&str>,
    ) -> Result<Option<Reservation>> {
        let occupying = self
            .store
            .reservations_for_vehicle(vehicle_id, &OCCUPYING_STATUSES)
            .await?;

        Ok(occupying
            .into_iter()
            .filter(|r| exclude != Some(r.id.as_str()))
            .find(|r| r.period.overlaps(period)))
    }

    /// Whether any occupying reservation overlaps `period`.
    pub async fn has_conflict(
        &self,
        vehicle_id: &str,
        period: &DateInterval,
        exclude: Option<&str>,
    ) -> Result<bool> {
        Ok(self
            .find_conflict(vehicle_id, period, exclude)
            .await?
            .is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, StoreError, StoreResult};
    use crate::memory::MemoryStore;
    use crate::model::{
        Customer, CustomerPatch, InitialStatus, ReservationDraft, ReservationPatch, Vehicle,
        VehiclePatch,
    };
    use async_trait::async_trait;
    use chrono::{NaiveDate, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn period(start: (i32, u32, u32), end: (i32, u32, u32)) -> DateInterval {
        DateInterval::new(date(start.0, start.1, start.2), date(end.0, end.1, end.2)).unwrap()
    }

    async fn seed_reservation(
        store: &MemoryStore,
        id: &str,
        vehicle_id: &str,
        p: DateInterval,
        status: ReservationStatus,
    ) {
        let draft = ReservationDraft {
            vehicle_id: vehicle_id.into(),
            customer_id: "CUST-0001".into(),
            period: p,
            status: InitialStatus::Pending,
            advance_amount: 0,
            total_amount: None,
        };
        let mut r = Reservation::new(id, &draft, Utc::now());
        r.status = status;
        store.insert_reservation(r).await.unwrap();
    }

    #[tokio::test]
    async fn empty_store_has_no_conflict() {
        let store = MemoryStore::new();
        let detector = ConflictDetector::new(&store);
        let hit = detector
            .find_conflict("KA-01-1234", &period((2024, 6, 10), (2024, 6, 15)), None)
            .await
            .unwrap();
        assert!(hit.is_none());
    }

    #[tokio::test]
    async fn overlapping_active_reservation_conflicts() {
        let store = MemoryStore::new();
        seed_reservation(
            &store,
            "BK-20240610-001",
            "KA-01-1234",
            period((2024, 6, 10), (2024, 6, 15)),
            ReservationStatus::Active,
        )
        .await;

        let detector = ConflictDetector::new(&store);
        let hit = detector
            .find_conflict("KA-01-1234", &period((2024, 6, 14), (2024, 6, 18)), None)
            .await
            .unwrap();
        assert_eq!(hit.unwrap().id, "BK-20240610-001");
    }

    #[tokio::test]
    async fn pending_reservation_also_occupies() {
        let store = MemoryStore::new();
        seed_reservation(
            &store,
            "BK-20240610-001",
            "KA-01-1234",
            period((2024, 6, 10), (2024, 6, 15)),
            ReservationStatus::Pending,
        )
        .await;

        let detector = ConflictDetector::new(&store);
        assert!(detector
            .has_conflict("KA-01-1234", &period((2024, 6, 12), (2024, 6, 13)), None)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn returned_and_cancelled_are_exempt() {
        let store = MemoryStore::new();
        seed_reservation(
            &store,
            "BK-20240610-001",
            "KA-01-1234",
            period((2024, 6, 10), (2024, 6, 15)),
            ReservationStatus::Returned,
        )
        .await;
        seed_reservation(
            &store,
            "BK-20240610-002",
            "KA-01-1234",
            period((2024, 6, 10), (2024, 6, 15)),
            ReservationStatus::Cancelled,
        )
        .await;

        let detector = ConflictDetector::new(&store);
        assert!(!detector
            .has_conflict("KA-01-1234", &period((2024, 6, 10), (2024, 6, 15)), None)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn other_vehicles_do_not_conflict() {
        let store = MemoryStore::new();
        seed_reservation(
            &store,
            "BK-20240610-001",
            "KA-02-9999",
            period((2024, 6, 10), (2024, 6, 15)),
            ReservationStatus::Active,
        )
        .await;

        let detector = ConflictDetector::new(&store);
        assert!(!detector
            .has_conflict("KA-01-1234", &period((2024, 6, 10), (2024, 6, 15)), None)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn excluded_reservation_does_not_conflict_with_itself() {
        let store = MemoryStore::new();
        seed_reservation(
            &store,
            "BK-20240610-001",
            "KA-01-1234",
            period((2024, 6, 10), (2024, 6, 15)),
            ReservationStatus::Active,
        )
        .await;

        let detector = ConflictDetector::new(&store);
        assert!(!detector
            .has_conflict(
                "KA-01-1234",
                &period((2024, 6, 10), (2024, 6, 15)),
                Some("BK-20240610-001"),
            )
            .await
            .unwrap());
    }

    /// Store whose reservation reads always fail.
    struct UnreachableStore;

    #[async_trait]
    impl RentalStore for UnreachableStore {
        async fn insert_vehicle(&self, _: Vehicle) -> StoreResult<()> {
            unimplemented!()
        }
        async fn update_vehicle(&self, _: &str, _: VehiclePatch) -> StoreResult<()> {
            unimplemented!()
        }
        async fn get_vehicle(&self, _: &str) -> StoreResult<Option<Vehicle>> {
            unimplemented!()
        }
        async fn list_vehicles(&self) -> StoreResult<Vec<Vehicle>> {
            unimplemented!()
        }
        async fn insert_customer(&self, _: Customer) -> StoreResult<()> {
            unimplemented!()
        }
        async fn update_customer(&self, _: &str, _: CustomerPatch) -> StoreResult<()> {
            unimplemented!()
        }
        async fn get_customer(&self, _: &str) -> StoreResult<Option<Customer>> {
            unimplemented!()
        }
        async fn count_customers(&self) -> StoreResult<u64> {
            unimplemented!()
        }
        async fn insert_reservation(&self, _: Reservation) -> StoreResult<()> {
            unimplemented!()
        }
        async fn update_reservation(&self, _: &str, _: ReservationPatch) -> StoreResult<()> {
            unimplemented!()
        }
        async fn get_reservation(&self, _: &str) -> StoreResult<Option<Reservation>> {
            unimplemented!()
        }
        async fn reservations_for_vehicle(
            &self,
            _: &str,
            _: &[ReservationStatus],
        ) -> StoreResult<Vec<Reservation>> {
            Err(StoreError::Unavailable("read timed out".into()))
        }
        async fn count_reservations_prefixed(&self, _: &str) -> StoreResult<u64> {
            unimplemented!()
        }
    }

    #[tokio::test]
    async fn fetch_failure_propagates_instead_of_reading_as_no_conflict() {
        let store = UnreachableStore;
        let detector = ConflictDetector::new(&store);
        let err = detector
            .has_conflict("KA-01-1234", &period((2024, 6, 10), (2024, 6, 15)), None)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            Error::Store(StoreError::Unavailable("read timed out".into()))
        );
    }
}
