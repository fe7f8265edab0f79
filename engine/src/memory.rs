//! In-memory store for development and testing.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use crate::error::{StoreError, StoreResult};
use crate::model::{
    Customer, CustomerPatch, Reservation, ReservationPatch, ReservationStatus, Vehicle,
    VehiclePatch,
};
use crate::store::RentalStore;
use crate::{CustomerId, ReservationId, VehicleId};

/// A [`RentalStore`] backed by in-process hash maps.
///
/// Satisfies the same contracts as a real backend: duplicate-key
/// detection on insert, not-found on update, read-your-writes. Locking
/// is per-call, so interleavings between a count and a subsequent
/// insert are as racy as they would be against a remote store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    vehicles: RwLock<HashMap<VehicleId, Vehicle>>,
    customers: RwLock<HashMap<CustomerId, Customer>>,
    reservations: RwLock<HashMap<ReservationId, Reservation>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of reservations currently held, any status.
    pub fn reservation_count(&self) -> usize {
        self.reservations.read().unwrap().len()
    }

    /// Number of customers currently held.
    pub fn customer_count(&self) -> usize {
        self.customers.read().unwrap().len()
    }

    /// Remove a record outright, as a remote client deleting it would.
    pub fn remove_reservation(&self, id: &str) -> Option<Reservation> {
        self.reservations.write().unwrap().remove(id)
    }
}

#[async_trait]
impl RentalStore for MemoryStore {
    async fn insert_vehicle(&self, vehicle: Vehicle) -> StoreResult<()> {
        let mut vehicles = self.vehicles.write().unwrap();
        if vehicles.contains_key(&vehicle.id) {
            return Err(StoreError::DuplicateKey(vehicle.id));
        }
        vehicles.insert(vehicle.id.clone(), vehicle);
        Ok(())
    }

    async fn update_vehicle(&self, id: &str, patch: VehiclePatch) -> StoreResult<()> {
        let mut vehicles = self.vehicles.write().unwrap();
        let vehicle = vehicles
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if let Some(make) = patch.make {
            vehicle.make = make;
        }
        if let Some(model) = patch.model {
            vehicle.model = model;
        }
        if let Some(year) = patch.year {
            vehicle.year = year;
        }
        if let Some(daily_rate) = patch.daily_rate {
            vehicle.daily_rate = daily_rate;
        }
        if let Some(status) = patch.status {
            vehicle.status = status;
        }
        vehicle.updated_at = Utc::now();
        Ok(())
    }

    async fn get_vehicle(&self, id: &str) -> StoreResult<Option<Vehicle>> {
        Ok(self.vehicles.read().unwrap().get(id).cloned())
    }

    async fn list_vehicles(&self) -> StoreResult<Vec<Vehicle>> {
        let mut vehicles: Vec<_> = self.vehicles.read().unwrap().values().cloned().collect();
        vehicles.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(vehicles)
    }

    async fn insert_customer(&self, customer: Customer) -> StoreResult<()> {
        let mut customers = self.customers.write().unwrap();
        if customers.contains_key(&customer.id) {
            return Err(StoreError::DuplicateKey(customer.id));
        }
        customers.insert(customer.id.clone(), customer);
        Ok(())
    }

    async fn update_customer(&self, id: &str, patch: CustomerPatch) -> StoreResult<()> {
        let mut customers = self.customers.write().unwrap();
        let customer = customers
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if let Some(full_name) = patch.full_name {
            customer.full_name = full_name;
        }
        if let Some(phone) = patch.phone {
            customer.phone = phone;
        }
        if let Some(email) = patch.email {
            customer.email = Some(email);
        }
        if let Some(licence_no) = patch.licence_no {
            customer.licence_no = Some(licence_no);
        }
        customer.updated_at = Utc::now();
        Ok(())
    }

    async fn get_customer(&self, id: &str) -> StoreResult<Option<Customer>> {
        Ok(self.customers.read().unwrap().get(id).cloned())
    }

    async fn count_customers(&self) -> StoreResult<u64> {
        Ok(self.customers.read().unwrap().len() as u64)
    }

    async fn insert_reservation(&self, reservation: Reservation) -> StoreResult<()> {
        let mut reservations = self.reservations.write().unwrap();
        if reservations.contains_key(&reservation.id) {
            return Err(StoreError::DuplicateKey(reservation.id));
        }
        reservations.insert(reservation.id.clone(), reservation);
        Ok(())
    }

    async fn update_reservation(&self, id: &str, patch: ReservationPatch) -> StoreResult<()> {
        let mut reservations = self.reservations.write().unwrap();
        let reservation = reservations
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if let Some(vehicle_id) = patch.vehicle_id {
            reservation.vehicle_id = vehicle_id;
        }
        if let Some(customer_id) = patch.customer_id {
            reservation.customer_id = customer_id;
        }
        if let Some(period) = patch.period {
            reservation.period = period;
        }
        if let Some(status) = patch.status {
            reservation.status = status;
        }
        if let Some(advance_amount) = patch.advance_amount {
            reservation.advance_amount = advance_amount;
        }
        if let Some(total_amount) = patch.total_amount {
            reservation.total_amount = Some(total_amount);
        }
        reservation.updated_at = Utc::now();
        Ok(())
    }

    async fn get_reservation(&self, id: &str) -> StoreResult<Option<Reservation>> {
        Ok(self.reservations.read().unwrap().get(id).cloned())
    }

    async fn reservations_for_vehicle(
        &self,
        vehicle_id: &str,
        status_in: &[ReservationStatus],
    ) -> StoreResult<Vec<Reservation>> {
        let mut matches: Vec<_> = self
            .reservations
            .read()
            .unwrap()
            .values()
            .filter(|r| r.vehicle_id == vehicle_id && status_in.contains(&r.status))
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(matches)
    }

    async fn count_reservations_prefixed(&self, id_prefix: &str) -> StoreResult<u64> {
        Ok(self
            .reservations
            .read()
            .unwrap()
            .keys()
            .filter(|id| id.starts_with(id_prefix))
            .count() as u64)
    }
}
