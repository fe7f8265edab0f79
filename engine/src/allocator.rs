//! Human-readable identifier allocation.
//!
//! Booking ids look like `BK-20240610-001`: prefix, reference-date
//! stamp, then a per-date sequence. Customer ids look like `CUST-0042`.
//! The sequence is a store count plus one, which is not atomic: two
//! concurrent allocations can compute the same number. The insert is
//! therefore what settles ownership; on a duplicate-key rejection the
//! caller asks for [`IdAllocator::next_candidate`], bounded by
//! [`EngineConfig::max_id_attempts`].
//!
//! [`EngineConfig::max_id_attempts`]: crate::EngineConfig::max_id_attempts

use chrono::NaiveDate;

use crate::engine::EngineConfig;
use crate::error::{Error, Result};
use crate::store::RentalStore;

/// Allocates booking and customer identifiers against a store.
pub struct IdAllocator<'a> {
    store: &'a dyn RentalStore,
    config: &'a EngineConfig,
}

/// A candidate identifier plus enough context to derive the next one
/// after an insert race.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdCandidate {
    /// The identifier to try inserting with.
    pub id: String,
    scope: String,
    seq: u64,
    width: usize,
    attempt: u32,
}

impl IdCandidate {
    fn new(scope: String, seq: u64, width: usize, attempt: u32) -> Self {
        let id = format!("{scope}{seq:0width$}");
        Self {
            id,
            scope,
            seq,
            width,
            attempt,
        }
    }

    /// Which attempt this candidate is, starting at 1.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }
}

impl<'a> IdAllocator<'a> {
    pub fn new(store: &'a dyn RentalStore, config: &'a EngineConfig) -> Self {
        Self { store, config }
    }

    /// First candidate for a booking id scoped to `reference`, derived
    /// from the current count of same-date bookings.
    pub async fn booking_candidate(&self, reference: NaiveDate) -> Result<IdCandidate> {
        let scope = format!(
            "{}-{}-",
            self.config.booking_prefix,
            reference.format("%Y%m%d")
        );
        let count = self.store.count_reservations_prefixed(&scope).await?;
        Ok(IdCandidate::new(
            scope,
            count + 1,
            self.config.booking_seq_width,
            1,
        ))
    }

    /// First candidate for a customer id, derived from the current
    /// customer count.
    pub async fn customer_candidate(&self) -> Result<IdCandidate> {
        let scope = format!("{}-", self.config.customer_prefix);
        let count = self.store.count_customers().await?;
        Ok(IdCandidate::new(
            scope,
            count + 1,
            self.config.customer_seq_width,
            1,
        ))
    }

    /// Next candidate after an insert came back `DuplicateKey`. Fails
    /// with [`Error::IdAllocationExhausted`] once the retry ceiling is
    /// reached.
    pub fn next_candidate(&self, prev: IdCandidate) -> Result<IdCandidate> {
        if prev.attempt >= self.config.max_id_attempts {
            return Err(Error::IdAllocationExhausted {
                scope: prev.scope,
                attempts: prev.attempt,
            });
        }
        Ok(IdCandidate::new(
            prev.scope,
            prev.seq + 1,
            prev.width,
            prev.attempt + 1,
        ))
    }
}
