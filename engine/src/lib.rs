//! # Motorpool Engine
//!
//! The reservation engine for a vehicle-rental fleet.
//!
//! This crate provides the correctness core a hosted record store does
//! not give you natively: cross-record interval-overlap semantics,
//! collision-resistant human-readable identifiers, and idempotent
//! replay of offline-queued writes.
//!
//! ## Design Principles
//!
//! - **Store-agnostic**: all persistence goes through the [`RentalStore`]
//!   capability; any backend satisfying its contracts works
//! - **No hidden state**: the engine keeps nothing between calls beyond
//!   the configuration it was constructed with
//! - **Errors are answers**: a failed store read propagates; it is never
//!   collapsed into "no conflict"
//!
//! ## Core Concepts
//!
//! ### Intervals
//!
//! Rental periods are closed calendar-date intervals ([`DateInterval`]).
//! Both boundary days are occupied, so two rentals sharing a handover
//! day conflict.
//!
//! ### Conflict detection
//!
//! A vehicle is occupied by its Pending and Active reservations. The
//! [`ConflictDetector`] scans those for period overlaps; the cached
//! [`VehicleStatus`] is advisory only.
//!
//! ### Identifier allocation
//!
//! Booking ids (`BK-20240610-001`) and customer ids (`CUST-0042`) are
//! sequence-numbered from store counts. Counting is not atomic, so the
//! insert settles ownership and the [`IdAllocator`] walks to the next
//! candidate on a duplicate key, up to a bounded ceiling.
//!
//! ### Reconciliation
//!
//! [`ReservationEngine::reconcile`] replays a queue of
//! [`PendingOperation`]s recorded offline, strictly in order, and
//! reports a per-item [`Outcome`] - applied, skipped with a reason, or
//! failed with the store error. One item's failure never aborts the
//! pass.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use chrono::NaiveDate;
//! use motorpool_engine::{
//!     CustomerDraft, DateInterval, EngineConfig, InitialStatus, MemoryStore,
//!     ReservationDraft, ReservationEngine, VehicleDraft,
//! };
//!
//! let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! rt.block_on(async {
//!     let engine = ReservationEngine::new(
//!         Arc::new(MemoryStore::new()),
//!         EngineConfig::default(),
//!     );
//!
//!     engine
//!         .add_vehicle(VehicleDraft {
//!             id: "KA-01-1234".into(),
//!             make: "Toyota".into(),
//!             model: "Corolla".into(),
//!             year: 2021,
//!             daily_rate: 3_500,
//!             status: Default::default(),
//!         })
//!         .await
//!         .unwrap();
//!     let customer = engine
//!         .register_customer(CustomerDraft {
//!             id: None,
//!             full_name: "Asha Rao".into(),
//!             phone: "+91-98450-00000".into(),
//!             email: None,
//!             licence_no: None,
//!         })
//!         .await
//!         .unwrap();
//!
//!     let period = DateInterval::new(
//!         NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
//!         NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
//!     )
//!     .unwrap();
//!     let reservation = engine
//!         .create_reservation(ReservationDraft {
//!             vehicle_id: "KA-01-1234".into(),
//!             customer_id: customer.id,
//!             period,
//!             status: InitialStatus::Active,
//!             advance_amount: 5_000,
//!             total_amount: None,
//!         })
//!         .await
//!         .unwrap();
//!     assert_eq!(reservation.id, "BK-20240610-001");
//!
//!     // the period is now occupied, boundary days included
//!     let handover = DateInterval::new(
//!         NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
//!         NaiveDate::from_ymd_opt(2024, 6, 20).unwrap(),
//!     )
//!     .unwrap();
//!     assert!(!engine.check_availability("KA-01-1234", &handover).await.unwrap());
//! });
//! ```

pub mod allocator;
pub mod conflict;
pub mod engine;
pub mod error;
pub mod interval;
pub mod lifecycle;
pub mod memory;
pub mod model;
pub mod queue;
pub mod reconcile;
pub mod store;

// Re-export main types at crate root
pub use allocator::{IdAllocator, IdCandidate};
pub use conflict::{ConflictDetector, OCCUPYING_STATUSES};
pub use engine::{EngineConfig, ReservationEngine};
pub use error::{Error, Result, StoreError, StoreResult};
pub use interval::DateInterval;
pub use lifecycle::{can_transition, ensure_transition};
pub use memory::MemoryStore;
pub use model::{
    Customer, CustomerDraft, CustomerPatch, InitialStatus, Reservation, ReservationDraft,
    ReservationPatch, ReservationStatus, Vehicle, VehicleDraft, VehiclePatch, VehicleStatus,
};
pub use queue::PendingOperation;
pub use reconcile::{ItemOutcome, Outcome, ReconcileReport, SkipReason};
pub use store::RentalStore;

/// Type aliases for clarity
pub type VehicleId = String;
pub type CustomerId = String;
pub type ReservationId = String;
pub type OperationId = String;
