//! Offline-queue reconciliation.
//!
//! Replays a batch of queued mutations against the authoritative store
//! in original queue order, producing a per-item outcome report. One
//! item's failure never aborts the rest, and nothing is silently
//! dropped: every consumed entry lands in the report, and entries a
//! cancelled pass did not reach are handed back for a future pass.
//!
//! Items run strictly sequentially, so a booking create's conflict
//! check always sees the bookings applied earlier in the same pass.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use crate::engine::ReservationEngine;
use crate::error::{Error, StoreError};
use crate::queue::PendingOperation;
use crate::{OperationId, ReservationId};

/// Why an operation was skipped rather than applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SkipReason {
    /// The proposed period overlaps an occupying reservation. Surfaced
    /// for manual resolution; never retried automatically.
    BookingConflict { conflicting_id: ReservationId },
    /// The update target no longer exists (deleted remotely while the
    /// client was offline).
    RecordNotFound,
    /// A create carrying a pre-assigned id was already applied by an
    /// earlier pass.
    AlreadyApplied,
}

/// Outcome of replaying one queue entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "result",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum Outcome {
    /// The mutation reached the store; `record_id` is the affected
    /// record (allocator-assigned for creates).
    Applied { record_id: String },
    /// A domain rule kept the mutation out; the entry needs caller
    /// attention, not a retry.
    Skipped { reason: SkipReason },
    /// The store could not apply the mutation; the entry may succeed on
    /// a later pass.
    Failed { error: Error },
}

/// One report line: which entry, what happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemOutcome {
    pub op_id: OperationId,
    pub kind: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Result of a reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    /// One entry per processed operation, in queue order.
    pub outcomes: Vec<ItemOutcome>,
    /// Entries a cancelled pass did not reach, in queue order. The
    /// caller requeues these.
    pub unprocessed: Vec<PendingOperation>,
    /// Whether the pass stopped early on cancellation.
    pub cancelled: bool,
}

impl ReconcileReport {
    pub fn applied_count(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Applied { .. }))
    }

    pub fn skipped_count(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Skipped { .. }))
    }

    pub fn failed_count(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Failed { .. }))
    }

    /// Whether every processed entry was applied or skipped - i.e.
    /// nothing is worth retrying.
    pub fn is_clean(&self) -> bool {
        self.failed_count() == 0 && !self.cancelled
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.outcome)).count()
    }
}

impl ReservationEngine {
    /// Replay `operations` to completion. See [`reconcile_with_cancel`]
    /// for the cancellable variant.
    ///
    /// [`reconcile_with_cancel`]: Self::reconcile_with_cancel
    pub async fn reconcile(&self, operations: Vec<PendingOperation>) -> ReconcileReport {
        self.reconcile_with_cancel(operations, &AtomicBool::new(false))
            .await
    }

    /// Replay `operations` in order, checking `cancel` between (never
    /// within) items. On cancellation the report carries the outcomes
    /// produced so far plus the untouched remainder of the queue.
    pub async fn reconcile_with_cancel(
        &self,
        operations: Vec<PendingOperation>,
        cancel: &AtomicBool,
    ) -> ReconcileReport {
        let mut report = ReconcileReport::default();
        let mut queue: VecDeque<PendingOperation> = operations.into();

        while let Some(op) = queue.pop_front() {
            if cancel.load(Ordering::SeqCst) {
                queue.push_front(op);
                report.cancelled = true;
                report.unprocessed = queue.into();
                break;
            }

            let op_id = op.op_id().clone();
            let kind = op.kind().to_string();
            let outcome = self.replay(op).await;
            report.outcomes.push(ItemOutcome {
                op_id,
                kind,
                outcome,
            });
        }

        report
    }

    async fn replay(&self, op: PendingOperation) -> Outcome {
        match op {
            PendingOperation::CreateVehicle { draft, .. } => {
                match self.add_vehicle(draft).await {
                    Ok(vehicle) => Outcome::Applied {
                        record_id: vehicle.id,
                    },
                    Err(Error::Store(StoreError::DuplicateKey(_))) => Outcome::Skipped {
                        reason: SkipReason::AlreadyApplied,
                    },
                    Err(error) => Outcome::Failed { error },
                }
            }
            PendingOperation::UpdateVehicle { id, patch, .. } => {
                match self.update_vehicle(&id, patch).await {
                    Ok(_) => Outcome::Applied { record_id: id },
                    Err(Error::RecordNotFound(_)) => Outcome::Skipped {
                        reason: SkipReason::RecordNotFound,
                    },
                    Err(error) => Outcome::Failed { error },
                }
            }
            PendingOperation::CreateCustomer { draft, .. } => {
                let preassigned = draft.id.clone();
                match self.register_customer(draft).await {
                    Ok(customer) => Outcome::Applied {
                        record_id: customer.id,
                    },
                    Err(Error::Store(StoreError::DuplicateKey(_))) if preassigned.is_some() => {
                        Outcome::Skipped {
                            reason: SkipReason::AlreadyApplied,
                        }
                    }
                    Err(error) => Outcome::Failed { error },
                }
            }
            PendingOperation::UpdateCustomer { id, patch, .. } => {
                match self.update_customer(&id, patch).await {
                    Ok(_) => Outcome::Applied { record_id: id },
                    Err(Error::RecordNotFound(_)) => Outcome::Skipped {
                        reason: SkipReason::RecordNotFound,
                    },
                    Err(error) => Outcome::Failed { error },
                }
            }
            PendingOperation::CreateBooking { draft, .. } => {
                match self.create_reservation(draft).await {
                    Ok(reservation) => Outcome::Applied {
                        record_id: reservation.id,
                    },
                    Err(Error::BookingConflict { conflicting_id, .. }) => Outcome::Skipped {
                        reason: SkipReason::BookingConflict { conflicting_id },
                    },
                    Err(error) => Outcome::Failed { error },
                }
            }
            PendingOperation::UpdateBooking { id, patch, .. } => {
                match self.update_reservation(&id, patch).await {
                    Ok(_) => Outcome::Applied { record_id: id },
                    Err(Error::RecordNotFound(_)) => Outcome::Skipped {
                        reason: SkipReason::RecordNotFound,
                    },
                    Err(Error::BookingConflict { conflicting_id, .. }) => Outcome::Skipped {
                        reason: SkipReason::BookingConflict { conflicting_id },
                    },
                    Err(error) => Outcome::Failed { error },
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineConfig;
    use crate::memory::MemoryStore;
    use crate::model::{CustomerDraft, VehicleDraft, VehiclePatch, VehicleStatus};
    use std::sync::Arc;

    fn engine() -> ReservationEngine {
        ReservationEngine::new(Arc::new(MemoryStore::new()), EngineConfig::default())
    }

    fn create_vehicle_op(op_id: &str, vehicle_id: &str) -> PendingOperation {
        PendingOperation::CreateVehicle {
            op_id: op_id.into(),
            draft: VehicleDraft {
                id: vehicle_id.into(),
                make: "Toyota".into(),
                model: "Corolla".into(),
                year: 2021,
                daily_rate: 3_500,
                status: VehicleStatus::Available,
            },
        }
    }

    #[tokio::test]
    async fn report_lines_follow_queue_order() {
        let engine = engine();
        let report = engine
            .reconcile(vec![
                create_vehicle_op("op-1", "KA-01-1234"),
                PendingOperation::CreateCustomer {
                    op_id: "op-2".into(),
                    draft: CustomerDraft {
                        id: None,
                        full_name: "Asha Rao".into(),
                        phone: "+91-98450-00000".into(),
                        email: None,
                        licence_no: None,
                    },
                },
            ])
            .await;

        let ids: Vec<_> = report.outcomes.iter().map(|o| o.op_id.as_str()).collect();
        assert_eq!(ids, ["op-1", "op-2"]);
        assert_eq!(report.applied_count(), 2);
        assert!(report.is_clean());
        assert!(report.unprocessed.is_empty());
    }

    #[tokio::test]
    async fn update_of_missing_vehicle_is_skipped_not_failed() {
        let engine = engine();
        let report = engine
            .reconcile(vec![PendingOperation::UpdateVehicle {
                op_id: "op-1".into(),
                id: "KA-09-0000".into(),
                patch: VehiclePatch::status(VehicleStatus::UnderMaintenance),
            }])
            .await;

        assert_eq!(
            report.outcomes[0].outcome,
            Outcome::Skipped {
                reason: SkipReason::RecordNotFound,
            }
        );
        assert!(report.is_clean());
    }

    #[tokio::test]
    async fn cancelled_pass_returns_partial_report_and_remainder() {
        let engine = engine();
        let cancel = AtomicBool::new(true);
        let report = engine
            .reconcile_with_cancel(
                vec![
                    create_vehicle_op("op-1", "KA-01-1234"),
                    create_vehicle_op("op-2", "KA-02-9999"),
                ],
                &cancel,
            )
            .await;

        assert!(report.cancelled);
        assert!(report.outcomes.is_empty());
        assert_eq!(report.unprocessed.len(), 2);
        assert_eq!(report.unprocessed[0].op_id(), "op-1");
        assert!(!report.is_clean());
    }

    #[tokio::test]
    async fn replayed_vehicle_create_is_already_applied() {
        let engine = engine();
        engine
            .reconcile(vec![create_vehicle_op("op-1", "KA-01-1234")])
            .await;
        let second = engine
            .reconcile(vec![create_vehicle_op("op-1", "KA-01-1234")])
            .await;

        assert_eq!(
            second.outcomes[0].outcome,
            Outcome::Skipped {
                reason: SkipReason::AlreadyApplied,
            }
        );
    }

    #[test]
    fn report_serializes_outcome_inline() {
        let report = ReconcileReport {
            outcomes: vec![ItemOutcome {
                op_id: "op-1".into(),
                kind: "createBooking".into(),
                outcome: Outcome::Applied {
                    record_id: "BK-20240610-001".into(),
                },
            }],
            unprocessed: Vec::new(),
            cancelled: false,
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains(r#""result":"applied""#));
        assert!(json.contains(r#""recordId":"BK-20240610-001""#));

        let parsed: ReconcileReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
    }
}
