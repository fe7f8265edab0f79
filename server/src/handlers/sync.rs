//! Sync handler - replays a client's offline operation queue.

use motorpool_engine::{ItemOutcome, PendingOperation, ReservationEngine};
use serde::{Deserialize, Serialize};

/// Request body for sync.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    /// Client device identifier, for log correlation only.
    #[serde(default)]
    pub client_id: Option<String>,
    /// Queued mutations in the order the client recorded them.
    pub operations: Vec<PendingOperation>,
}

/// Response for sync: the per-item reconciliation report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    pub applied: usize,
    pub skipped: usize,
    pub failed: usize,
    /// One entry per submitted operation, in queue order.
    pub outcomes: Vec<ItemOutcome>,
}

/// Replay the queue through the reconciliation engine.
///
/// Reconciliation is total: every submitted operation gets an outcome
/// and a single item's failure never aborts the rest, so this handler
/// itself is infallible.
pub async fn handle_sync(engine: &ReservationEngine, request: SyncRequest) -> SyncResponse {
    let client = request.client_id.as_deref().unwrap_or("unknown");
    tracing::info!(
        client,
        operations = request.operations.len(),
        "reconciling offline queue"
    );

    let report = engine.reconcile(request.operations).await;

    let response = SyncResponse {
        applied: report.applied_count(),
        skipped: report.skipped_count(),
        failed: report.failed_count(),
        outcomes: report.outcomes,
    };
    tracing::info!(
        client,
        applied = response.applied,
        skipped = response.skipped,
        failed = response.failed,
        "reconciliation finished"
    );
    response
}
