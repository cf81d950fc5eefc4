//! Periodic progress reconciliation sweep.
//!
//! Runs [`reconcile_progress`](crate::engine::reconciler::reconcile_progress)
//! on a fixed interval until cancelled. Overlapping sweeps are tolerated
//! because each task update is an idempotent read-then-set, but the loop
//! itself is single-flight: a tick only fires after the previous sweep
//! returned.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use vantage_db::DbPool;
use vantage_store::SharedStore;

use crate::engine::reconciler;

/// Run the progress sweep loop until `cancel` is triggered.
pub async fn run(pool: DbPool, store: SharedStore, interval_secs: u64, cancel: CancellationToken) {
    tracing::info!(interval_secs, "Progress sweep started");

    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Progress sweep stopping");
                break;
            }
            _ = interval.tick() => {
                if let Err(e) = reconciler::reconcile_progress(&pool, &store).await {
                    tracing::error!(error = %e, "Progress sweep failed");
                }
            }
        }
    }
}
