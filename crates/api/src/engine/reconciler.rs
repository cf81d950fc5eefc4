//! Progress reconciliation: translate worker-reported completion
//! counters into task progress and terminal state.
//!
//! Safe to run concurrently with Stop and Delete. A concurrent Stop
//! just removes the task from the next sweep's filter; a concurrent
//! Delete removes the keys this sweep reads, and a missing key reads as
//! "no progress yet" rather than an error.

use vantage_core::progress::percent_complete;
use vantage_db::models::task::Task;
use vantage_db::repositories::TaskRepo;
use vantage_db::DbPool;
use vantage_store::SharedStore;

use crate::error::AppResult;

/// One sweep over every Running task with progress below 100.
///
/// A failure on one task is logged and skips only that task; the next
/// sweep retries it.
pub async fn reconcile_progress(pool: &DbPool, store: &SharedStore) -> AppResult<()> {
    let tasks = TaskRepo::list_running(pool).await?;
    for task in &tasks {
        if let Err(e) = reconcile_task(pool, store, task).await {
            tracing::error!(
                task_id = task.id,
                error = %e,
                "Progress reconciliation failed; task skipped until next sweep",
            );
        }
    }
    Ok(())
}

/// Reconcile one task against its completion counter.
///
/// An absent counter covers the window between dispatch and the first
/// worker write and reads as zero progress. On completion the counter
/// and end-time keys are dropped unconditionally; the task no longer
/// matches the Running filter, so a second sweep is a no-op.
async fn reconcile_task(pool: &DbPool, store: &SharedStore, task: &Task) -> AppResult<()> {
    if !store.seen_exists(task.id).await? {
        TaskRepo::set_progress(pool, task.id, 0).await?;
        return Ok(());
    }

    let seen = store.seen_count(task.id).await?;
    let percent = percent_complete(seen, task.target_count.max(0) as u64);

    if percent == 100 {
        let ended_at = store.finished_at(task.id).await?.unwrap_or_default();
        TaskRepo::complete(pool, task.id, &ended_at).await?;
        store.clear_completion(task.id).await?;
        tracing::info!(task_id = task.id, ended_at = %ended_at, "Task completed");
    } else {
        TaskRepo::set_progress(pool, task.id, percent).await?;
    }
    Ok(())
}
