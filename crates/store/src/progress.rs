//! Ephemeral per-task progress keys.
//!
//! The seen-set, end-time scalar, and phase hashes are written by
//! workers; this side only reads them and clears them on fresh dispatch,
//! completion, and delete.

use std::collections::HashMap;

use redis::AsyncCommands;
use vantage_core::types::DbId;

use crate::{keys, SharedStore, StoreResult};

impl SharedStore {
    /// Whether any worker has reported a completion for this task yet.
    pub async fn seen_exists(&self, task_id: DbId) -> StoreResult<bool> {
        let mut conn = self.conn();
        let exists: bool = conn.exists(keys::task_seen(task_id)).await?;
        Ok(exists)
    }

    /// Cardinality of the task's seen-targets set.
    pub async fn seen_count(&self, task_id: DbId) -> StoreResult<u64> {
        let mut conn = self.conn();
        let count: u64 = conn.scard(keys::task_seen(task_id)).await?;
        Ok(count)
    }

    /// The worker-reported end time, if one has been written.
    pub async fn finished_at(&self, task_id: DbId) -> StoreResult<Option<String>> {
        let mut conn = self.conn();
        let value: Option<String> = conn.get(keys::task_finished(task_id)).await?;
        Ok(value)
    }

    /// Per-phase timing fields for one target (empty map if the worker
    /// has not started it).
    pub async fn phase_detail(
        &self,
        task_id: DbId,
        target: &str,
    ) -> StoreResult<HashMap<String, String>> {
        let mut conn = self.conn();
        let fields: HashMap<String, String> = conn.hgetall(keys::task_phase(task_id, target)).await?;
        Ok(fields)
    }

    /// Replace the task's shared target list.
    pub async fn push_targets(&self, task_id: DbId, targets: &[String]) -> StoreResult<()> {
        let key = keys::task_targets(task_id);
        let mut conn = self.conn();
        let _: () = conn.del(&key).await?;
        if !targets.is_empty() {
            let _: () = conn.rpush(&key, targets).await?;
        }
        Ok(())
    }

    /// Drop every ephemeral key belonging to a task: target list,
    /// seen-set, end time, phase hashes, and duplicate caches.
    pub async fn clear_task(&self, task_id: DbId) -> StoreResult<()> {
        let mut conn = self.conn();
        let _: () = conn
            .del(vec![
                keys::task_targets(task_id),
                keys::task_seen(task_id),
                keys::task_finished(task_id),
            ])
            .await?;
        self.delete_pattern(&keys::task_phase_pattern(task_id)).await?;
        self.delete_pattern(&keys::task_dedup_pattern(task_id)).await?;
        Ok(())
    }

    /// Drop the completion bookkeeping once a task has been reconciled to
    /// Completed. A repeat call is a no-op.
    pub async fn clear_completion(&self, task_id: DbId) -> StoreResult<()> {
        let mut conn = self.conn();
        let _: () = conn
            .del(vec![keys::task_seen(task_id), keys::task_finished(task_id)])
            .await?;
        Ok(())
    }
}
