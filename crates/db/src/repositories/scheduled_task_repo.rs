//! Repository for the `scheduled_tasks` table.
//!
//! The orchestration core only removes entries when their task is
//! deleted; creating and firing schedules belongs to the scheduler
//! service.

use sqlx::PgPool;
use vantage_core::types::DbId;

/// Access to scheduled-job entries associated with tasks.
pub struct ScheduledTaskRepo;

impl ScheduledTaskRepo {
    /// Remove the scheduled entries for the given tasks, if any.
    pub async fn delete_by_task_ids(pool: &PgPool, task_ids: &[DbId]) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM scheduled_tasks WHERE task_id = ANY($1)")
            .bind(task_ids)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
