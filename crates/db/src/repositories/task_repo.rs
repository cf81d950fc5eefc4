//! Repository for the `tasks` table.

use sqlx::PgPool;
use vantage_core::status::{StatusId, TaskStatus};
use vantage_core::types::DbId;

use crate::models::task::{CreateTask, Task, TaskListQuery};

/// Column list for `tasks` queries.
const COLUMNS: &str = "\
    id, name, source_kind_id, target, ignore, search, source_ids, project_id, \
    target_count, node_names, all_nodes, template_id, dedup, status_id, \
    progress, created_at, ended_at";

/// Default page size for task listings.
const DEFAULT_LIMIT: i64 = 50;

/// Hard cap on task listing page size.
const MAX_LIMIT: i64 = 100;

fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// Provides CRUD operations for tasks.
pub struct TaskRepo;

impl TaskRepo {
    // ── Creation ─────────────────────────────────────────────────────────

    /// Insert a task with its resolved target text and count.
    ///
    /// The caller resolves targets first; a task row always satisfies
    /// `target_count > 0`. New tasks start Running with zero progress and
    /// an empty end time.
    pub async fn create(
        pool: &PgPool,
        input: &CreateTask,
        target: &str,
        target_count: i32,
    ) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks (name, source_kind_id, target, ignore, search, source_ids, \
                project_id, target_count, node_names, all_nodes, template_id, dedup, \
                status_id, progress, ended_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, 0, '')
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(&input.name)
            .bind(input.source_kind)
            .bind(target)
            .bind(&input.ignore)
            .bind(&input.search)
            .bind(&input.source_ids)
            .bind(input.project_id)
            .bind(target_count)
            .bind(&input.node_names)
            .bind(input.all_nodes)
            .bind(input.template_id)
            .bind(input.dedup)
            .bind(TaskStatus::Running.id())
            .fetch_one(pool)
            .await
    }

    /// Whether a task with this display name already exists.
    pub async fn name_exists(pool: &PgPool, name: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM tasks WHERE name = $1)")
            .bind(name)
            .fetch_one(pool)
            .await
    }

    // ── Queries ──────────────────────────────────────────────────────────

    /// Find a task by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find every task in `ids` (missing ids are silently absent).
    pub async fn find_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = ANY($1)");
        sqlx::query_as::<_, Task>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Paginated listing, newest first, with optional fuzzy name filter.
    pub async fn list(pool: &PgPool, params: &TaskListQuery) -> Result<Vec<Task>, sqlx::Error> {
        let pattern = like_pattern(params.search.as_deref());
        let query = format!(
            "SELECT {COLUMNS} FROM tasks \
             WHERE name ILIKE $1 \
             ORDER BY created_at DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(pattern)
            .bind(clamp_limit(params.limit))
            .bind(clamp_offset(params.offset))
            .fetch_all(pool)
            .await
    }

    /// Total task count for the same filter as [`TaskRepo::list`].
    pub async fn count(pool: &PgPool, search: Option<&str>) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tasks WHERE name ILIKE $1")
            .bind(like_pattern(search))
            .fetch_one(pool)
            .await
    }

    /// Tasks the progress sweep must inspect: Running and not yet at 100.
    pub async fn list_running(pool: &PgPool) -> Result<Vec<Task>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM tasks WHERE status_id = $1 AND progress <> 100");
        sqlx::query_as::<_, Task>(&query)
            .bind(TaskStatus::Running.id())
            .fetch_all(pool)
            .await
    }

    /// Unfinished Running tasks assigned to `node_name`, either explicitly
    /// or via the all-nodes flag. Used to re-push work when a node
    /// (re)registers.
    pub async fn list_running_for_node(
        pool: &PgPool,
        node_name: &str,
    ) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks \
             WHERE status_id = $1 AND progress <> 100 \
               AND ($2 = ANY(node_names) OR all_nodes)"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(TaskStatus::Running.id())
            .bind(node_name)
            .fetch_all(pool)
            .await
    }

    /// Resolve the display names for a set of task ids.
    pub async fn names_for_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT name FROM tasks WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    // ── Mutations ────────────────────────────────────────────────────────

    /// Set the status code for a task. Single atomic field update.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status_id: StatusId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE tasks SET status_id = $2 WHERE id = $1")
            .bind(id)
            .bind(status_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Persist an intermediate progress percentage.
    pub async fn set_progress(pool: &PgPool, id: DbId, progress: i16) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE tasks SET progress = $2 WHERE id = $1")
            .bind(id)
            .bind(progress)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Mark a task Completed with the worker-reported end time.
    pub async fn complete(pool: &PgPool, id: DbId, ended_at: &str) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE tasks SET status_id = $2, progress = 100, ended_at = $3 WHERE id = $1")
            .bind(id)
            .bind(TaskStatus::Completed.id())
            .bind(ended_at)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Reset progress, end time, and status for a fresh dispatch (retest).
    pub async fn reset_for_dispatch(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE tasks SET status_id = $2, progress = 0, ended_at = '' WHERE id = $1")
            .bind(id)
            .bind(TaskStatus::Running.id())
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Remove tasks by id. Returns the number of rows deleted.
    pub async fn delete_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ANY($1)")
            .bind(ids)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

fn like_pattern(search: Option<&str>) -> String {
    match search {
        Some(s) if !s.is_empty() => format!("%{s}%"),
        _ => "%".to_string(),
    }
}
