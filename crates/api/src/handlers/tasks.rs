//! Handlers for the `/tasks` resource: the task lifecycle state machine
//! and the progress views.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use vantage_core::error::CoreError;
use vantage_core::notify::{NodeNotification, NOTIFY_DELETE_TASK, NOTIFY_STOP_TASK};
use vantage_core::phase::ScanPhase;
use vantage_core::status::TaskStatus;
use vantage_core::targets;
use vantage_core::types::DbId;
use vantage_core::validate::validate_task_name;
use vantage_db::models::task::{CreateTask, Task, TaskListQuery};
use vantage_db::repositories::{AssetRepo, ScheduledTaskRepo, TaskRepo, TemplateRepo};

use crate::engine::{dispatcher, notify, reconciler, resolver};
use crate::error::{AppError, AppResult};
use crate::query::PaginationParams;
use crate::response::{DataResponse, Page};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Request body for the bulk stop/start endpoints.
#[derive(Debug, Deserialize)]
pub struct TaskIds {
    pub ids: Vec<DbId>,
}

/// Request body for the bulk delete endpoint.
#[derive(Debug, Deserialize)]
pub struct DeleteTasksRequest {
    pub ids: Vec<DbId>,
    /// Also purge asset rows produced by these tasks.
    #[serde(default)]
    pub delete_assets: bool,
}

/// A worker-reported start/end timestamp pair.
#[derive(Debug, Serialize)]
pub struct PhaseWindow {
    pub start: String,
    pub end: String,
}

/// One row of the per-target progress detail view.
#[derive(Debug, Serialize)]
pub struct TargetProgress {
    pub id: String,
    pub target: String,
    pub node: String,
    pub phases: IndexMap<&'static str, PhaseWindow>,
    pub overall: PhaseWindow,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fetch a task by id, mapping absence to a 404.
async fn ensure_task_exists(pool: &sqlx::PgPool, id: DbId) -> AppResult<Task> {
    TaskRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Task", id }))
}

// ---------------------------------------------------------------------------
// POST /api/v1/tasks
// ---------------------------------------------------------------------------

/// Create a task: resolve its target set, persist it as Running, and
/// kick off dispatch detached from this request.
///
/// An empty resolved target set, a duplicate name, an empty node
/// assignment, or a missing template fails creation; nothing is
/// persisted in that case.
pub async fn create_task(
    State(state): State<AppState>,
    Json(input): Json<CreateTask>,
) -> AppResult<impl IntoResponse> {
    validate_task_name(&input.name)?;
    if input.node_names.is_empty() && !input.all_nodes {
        return Err(
            CoreError::Validation("Task must be assigned at least one node".to_string()).into(),
        );
    }
    if TaskRepo::name_exists(&state.pool, &input.name).await? {
        return Err(CoreError::Conflict(format!(
            "Task name \"{}\" already exists",
            input.name
        ))
        .into());
    }
    TemplateRepo::find_by_id(&state.pool, input.template_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "ScanTemplate",
            id: input.template_id,
        })?;

    let (raw_target, resolved) = resolver::resolve_for_create(&state.pool, &input).await?;
    let task = TaskRepo::create(&state.pool, &input, &raw_target, resolved.len() as i32).await?;

    tracing::info!(
        task_id = task.id,
        task_name = %task.name,
        targets = resolved.len(),
        "Task created",
    );

    dispatcher::dispatch_detached(
        state.pool.clone(),
        state.store.clone(),
        Arc::clone(&state.config),
        task.clone(),
        false,
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: task })))
}

// ---------------------------------------------------------------------------
// GET /api/v1/tasks
// ---------------------------------------------------------------------------

/// Paginated task listing, newest first, with optional fuzzy name filter.
///
/// Each listing kicks off a detached reconciliation sweep so a polling
/// client sees progress at most one request stale, independent of the
/// periodic sweep interval.
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(params): Query<TaskListQuery>,
) -> AppResult<impl IntoResponse> {
    {
        let pool = state.pool.clone();
        let store = state.store.clone();
        tokio::spawn(async move {
            if let Err(e) = reconciler::reconcile_progress(&pool, &store).await {
                tracing::error!(error = %e, "On-demand progress sweep failed");
            }
        });
    }

    let tasks = TaskRepo::list(&state.pool, &params).await?;
    let total = TaskRepo::count(&state.pool, params.search.as_deref()).await?;
    Ok(Json(DataResponse {
        data: Page { list: tasks, total },
    }))
}

// ---------------------------------------------------------------------------
// GET /api/v1/tasks/{id}
// ---------------------------------------------------------------------------

/// Get a single task by id.
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let task = ensure_task_exists(&state.pool, id).await?;
    Ok(Json(DataResponse { data: task }))
}

// ---------------------------------------------------------------------------
// POST /api/v1/tasks/{id}/retest
// ---------------------------------------------------------------------------

/// Restart a task from scratch without altering its configuration:
/// progress, end time, and status reset, caches cleared, targets
/// re-pushed.
pub async fn retest_task(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let task = ensure_task_exists(&state.pool, id).await?;
    TaskRepo::reset_for_dispatch(&state.pool, id).await?;

    tracing::info!(task_id = id, "Task retest requested");

    dispatcher::dispatch_detached(
        state.pool.clone(),
        state.store.clone(),
        Arc::clone(&state.config),
        task,
        false,
    );

    let task = ensure_task_exists(&state.pool, id).await?;
    Ok(Json(DataResponse { data: task }))
}

// ---------------------------------------------------------------------------
// POST /api/v1/tasks/stop
// ---------------------------------------------------------------------------

/// Stop tasks: notify every node to abort in-flight work, then flip
/// status to Stopped. Idempotent; progress is untouched.
pub async fn stop_tasks(
    State(state): State<AppState>,
    Json(input): Json<TaskIds>,
) -> AppResult<impl IntoResponse> {
    for id in &input.ids {
        let message = NodeNotification::new(NOTIFY_STOP_TASK, Some(id.to_string()));
        notify::broadcast(&state.store, notify::BROADCAST_ALL, &message).await?;
        TaskRepo::set_status(&state.pool, *id, TaskStatus::Stopped.id()).await?;
        tracing::info!(task_id = *id, "Task stopped");
    }
    Ok(Json(DataResponse {
        data: input.ids.len(),
    }))
}

// ---------------------------------------------------------------------------
// POST /api/v1/tasks/start
// ---------------------------------------------------------------------------

/// Resume stopped tasks. Tasks already at 100% are skipped entirely: no
/// status change, no dispatch. Resumed dispatch keeps the seen-set, so
/// completed targets are not redone.
pub async fn start_tasks(
    State(state): State<AppState>,
    Json(input): Json<TaskIds>,
) -> AppResult<impl IntoResponse> {
    let tasks = TaskRepo::find_by_ids(&state.pool, &input.ids).await?;
    let mut started = 0usize;
    for task in tasks {
        if task.progress == 100 {
            continue;
        }
        TaskRepo::set_status(&state.pool, task.id, TaskStatus::Running.id()).await?;
        tracing::info!(task_id = task.id, "Task resumed");
        dispatcher::dispatch_detached(
            state.pool.clone(),
            state.store.clone(),
            Arc::clone(&state.config),
            task,
            true,
        );
        started += 1;
    }
    Ok(Json(DataResponse { data: started }))
}

// ---------------------------------------------------------------------------
// POST /api/v1/tasks/delete
// ---------------------------------------------------------------------------

/// Delete tasks: best-effort removal of scheduled entries and ephemeral
/// keys, a delete notification to every node, then the task rows. With
/// `delete_assets`, asset rows keyed by the task names are purged in a
/// detached best-effort cascade.
pub async fn delete_tasks(
    State(state): State<AppState>,
    Json(input): Json<DeleteTasksRequest>,
) -> AppResult<impl IntoResponse> {
    if input.ids.is_empty() {
        return Err(CoreError::Validation("ids must not be empty".to_string()).into());
    }

    if let Err(e) = ScheduledTaskRepo::delete_by_task_ids(&state.pool, &input.ids).await {
        tracing::warn!(error = %e, "Scheduled entry cleanup failed");
    }

    // Names must be resolved before the rows go away; the asset cascade
    // is keyed by task name.
    let names = TaskRepo::names_for_ids(&state.pool, &input.ids).await?;

    for id in &input.ids {
        if let Err(e) = state.store.clear_task(*id).await {
            tracing::error!(task_id = *id, error = %e, "Ephemeral key cleanup failed");
        }
    }

    let id_list = input
        .ids
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",");
    let message = NodeNotification::new(NOTIFY_DELETE_TASK, Some(id_list));
    if let Err(e) = notify::broadcast(&state.store, notify::BROADCAST_ALL, &message).await {
        tracing::error!(error = %e, "Delete notification broadcast failed");
    }

    let deleted = TaskRepo::delete_by_ids(&state.pool, &input.ids).await?;
    if deleted == 0 {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Task",
            id: input.ids[0],
        }));
    }

    tracing::info!(deleted, cascade = input.delete_assets, "Tasks deleted");

    if input.delete_assets && !names.is_empty() {
        let pool = state.pool.clone();
        tokio::spawn(async move {
            AssetRepo::purge_by_task_names(&pool, &names).await;
        });
    }

    Ok(Json(DataResponse { data: deleted }))
}

// ---------------------------------------------------------------------------
// GET /api/v1/tasks/{id}/progress
// ---------------------------------------------------------------------------

/// Per-target phase timing detail, paginated over the resolved target
/// list. Targets no worker has started yet render with empty windows.
pub async fn task_progress(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(page): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let task = ensure_task_exists(&state.pool, id).await?;
    let all_targets = targets::resolve_targets(&task.target, &task.ignore);

    let mut rows = Vec::new();
    for target in all_targets.iter().skip(page.offset()).take(page.limit()) {
        let fields = state.store.phase_detail(task.id, target).await?;
        rows.push(target_progress_row(target, &fields));
    }

    Ok(Json(DataResponse {
        data: Page {
            list: rows,
            total: i64::from(task.target_count),
        },
    }))
}

/// Assemble one detail row from a target's phase hash.
fn target_progress_row(target: &str, fields: &HashMap<String, String>) -> TargetProgress {
    let field = |name: &str| fields.get(name).cloned().unwrap_or_default();

    let mut phases = IndexMap::new();
    for phase in ScanPhase::ALL {
        let name = phase.as_str();
        phases.insert(
            name,
            PhaseWindow {
                start: field(&format!("{name}_start")),
                end: field(&format!("{name}_end")),
            },
        );
    }

    TargetProgress {
        id: uuid::Uuid::new_v4().to_string(),
        target: target.to_string(),
        node: field("node"),
        phases,
        overall: PhaseWindow {
            start: field("scan_start"),
            end: field("scan_end"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn progress_row_reads_phase_windows() {
        let fields = hash(&[
            ("node", "scanner-eu-01"),
            ("PortScan_start", "2026-08-06T10:00:00Z"),
            ("PortScan_end", "2026-08-06T10:02:10Z"),
            ("scan_start", "2026-08-06T09:59:00Z"),
        ]);
        let row = target_progress_row("example.com", &fields);

        assert_eq!(row.target, "example.com");
        assert_eq!(row.node, "scanner-eu-01");
        assert_eq!(row.phases["PortScan"].start, "2026-08-06T10:00:00Z");
        assert_eq!(row.phases["PortScan"].end, "2026-08-06T10:02:10Z");
        assert_eq!(row.phases["DirScan"].start, "");
        assert_eq!(row.overall.start, "2026-08-06T09:59:00Z");
        assert_eq!(row.overall.end, "");
        assert_eq!(row.phases.len(), ScanPhase::ALL.len());
    }

    #[test]
    fn progress_row_for_unstarted_target_is_empty() {
        let row = target_progress_row("example.com", &HashMap::new());
        assert!(row.node.is_empty());
        assert!(row.phases.values().all(|w| w.start.is_empty() && w.end.is_empty()));
    }
}
