//! Task entity models and DTOs for the orchestration core.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vantage_core::status::StatusId;
use vantage_core::types::{DbId, Timestamp};

/// A row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub name: String,
    /// Declared target source kind (see `vantage_core::status::TargetSource`).
    pub source_kind_id: StatusId,
    /// Raw newline-delimited target text.
    pub target: String,
    /// Newline-delimited exclusion patterns.
    pub ignore: String,
    /// Saved-search filter, used only by prior-result-set source kinds.
    pub search: String,
    /// Selected result ids, used only by prior-result-set source kinds.
    pub source_ids: Vec<DbId>,
    pub project_id: Option<DbId>,
    /// Resolved target count; always > 0 for a persisted task.
    pub target_count: i32,
    pub node_names: Vec<String>,
    pub all_nodes: bool,
    pub template_id: DbId,
    pub dedup: bool,
    pub status_id: StatusId,
    /// Integral percent complete, 0-100.
    pub progress: i16,
    pub created_at: Timestamp,
    /// Worker-reported completion time, empty until the task finishes.
    pub ended_at: String,
}

/// DTO for submitting a new task via `POST /api/v1/tasks`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    pub name: String,
    #[serde(default = "default_source_kind")]
    pub source_kind: StatusId,
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub ignore: String,
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub source_ids: Vec<DbId>,
    #[serde(default)]
    pub project_id: Option<DbId>,
    #[serde(default)]
    pub node_names: Vec<String>,
    #[serde(default)]
    pub all_nodes: bool,
    pub template_id: DbId,
    #[serde(default)]
    pub dedup: bool,
}

fn default_source_kind() -> StatusId {
    1
}

/// Query parameters for `GET /api/v1/tasks`.
#[derive(Debug, Deserialize)]
pub struct TaskListQuery {
    /// Fuzzy name filter.
    pub search: Option<String>,
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}
