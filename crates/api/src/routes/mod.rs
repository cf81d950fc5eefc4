pub mod health;
pub mod nodes;
pub mod notify;
pub mod tasks;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /tasks                       list (GET), create (POST)
/// /tasks/{id}                  detail
/// /tasks/{id}/progress         per-target phase timings
/// /tasks/{id}/retest           restart from scratch (POST)
/// /tasks/stop                  bulk stop (POST)
/// /tasks/start                 bulk resume (POST)
/// /tasks/delete                bulk delete (POST)
///
/// /nodes                       registry listing (GET)
/// /nodes/delete                bulk removal (POST)
/// /nodes/{name}/restart        restart request (POST)
/// /nodes/{name}/sync           re-push outstanding work (POST)
/// /nodes/{name}/logs           shipped log lines (GET)
///
/// /notify                      notification fan-out (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/tasks", tasks::router())
        .nest("/nodes", nodes::router())
        .merge(notify::router())
}
