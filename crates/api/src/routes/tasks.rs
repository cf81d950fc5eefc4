//! Route definitions for the `/tasks` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::tasks;
use crate::state::AppState;

/// Routes mounted at `/tasks`.
///
/// ```text
/// GET    /                 -> list_tasks
/// POST   /                 -> create_task
/// GET    /{id}             -> get_task
/// GET    /{id}/progress    -> task_progress
/// POST   /{id}/retest      -> retest_task
/// POST   /stop             -> stop_tasks
/// POST   /start            -> start_tasks
/// POST   /delete           -> delete_tasks
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tasks::list_tasks).post(tasks::create_task))
        .route("/{id}", get(tasks::get_task))
        .route("/{id}/progress", get(tasks::task_progress))
        .route("/{id}/retest", post(tasks::retest_task))
        .route("/stop", post(tasks::stop_tasks))
        .route("/start", post(tasks::start_tasks))
        .route("/delete", post(tasks::delete_tasks))
}
