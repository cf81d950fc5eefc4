//! Route definitions for the `/nodes` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::nodes;
use crate::state::AppState;

/// Routes mounted at `/nodes`.
///
/// ```text
/// GET    /                 -> list_nodes
/// POST   /delete           -> delete_nodes
/// POST   /{name}/restart   -> restart_node
/// POST   /{name}/sync      -> sync_node
/// GET    /{name}/logs      -> node_logs
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(nodes::list_nodes))
        .route("/delete", post(nodes::delete_nodes))
        .route("/{name}/restart", post(nodes::restart_node))
        .route("/{name}/sync", post(nodes::sync_node))
        .route("/{name}/logs", get(nodes::node_logs))
}
