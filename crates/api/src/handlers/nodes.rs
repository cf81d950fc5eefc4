//! Handlers for the node registry: listing with read-time liveness
//! correction, removal, restart, log retrieval, and work re-sync.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use vantage_core::notify::{NodeNotification, NOTIFY_NODE_DELETED, NOTIFY_RESTART};
use vantage_core::status::{NodeState, StatusId};
use vantage_core::validate::validate_node_name;

use crate::engine::{dispatcher, notify};
use crate::error::AppResult;
use crate::query::NodeListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for the bulk node delete endpoint.
#[derive(Debug, Deserialize)]
pub struct NodeNames {
    pub names: Vec<String>,
}

/// A registry entry as returned to clients.
#[derive(Debug, Serialize)]
pub struct NodeView {
    pub name: String,
    pub state: StatusId,
    pub updated_at: String,
    /// Informational fields the node reported (version, cpu, memory, ...).
    pub info: HashMap<String, String>,
}

// ---------------------------------------------------------------------------
// GET /api/v1/nodes
// ---------------------------------------------------------------------------

/// List registered nodes, sorted by name.
///
/// A node whose persisted state says Online but whose heartbeat is older
/// than the liveness timeout is reported Offline immediately; the
/// persisted correction happens on a detached task and may race, which
/// is fine — the next read corrects again.
pub async fn list_nodes(
    State(state): State<AppState>,
    Query(params): Query<NodeListParams>,
) -> AppResult<impl IntoResponse> {
    let records = state.store.list_nodes().await?;
    let now = Utc::now();

    let mut views = Vec::with_capacity(records.len());
    for record in records {
        let mut node_state = record.state;
        if node_state == NodeState::Online {
            let stale = record
                .heartbeat_age_secs(now)
                .is_some_and(|age| age > state.config.node_timeout_secs);
            if stale {
                let store = state.store.clone();
                let name = record.name.clone();
                tokio::spawn(async move {
                    if let Err(e) = store.mark_node_offline(&name).await {
                        tracing::error!(node = %name, error = %e, "Failed to persist offline state");
                    }
                });
                node_state = NodeState::Offline;
            }
        }
        if params.online_only && node_state != NodeState::Online {
            continue;
        }
        views.push(NodeView {
            name: record.name,
            state: node_state.id(),
            updated_at: record.updated_at,
            info: record.info,
        });
    }

    Ok(Json(DataResponse { data: views }))
}

// ---------------------------------------------------------------------------
// POST /api/v1/nodes/delete
// ---------------------------------------------------------------------------

/// Remove node registrations and fan the removal out so other
/// subsystems can react.
pub async fn delete_nodes(
    State(state): State<AppState>,
    Json(input): Json<NodeNames>,
) -> AppResult<impl IntoResponse> {
    for name in &input.names {
        validate_node_name(name)?;
    }
    for name in &input.names {
        state.store.delete_node(name).await?;
        tracing::info!(node = %name, "Node deleted");
    }

    let message = NodeNotification::new(NOTIFY_NODE_DELETED, Some(input.names.join(",")));
    if let Err(e) = notify::broadcast(&state.store, notify::BROADCAST_ALL, &message).await {
        tracing::error!(error = %e, "Node-deleted broadcast failed");
    }

    Ok(Json(DataResponse {
        data: input.names.len(),
    }))
}

// ---------------------------------------------------------------------------
// POST /api/v1/nodes/{name}/restart
// ---------------------------------------------------------------------------

/// Ask a node to restart itself. A fan-out message, not a state
/// mutation; the node flips its own registry state as it goes down and
/// comes back.
pub async fn restart_node(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<impl IntoResponse> {
    validate_node_name(&name)?;
    let message = NodeNotification::new(NOTIFY_RESTART, None);
    notify::broadcast(&state.store, &name, &message).await?;
    tracing::info!(node = %name, "Node restart requested");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// POST /api/v1/nodes/{name}/sync
// ---------------------------------------------------------------------------

/// Re-push every unfinished Running task assigned to this node onto its
/// queue. Called when a node (re)registers so it picks up work that was
/// dispatched while it was away.
pub async fn sync_node(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<impl IntoResponse> {
    validate_node_name(&name)?;
    let pushed = dispatcher::sync_node(&state.pool, &state.store, &name).await?;
    tracing::info!(node = %name, pushed, "Node work re-sync finished");
    Ok(Json(DataResponse { data: pushed }))
}

// ---------------------------------------------------------------------------
// GET /api/v1/nodes/{name}/logs
// ---------------------------------------------------------------------------

/// The log lines a node has shipped, oldest first.
pub async fn node_logs(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<impl IntoResponse> {
    validate_node_name(&name)?;
    let lines = state.store.node_logs(&name).await?;
    Ok(Json(DataResponse { data: lines }))
}
