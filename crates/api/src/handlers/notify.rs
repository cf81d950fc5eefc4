//! Handler for the notification fan-out endpoint.
//!
//! Configuration services (dictionary, POC, port-list, rule changes) use
//! this path to push typed messages to one node or to all of them.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use vantage_core::error::CoreError;
use vantage_core::notify::NodeNotification;

use crate::engine::notify;
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /api/v1/notify`.
#[derive(Debug, Deserialize)]
pub struct BroadcastRequest {
    /// A node name, or `"all"` for every registered node.
    pub node: String,
    pub kind: String,
    #[serde(default)]
    pub content: Option<String>,
}

/// Push a typed notification to one node or to all registered nodes.
/// Returns how many queues accepted the message.
pub async fn broadcast_notification(
    State(state): State<AppState>,
    Json(input): Json<BroadcastRequest>,
) -> AppResult<impl IntoResponse> {
    if input.kind.trim().is_empty() {
        return Err(CoreError::Validation("kind must not be empty".to_string()).into());
    }
    if input.node.trim().is_empty() {
        return Err(CoreError::Validation("node must not be empty".to_string()).into());
    }

    let message = NodeNotification::new(input.kind, input.content);
    let delivered = notify::broadcast(&state.store, &input.node, &message).await?;

    tracing::info!(
        target_node = %input.node,
        kind = %message.kind,
        delivered,
        "Notification broadcast",
    );

    Ok(Json(DataResponse { data: delivered }))
}
