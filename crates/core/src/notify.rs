//! Notification messages fanned out to node notification queues.
//!
//! The scheduler uses [`NOTIFY_STOP_TASK`], [`NOTIFY_DELETE_TASK`] and
//! [`NOTIFY_RESTART`]; configuration services push their own kinds
//! (dictionary, POC, port-list, rule changes) through the same channel,
//! so `kind` is an open string rather than an enum.

use serde::{Deserialize, Serialize};

/// Abort in-flight work for the task named in `content`.
pub const NOTIFY_STOP_TASK: &str = "stop_task";

/// Drop queued and cached state for the task(s) named in `content`.
pub const NOTIFY_DELETE_TASK: &str = "delete_task";

/// Restart the node process.
pub const NOTIFY_RESTART: &str = "restart";

/// A node registration was removed; `content` carries the name list.
pub const NOTIFY_NODE_DELETED: &str = "node_deleted";

/// A typed message on a node's notification queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeNotification {
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl NodeNotification {
    pub fn new(kind: impl Into<String>, content: Option<String>) -> Self {
        Self {
            kind: kind.into(),
            content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_is_omitted_when_absent() {
        let msg = NodeNotification::new(NOTIFY_RESTART, None);
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"kind":"restart"}"#);
    }

    #[test]
    fn content_roundtrips() {
        let msg = NodeNotification::new(NOTIFY_STOP_TASK, Some("42".to_string()));
        let json = serde_json::to_string(&msg).unwrap();
        let back: NodeNotification = serde_json::from_str(&json).unwrap();
        assert_eq!(back.kind, NOTIFY_STOP_TASK);
        assert_eq!(back.content.as_deref(), Some("42"));
    }
}
