//! Key naming for the shared store.
//!
//! Workers read and write the same keys, so these formats are wire
//! contract. `node:*` enumerates the registry; queue, notification, and
//! log keys deliberately use distinct prefixes so the enumeration never
//! picks them up.

use vantage_core::types::DbId;

/// LIST of resolved targets workers pull from (written once per
/// dispatch batch).
pub fn task_targets(task_id: DbId) -> String {
    format!("task:{task_id}:targets")
}

/// SET of targets workers have finished; its cardinality drives the
/// task's progress percentage.
pub fn task_seen(task_id: DbId) -> String {
    format!("task:{task_id}:seen")
}

/// STRING holding the worker-reported end time of the run.
pub fn task_finished(task_id: DbId) -> String {
    format!("task:{task_id}:finished")
}

/// HASH of per-phase start/end timestamps for one target.
pub fn task_phase(task_id: DbId, target: &str) -> String {
    format!("task:{task_id}:phase:{target}")
}

/// Pattern matching every per-target phase hash of a task.
pub fn task_phase_pattern(task_id: DbId) -> String {
    format!("task:{task_id}:phase:*")
}

/// Pattern matching a task's worker-maintained duplicate caches.
pub fn task_dedup_pattern(task_id: DbId) -> String {
    format!("task:{task_id}:dedup:*")
}

/// HASH describing a registered node (state, heartbeat, info fields).
pub fn node(name: &str) -> String {
    format!("node:{name}")
}

/// Pattern enumerating the node registry.
pub const NODE_PATTERN: &str = "node:*";

/// Extract the node name from a registry key.
pub fn node_name_from_key(key: &str) -> Option<&str> {
    key.strip_prefix("node:")
}

/// LIST serving as a node's durable work queue.
pub fn work_queue(node_name: &str) -> String {
    format!("queue:{node_name}")
}

/// LIST serving as a node's notification queue.
pub fn notify_queue(node_name: &str) -> String {
    format!("notify:{node_name}")
}

/// LIST of log lines a node has shipped.
pub fn node_log(node_name: &str) -> String {
    format!("log:{node_name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_keys_embed_the_id() {
        assert_eq!(task_targets(7), "task:7:targets");
        assert_eq!(task_seen(7), "task:7:seen");
        assert_eq!(task_finished(7), "task:7:finished");
        assert_eq!(task_phase(7, "a.example.com"), "task:7:phase:a.example.com");
    }

    #[test]
    fn node_key_roundtrips() {
        let key = node("scanner-eu-01");
        assert_eq!(node_name_from_key(&key), Some("scanner-eu-01"));
        assert_eq!(node_name_from_key("queue:scanner-eu-01"), None);
    }

    #[test]
    fn queue_prefixes_stay_out_of_node_enumeration() {
        assert!(!work_queue("a").starts_with("node:"));
        assert!(!notify_queue("a").starts_with("node:"));
        assert!(!node_log("a").starts_with("node:"));
    }
}
