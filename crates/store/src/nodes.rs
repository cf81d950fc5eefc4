//! The node registry: hashes workers keep alive with heartbeats.
//!
//! Nodes write their own `node:{name}` hash (state, heartbeat timestamp,
//! informational fields); this side enumerates them, corrects stale
//! Online states, and removes registrations on operator request.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use vantage_core::status::NodeState;

use crate::{keys, SharedStore, StoreResult};

/// A registered node as read from its registry hash.
#[derive(Debug, Clone)]
pub struct NodeRecord {
    pub name: String,
    pub state: NodeState,
    /// RFC 3339 heartbeat timestamp as written by the node.
    pub updated_at: String,
    /// Remaining informational fields (version, cpu, memory, ...) passed
    /// through untouched.
    pub info: HashMap<String, String>,
}

impl NodeRecord {
    /// Build a record from a registry hash. A missing or unparseable
    /// state field reads as Unregistered.
    pub fn from_hash(name: String, mut fields: HashMap<String, String>) -> Self {
        let state = fields
            .remove("state")
            .and_then(|s| NodeState::from_field(&s))
            .unwrap_or(NodeState::Unregistered);
        let updated_at = fields.remove("updated_at").unwrap_or_default();
        Self {
            name,
            state,
            updated_at,
            info: fields,
        }
    }

    /// Seconds elapsed since the node's last heartbeat, or `None` when
    /// the timestamp is absent or unparseable.
    pub fn heartbeat_age_secs(&self, now: DateTime<Utc>) -> Option<i64> {
        let ts = DateTime::parse_from_rfc3339(&self.updated_at).ok()?;
        Some((now - ts.with_timezone(&Utc)).num_seconds())
    }
}

impl SharedStore {
    /// Every registered node, sorted by name.
    pub async fn list_nodes(&self) -> StoreResult<Vec<NodeRecord>> {
        let mut conn = self.conn();
        let node_keys: Vec<String> = conn.keys(keys::NODE_PATTERN).await?;
        let mut nodes = Vec::with_capacity(node_keys.len());
        for key in node_keys {
            let Some(name) = keys::node_name_from_key(&key) else {
                continue;
            };
            let fields: HashMap<String, String> = conn.hgetall(&key).await?;
            nodes.push(NodeRecord::from_hash(name.to_string(), fields));
        }
        nodes.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(nodes)
    }

    /// Persist a node's state as Offline.
    pub async fn mark_node_offline(&self, name: &str) -> StoreResult<()> {
        let mut conn = self.conn();
        let _: () = conn
            .hset(keys::node(name), "state", NodeState::Offline.id())
            .await?;
        Ok(())
    }

    /// Remove a node's registration hash.
    pub async fn delete_node(&self, name: &str) -> StoreResult<()> {
        let mut conn = self.conn();
        let _: () = conn.del(keys::node(name)).await?;
        Ok(())
    }

    /// The log lines a node has shipped, oldest first.
    pub async fn node_logs(&self, name: &str) -> StoreResult<Vec<String>> {
        let mut conn = self.conn();
        let lines: Vec<String> = conn.lrange(keys::node_log(name), 0, -1).await?;
        Ok(lines)
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
    fn record_parses_state_and_heartbeat() {
        let record = NodeRecord::from_hash(
            "scanner-eu-01".to_string(),
            hash(&[
                ("state", "1"),
                ("updated_at", "2026-08-06T10:00:00Z"),
                ("version", "1.4.2"),
            ]),
        );
        assert_eq!(record.state, NodeState::Online);
        assert_eq!(record.info.get("version").map(String::as_str), Some("1.4.2"));

        let now = DateTime::parse_from_rfc3339("2026-08-06T10:01:30Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(record.heartbeat_age_secs(now), Some(90));
    }

    #[test]
    fn missing_state_reads_as_unregistered() {
        let record = NodeRecord::from_hash("fresh".to_string(), hash(&[]));
        assert_eq!(record.state, NodeState::Unregistered);
        assert_eq!(record.heartbeat_age_secs(Utc::now()), None);
    }

    #[test]
    fn garbage_heartbeat_is_none() {
        let record = NodeRecord::from_hash(
            "odd".to_string(),
            hash(&[("state", "1"), ("updated_at", "last tuesday")]),
        );
        assert_eq!(record.heartbeat_age_secs(Utc::now()), None);
    }
}
