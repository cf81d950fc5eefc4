//! Producers for the per-node work and notification queues.

use redis::AsyncCommands;
use vantage_core::descriptor::JobDescriptor;
use vantage_core::notify::NodeNotification;

use crate::{keys, SharedStore, StoreResult};

impl SharedStore {
    /// Append a serialized job descriptor to a node's work queue.
    pub async fn push_job(&self, node_name: &str, descriptor: &JobDescriptor) -> StoreResult<()> {
        let payload = serde_json::to_string(descriptor)?;
        let mut conn = self.conn();
        let _: () = conn.rpush(keys::work_queue(node_name), payload).await?;
        Ok(())
    }

    /// Append a notification to a node's notification queue.
    pub async fn push_notification(
        &self,
        node_name: &str,
        message: &NodeNotification,
    ) -> StoreResult<()> {
        let payload = serde_json::to_string(message)?;
        let mut conn = self.conn();
        let _: () = conn.rpush(keys::notify_queue(node_name), payload).await?;
        Ok(())
    }
}
