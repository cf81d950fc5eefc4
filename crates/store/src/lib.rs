//! The Redis-shaped shared store: ephemeral per-task progress keys, node
//! work and notification queues, and the node registry hashes written by
//! worker heartbeats.
//!
//! The control plane is a producer on the queues and a reader of the
//! worker-maintained counters; it never drains a work queue and never
//! writes a completion counter.

use redis::aio::ConnectionManager;

pub mod keys;
pub mod nodes;
pub mod progress;
pub mod queue;

/// Errors from shared-store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store command failed: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Payload serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Convenience alias for store operation results.
pub type StoreResult<T> = Result<T, StoreError>;

/// Handle to the shared key/queue store.
///
/// Cheaply cloneable; the underlying [`ConnectionManager`] multiplexes a
/// single reconnecting connection.
#[derive(Clone)]
pub struct SharedStore {
    conn: ConnectionManager,
}

impl std::fmt::Debug for SharedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedStore").finish_non_exhaustive()
    }
}

impl SharedStore {
    /// Connect to the store at `redis_url`.
    pub async fn connect(redis_url: &str) -> StoreResult<Self> {
        tracing::info!("Connecting to shared store");
        let client = redis::Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;
        tracing::info!("Shared store connection established");
        Ok(Self { conn })
    }

    /// A connection handle for one command sequence.
    pub(crate) fn conn(&self) -> ConnectionManager {
        self.conn.clone()
    }

    /// Verify the store is reachable.
    pub async fn ping(&self) -> StoreResult<()> {
        let mut conn = self.conn();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    /// Delete every key matching `pattern`. Returns the number of keys
    /// removed.
    pub(crate) async fn delete_pattern(&self, pattern: &str) -> StoreResult<u64> {
        use redis::AsyncCommands;
        let mut conn = self.conn();
        let keys: Vec<String> = conn.keys(pattern).await?;
        if keys.is_empty() {
            return Ok(0);
        }
        let deleted: u64 = conn.del(&keys).await?;
        Ok(deleted)
    }
}
