//! Notification fan-out to node notification queues.

use vantage_core::notify::NodeNotification;
use vantage_store::SharedStore;

use crate::error::AppResult;

/// Target name addressing every registered node.
pub const BROADCAST_ALL: &str = "all";

/// Push `message` onto one node's notification queue, or onto every
/// registered node's queue when `target` is [`BROADCAST_ALL`].
///
/// Individual push failures are logged and skipped; returns how many
/// queues accepted the message.
pub async fn broadcast(
    store: &SharedStore,
    target: &str,
    message: &NodeNotification,
) -> AppResult<u32> {
    let names: Vec<String> = if target == BROADCAST_ALL {
        store
            .list_nodes()
            .await?
            .into_iter()
            .map(|record| record.name)
            .collect()
    } else {
        vec![target.to_string()]
    };

    let mut delivered = 0u32;
    for name in &names {
        match store.push_notification(name, message).await {
            Ok(()) => delivered += 1,
            Err(e) => {
                tracing::error!(
                    node = %name,
                    kind = %message.kind,
                    error = %e,
                    "Notification push failed",
                );
            }
        }
    }
    Ok(delivered)
}
