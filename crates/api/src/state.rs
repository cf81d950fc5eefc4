use std::sync::Arc;

use vantage_store::SharedStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (persisted task store and read providers).
    pub pool: vantage_db::DbPool,
    /// Shared key/queue store (node queues, progress counters, registry).
    pub store: SharedStore,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
