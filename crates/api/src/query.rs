//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Effective page size: defaults to 10, capped at 100.
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(10).clamp(1, 100) as usize
    }

    /// Effective offset: defaults to 0.
    pub fn offset(&self) -> usize {
        self.offset.unwrap_or(0).max(0) as usize
    }
}

/// Query parameters for node listings.
#[derive(Debug, Deserialize)]
pub struct NodeListParams {
    #[serde(default)]
    pub online_only: bool,
}
