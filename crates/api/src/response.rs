//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope per project
//! conventions. Paginated listings nest a `{ "list", "total" }` page
//! inside the envelope.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// One page of a listing plus the unpaginated total.
#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    pub list: Vec<T>,
    pub total: i64,
}
