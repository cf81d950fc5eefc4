//! Port list model (read-side contract of the port provider).

use serde::Serialize;
use sqlx::FromRow;
use vantage_core::types::DbId;

/// A row from the `port_lists` table.
///
/// Template tokens reference lists as `{port.<name>}` and resolve to the
/// literal port expression in `value`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PortList {
    pub id: DbId,
    pub name: String,
    pub value: String,
}
