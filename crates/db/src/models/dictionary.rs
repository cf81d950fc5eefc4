//! Dictionary entry model (read-side contract of the dictionary provider).

use serde::Serialize;
use sqlx::FromRow;
use vantage_core::types::DbId;

/// A row from the `dictionary_entries` table.
///
/// Template tokens reference entries as `{dict.<category>.<name>}` and
/// resolve to the storage id workers use to fetch the dictionary body.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DictionaryEntry {
    pub id: DbId,
    pub category: String,
    pub name: String,
}
