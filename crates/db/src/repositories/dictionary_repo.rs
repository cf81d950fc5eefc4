//! Repository for the `dictionary_entries` table (dictionary provider
//! contract).

use sqlx::PgPool;

use crate::models::dictionary::DictionaryEntry;

const COLUMNS: &str = "id, category, name";

/// Read-side access to dictionary entries.
pub struct DictionaryRepo;

impl DictionaryRepo {
    /// List every dictionary entry.
    pub async fn list_entries(pool: &PgPool) -> Result<Vec<DictionaryEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM dictionary_entries ORDER BY category, name");
        sqlx::query_as::<_, DictionaryEntry>(&query)
            .fetch_all(pool)
            .await
    }
}
