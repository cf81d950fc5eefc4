//! Repository for the `port_lists` table (port provider contract).

use sqlx::PgPool;

use crate::models::port::PortList;

const COLUMNS: &str = "id, name, value";

/// Read-side access to named port lists.
pub struct PortRepo;

impl PortRepo {
    /// List port lists, capped at `page_size` entries.
    pub async fn list_entries(pool: &PgPool, page_size: i64) -> Result<Vec<PortList>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM port_lists ORDER BY name LIMIT $1");
        sqlx::query_as::<_, PortList>(&query)
            .bind(page_size)
            .fetch_all(pool)
            .await
    }
}
