//! Repository for the `scan_templates` table (template store contract).

use sqlx::PgPool;
use vantage_core::types::DbId;

use crate::models::template::ScanTemplate;

const COLUMNS: &str = "id, name, parameters, poc_names";

/// Read-side access to scan templates.
pub struct TemplateRepo;

impl TemplateRepo {
    /// Find a template by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ScanTemplate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM scan_templates WHERE id = $1");
        sqlx::query_as::<_, ScanTemplate>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
