//! Asset-side contracts consumed by the orchestration core: the four
//! prior-result-set target providers and the cascading delete across
//! downstream asset tables.
//!
//! Asset CRUD itself lives outside this core; only the narrow read and
//! purge surfaces appear here.

use sqlx::PgPool;
use vantage_core::status::TargetSource;
use vantage_core::types::DbId;

/// Downstream asset tables purged by a cascading task delete. Every
/// table carries a `task_name` column.
const CASCADE_TABLES: [&str; 9] = [
    "assets",
    "root_domains",
    "subdomains",
    "url_scans",
    "crawler_results",
    "sensitive_results",
    "dir_scan_results",
    "vulnerabilities",
    "page_monitoring",
];

/// Table and target column backing a prior-result-set source kind.
fn source_table(source: TargetSource) -> Option<(&'static str, &'static str)> {
    match source {
        TargetSource::Asset => Some(("assets", "host")),
        TargetSource::RootDomain => Some(("root_domains", "domain")),
        TargetSource::Subdomain => Some(("subdomains", "host")),
        TargetSource::UrlScan => Some(("url_scans", "url")),
        TargetSource::General | TargetSource::Project => None,
    }
}

/// Read and purge surface over the downstream asset tables.
pub struct AssetRepo;

impl AssetRepo {
    /// Newline-joined targets matching a saved-search filter.
    ///
    /// An empty filter selects every row. Source kinds without a backing
    /// asset table resolve to empty text.
    pub async fn targets_by_search(
        pool: &PgPool,
        source: TargetSource,
        search: &str,
    ) -> Result<String, sqlx::Error> {
        let Some((table, column)) = source_table(source) else {
            return Ok(String::new());
        };
        let pattern = if search.is_empty() {
            "%".to_string()
        } else {
            format!("%{search}%")
        };
        let query = format!("SELECT {column} FROM {table} WHERE {column} ILIKE $1 ORDER BY id");
        let rows = sqlx::query_scalar::<_, String>(&query)
            .bind(pattern)
            .fetch_all(pool)
            .await?;
        Ok(rows.join("\n"))
    }

    /// Newline-joined targets for an explicit id selection.
    pub async fn targets_by_ids(
        pool: &PgPool,
        source: TargetSource,
        ids: &[DbId],
    ) -> Result<String, sqlx::Error> {
        let Some((table, column)) = source_table(source) else {
            return Ok(String::new());
        };
        let query = format!("SELECT {column} FROM {table} WHERE id = ANY($1) ORDER BY id");
        let rows = sqlx::query_scalar::<_, String>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await?;
        Ok(rows.join("\n"))
    }

    /// Delete asset rows produced by the named tasks, across every
    /// cascade table.
    ///
    /// Best-effort and non-transactional: a failure on one table is
    /// logged and the remaining tables are still attempted. Returns the
    /// total number of rows deleted.
    pub async fn purge_by_task_names(pool: &PgPool, task_names: &[String]) -> u64 {
        let mut total = 0;
        for table in CASCADE_TABLES {
            let query = format!("DELETE FROM {table} WHERE task_name = ANY($1)");
            match sqlx::query(&query).bind(task_names).execute(pool).await {
                Ok(result) => {
                    let deleted = result.rows_affected();
                    if deleted > 0 {
                        tracing::info!(table, deleted, "Cascade delete purged asset rows");
                    }
                    total += deleted;
                }
                Err(e) => {
                    tracing::error!(table, error = %e, "Cascade delete failed for table");
                }
            }
        }
        total
    }
}
