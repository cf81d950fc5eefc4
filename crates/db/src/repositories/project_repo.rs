//! Repository for project target lookups (project provider contract).

use sqlx::PgPool;
use vantage_core::types::DbId;

/// Read-side access to project target lists.
pub struct ProjectRepo;

impl ProjectRepo {
    /// The newline-joined target text declared for a project.
    pub async fn targets(pool: &PgPool, project_id: DbId) -> Result<String, sqlx::Error> {
        let targets = sqlx::query_scalar::<_, String>(
            "SELECT target FROM project_targets WHERE project_id = $1",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;
        Ok(targets.join("\n"))
    }
}
