//! Target resolution for task creation.
//!
//! Dispatches on the declared source kind to the backing provider (free
//! text, project targets, or one of the four prior-result-set asset
//! providers), then applies the ignore filter and de-duplicates. An
//! empty result fails creation; no zero-target task is ever persisted.

use sqlx::PgPool;
use vantage_core::error::CoreError;
use vantage_core::status::TargetSource;
use vantage_core::targets;
use vantage_db::models::task::CreateTask;
use vantage_db::repositories::{AssetRepo, ProjectRepo};

use crate::error::AppResult;

/// Raw candidate text for a source kind.
///
/// The General kind contributes nothing of its own; the caller-supplied
/// target text is used directly. Prior-result-set kinds select by stored
/// id list when one is present, otherwise by the saved search filter.
async fn source_text(
    pool: &PgPool,
    source: TargetSource,
    input: &CreateTask,
) -> AppResult<String> {
    match source {
        TargetSource::General => Ok(String::new()),
        TargetSource::Project => {
            let project_id = input.project_id.ok_or_else(|| {
                CoreError::Validation("Project source requires a project_id".to_string())
            })?;
            Ok(ProjectRepo::targets(pool, project_id).await?)
        }
        kind => {
            if input.source_ids.is_empty() {
                Ok(AssetRepo::targets_by_search(pool, kind, &input.search).await?)
            } else {
                Ok(AssetRepo::targets_by_ids(pool, kind, &input.source_ids).await?)
            }
        }
    }
}

/// Resolve a creation request into the raw target text to persist and
/// the resolved target list.
///
/// When the request carries explicit target text it wins; otherwise the
/// provider's candidate text is adopted. Fails with a validation error
/// when the filtered set comes out empty.
pub async fn resolve_for_create(
    pool: &PgPool,
    input: &CreateTask,
) -> AppResult<(String, Vec<String>)> {
    let source = TargetSource::from_id(input.source_kind).ok_or_else(|| {
        CoreError::Validation(format!("Unknown target source kind {}", input.source_kind))
    })?;

    let candidates = source_text(pool, source, input).await?;
    let raw = if input.target.trim().is_empty() {
        candidates
    } else {
        input.target.clone()
    };

    let resolved = targets::resolve_targets(&raw, &input.ignore);
    if resolved.is_empty() {
        return Err(CoreError::Validation("Resolved target set is empty".to_string()).into());
    }
    Ok((raw, resolved))
}
