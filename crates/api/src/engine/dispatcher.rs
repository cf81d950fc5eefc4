//! Work distribution: fan a parameterized job descriptor out to every
//! node assigned to a task.
//!
//! Dispatch runs detached from the originating request, so API latency
//! is independent of fan-out size. A push failure for one node is
//! logged and does not abort delivery to the rest; a retest re-delivers
//! to any node that was missed.

use std::sync::Arc;

use futures::StreamExt;
use vantage_core::error::CoreError;
use vantage_core::status::NodeState;
use vantage_core::targets;
use vantage_db::models::task::Task;
use vantage_db::repositories::{TaskRepo, TemplateRepo};
use vantage_db::DbPool;
use vantage_store::SharedStore;

use crate::config::ServerConfig;
use crate::engine::template::{self, ParamLookups};
use crate::error::AppResult;

/// One full dispatch of `task` to its assigned nodes.
///
/// Unless resuming, every ephemeral key of the task is cleared, the
/// target list is re-derived from the stored target text, and pushed
/// into the task's shared target key once; nodes pull targets from
/// there rather than from their descriptor copies.
pub async fn dispatch_task(
    pool: &DbPool,
    store: &SharedStore,
    config: &ServerConfig,
    task: &Task,
    resume: bool,
) -> AppResult<()> {
    tracing::info!(task_id = task.id, resume, "Dispatch started");

    let node_names = assigned_nodes(store, task).await?;
    if node_names.is_empty() {
        tracing::warn!(task_id = task.id, "Dispatch found no assigned nodes");
        return Ok(());
    }

    let targets_text = if resume {
        String::new()
    } else {
        store.clear_task(task.id).await?;
        let resolved = targets::resolve_targets(&task.target, &task.ignore);
        store.push_targets(task.id, &resolved).await?;
        resolved.join("\n")
    };

    let template = TemplateRepo::find_by_id(pool, task.template_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "ScanTemplate",
            id: task.template_id,
        })?;
    let lookups = ParamLookups::load(pool).await?;
    let descriptor = template::build_descriptor(task, &template, &lookups, resume, targets_text)?;

    let failures = futures::stream::iter(node_names.clone())
        .map(|name| {
            let payload = descriptor.without_targets();
            let store = store.clone();
            async move {
                match store.push_job(&name, &payload).await {
                    Ok(()) => 0u32,
                    Err(e) => {
                        tracing::error!(
                            task_id = payload.task_id,
                            node = %name,
                            error = %e,
                            "Queue push failed; node skipped",
                        );
                        1
                    }
                }
            }
        })
        .buffer_unordered(config.dispatch_concurrency.max(1))
        .fold(0u32, |acc, n| async move { acc + n })
        .await;

    tracing::info!(
        task_id = task.id,
        nodes = node_names.len(),
        failures,
        "Dispatch finished",
    );
    Ok(())
}

/// Spawn a dispatch on its own task, detached from the request context.
///
/// Failures are traced and never observable by the original caller.
pub fn dispatch_detached(
    pool: DbPool,
    store: SharedStore,
    config: Arc<ServerConfig>,
    task: Task,
    resume: bool,
) {
    tokio::spawn(async move {
        if let Err(e) = dispatch_task(&pool, &store, &config, &task, resume).await {
            tracing::error!(task_id = task.id, error = %e, "Detached dispatch failed");
        }
    });
}

/// Re-push outstanding work to a single node.
///
/// Used when a node (re)registers: every unfinished Running task
/// assigned to it — explicitly or via the all-nodes flag — gets its
/// descriptor enqueued again with the resume flag set, so the node
/// continues from the shared seen-set instead of rescanning.
pub async fn sync_node(pool: &DbPool, store: &SharedStore, node_name: &str) -> AppResult<u32> {
    let tasks = TaskRepo::list_running_for_node(pool, node_name).await?;
    if tasks.is_empty() {
        return Ok(0);
    }

    let lookups = ParamLookups::load(pool).await?;
    let mut pushed = 0u32;
    for task in &tasks {
        let Some(template) = TemplateRepo::find_by_id(pool, task.template_id).await? else {
            tracing::warn!(
                task_id = task.id,
                template_id = task.template_id,
                "Template missing; task not re-pushed",
            );
            continue;
        };
        let descriptor =
            match template::build_descriptor(task, &template, &lookups, true, String::new()) {
                Ok(d) => d,
                Err(e) => {
                    tracing::error!(task_id = task.id, error = %e, "Descriptor build failed");
                    continue;
                }
            };
        match store.push_job(node_name, &descriptor.without_targets()).await {
            Ok(()) => pushed += 1,
            Err(e) => {
                tracing::error!(
                    task_id = task.id,
                    node = node_name,
                    error = %e,
                    "Queue push failed during node sync",
                );
            }
        }
    }
    Ok(pushed)
}

/// The full node assignment for a task: the explicit list, plus — when
/// the all-nodes flag is set — every registered node (online or not),
/// de-duplicated.
async fn assigned_nodes(store: &SharedStore, task: &Task) -> AppResult<Vec<String>> {
    let mut names = task.node_names.clone();
    if task.all_nodes {
        for record in store.list_nodes().await? {
            if record.state != NodeState::Unregistered && !names.contains(&record.name) {
                names.push(record.name);
            }
        }
    }
    Ok(names)
}
