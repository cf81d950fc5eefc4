//! The job descriptor pushed onto node work queues.

use serde::{Deserialize, Serialize};

use crate::phase::PhaseParams;
use crate::status::StatusId;
use crate::types::DbId;

/// Reserved plugin key under the VulnerabilityScan phase whose argument
/// receives the synthesized custom-POC selector.
pub const CUSTOM_POC_PLUGIN: &str = "custom-poc";

/// Sentinel POC selection meaning "run every POC" (`-t *`).
pub const POC_ALL_SENTINEL: &str = "All";

/// The per-dispatch payload a node drains from its work queue.
///
/// Derived fresh from a task, its scan template, and the current
/// dictionary/port registries on every dispatch; never persisted as its
/// own entity. `targets` is blanked before each per-node push — nodes
/// pull the target list from the task's shared store key instead of
/// carrying their own copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDescriptor {
    pub task_id: DbId,
    pub task_name: String,
    /// The task's declared target source kind
    /// (see `crate::status::TargetSource`).
    pub source_kind: StatusId,
    pub parameters: PhaseParams,
    pub ignore: String,
    pub dedup: bool,
    pub resume: bool,
    #[serde(default)]
    pub targets: String,
}

impl JobDescriptor {
    /// A copy with the embedded target text blanked, suitable for
    /// enqueueing to a node.
    pub fn without_targets(&self) -> Self {
        Self {
            targets: String::new(),
            ..self.clone()
        }
    }
}

/// Render the custom-POC selector argument for a selection list.
///
/// Returns `None` for an empty selection. The sentinel
/// [`POC_ALL_SENTINEL`] anywhere in the list renders as `-t *`; otherwise
/// each name becomes `<name>.yaml`, comma-joined.
pub fn poc_selector(poc_names: &[String]) -> Option<String> {
    if poc_names.is_empty() {
        return None;
    }
    if poc_names.iter().any(|n| n == POC_ALL_SENTINEL) {
        return Some("-t *".to_string());
    }
    let list = poc_names
        .iter()
        .map(|n| format!("{n}.yaml"))
        .collect::<Vec<_>>()
        .join(",");
    Some(format!("-t {list}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_joins_yaml_names() {
        let names = vec!["cve-2024-0001".to_string(), "weak-auth".to_string()];
        assert_eq!(
            poc_selector(&names).as_deref(),
            Some("-t cve-2024-0001.yaml,weak-auth.yaml")
        );
    }

    #[test]
    fn all_sentinel_wins_over_names() {
        let names = vec!["cve-2024-0001".to_string(), POC_ALL_SENTINEL.to_string()];
        assert_eq!(poc_selector(&names).as_deref(), Some("-t *"));
    }

    #[test]
    fn empty_selection_renders_nothing() {
        assert_eq!(poc_selector(&[]), None);
    }

    #[test]
    fn without_targets_blanks_only_targets() {
        let descriptor = JobDescriptor {
            task_id: 7,
            task_name: "perimeter".to_string(),
            source_kind: 1,
            parameters: PhaseParams::new(),
            ignore: "*.internal".to_string(),
            dedup: true,
            resume: false,
            targets: "a.example.com\nb.example.com".to_string(),
        };
        let blanked = descriptor.without_targets();
        assert!(blanked.targets.is_empty());
        assert_eq!(blanked.task_id, 7);
        assert_eq!(blanked.ignore, "*.internal");
    }
}
