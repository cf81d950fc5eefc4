//! The template parameter engine.
//!
//! Expands `{dict.<category>.<name>}` and `{port.<name>}` tokens in a
//! scan template's phase parameter maps against the dictionary and port
//! registries, synthesizes the custom-POC selector, and produces the job
//! descriptor handed to the work distributor.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use sqlx::PgPool;
use vantage_core::descriptor::{poc_selector, JobDescriptor, CUSTOM_POC_PLUGIN};
use vantage_core::error::CoreError;
use vantage_core::phase::{PhaseParams, ScanPhase};
use vantage_db::models::dictionary::DictionaryEntry;
use vantage_db::models::port::PortList;
use vantage_db::models::task::Task;
use vantage_db::models::template::ScanTemplate;
use vantage_db::repositories::{DictionaryRepo, PortRepo};

/// Page size handed to the port provider; far above any realistic
/// registry size.
const PORT_PAGE_SIZE: i64 = 1000;

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{(.*?)\}").expect("token regex is valid"))
}

/// Lookup tables for token substitution, built once per dispatch.
#[derive(Debug, Default)]
pub struct ParamLookups {
    /// Lower-cased `"<category>.<name>"` -> storage id.
    dicts: HashMap<String, String>,
    /// Lower-cased port-list name -> port expression.
    ports: HashMap<String, String>,
}

impl ParamLookups {
    /// Load both registries from the database.
    pub async fn load(pool: &PgPool) -> Result<Self, sqlx::Error> {
        let dicts = DictionaryRepo::list_entries(pool).await?;
        let ports = PortRepo::list_entries(pool, PORT_PAGE_SIZE).await?;
        Ok(Self::from_entries(dicts, ports))
    }

    /// Build lookup tables from already-fetched entries.
    pub fn from_entries(dicts: Vec<DictionaryEntry>, ports: Vec<PortList>) -> Self {
        Self {
            dicts: dicts
                .into_iter()
                .map(|e| {
                    (
                        format!("{}.{}", e.category.to_lowercase(), e.name.to_lowercase()),
                        e.id.to_string(),
                    )
                })
                .collect(),
            ports: ports
                .into_iter()
                .map(|p| (p.name.to_lowercase(), p.value))
                .collect(),
        }
    }

    fn resolve(&self, tag: &str, key: &str) -> Option<&str> {
        let key = key.to_lowercase();
        match tag.to_lowercase().as_str() {
            "dict" => self.dicts.get(&key).map(String::as_str),
            "port" => self.ports.get(&key).map(String::as_str),
            _ => None,
        }
    }
}

/// Build the job descriptor for one dispatch of `task`.
///
/// `targets_text` carries the literal target list on a fresh dispatch
/// and is empty on resume; the distributor blanks it again before each
/// per-node push either way.
pub fn build_descriptor(
    task: &Task,
    template: &ScanTemplate,
    lookups: &ParamLookups,
    resume: bool,
    targets_text: String,
) -> Result<JobDescriptor, CoreError> {
    let mut parameters: PhaseParams =
        serde_json::from_value(template.parameters.clone()).map_err(|e| {
            CoreError::Validation(format!(
                "Template {} has malformed parameters: {e}",
                template.id
            ))
        })?;

    // Custom-POC selection renders as a `-t` argument appended to
    // whatever the operator already configured for the plugin.
    if let Some(selector) = poc_selector(&template.poc_names) {
        let phase = parameters.entry(ScanPhase::VulnerabilityScan).or_default();
        let value = phase.entry(CUSTOM_POC_PLUGIN.to_string()).or_default();
        if value.is_empty() {
            *value = selector;
        } else {
            *value = format!("{value} {selector}");
        }
    }

    // Each phase map is substituted independently; no cross-phase state.
    for (phase, plugins) in parameters.iter_mut() {
        let phase = *phase;
        for (plugin, value) in plugins.iter_mut() {
            *value = substitute_tokens(phase, plugin, value, lookups);
        }
    }

    Ok(JobDescriptor {
        task_id: task.id,
        task_name: task.name.clone(),
        source_kind: task.source_kind_id,
        parameters,
        ignore: task.ignore.clone(),
        dedup: task.dedup,
        resume,
        targets: targets_text,
    })
}

/// Replace every resolvable `{dict.*}` / `{port.*}` token in `value`.
///
/// A token with no match stays verbatim so operators can spot the
/// unresolved reference in the dispatched descriptor; the miss is
/// logged.
fn substitute_tokens(
    phase: ScanPhase,
    plugin: &str,
    value: &str,
    lookups: &ParamLookups,
) -> String {
    let mut out = value.to_string();
    for cap in token_regex().captures_iter(value) {
        let token = &cap[1];
        let Some((tag, key)) = token.split_once('.') else {
            continue;
        };
        match lookups.resolve(tag, key) {
            Some(replacement) => {
                out = out.replace(&format!("{{{token}}}"), replacement);
            }
            None if tag.eq_ignore_ascii_case("dict") || tag.eq_ignore_ascii_case("port") => {
                tracing::warn!(
                    phase = %phase,
                    plugin,
                    token,
                    "Unresolved template token left in place",
                );
            }
            None => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::Utc;
    use vantage_core::descriptor::POC_ALL_SENTINEL;
    use vantage_core::status::TaskStatus;

    use super::*;

    fn lookups() -> ParamLookups {
        ParamLookups::from_entries(
            vec![DictionaryEntry {
                id: 4217,
                category: "dir".to_string(),
                name: "common".to_string(),
            }],
            vec![PortList {
                id: 1,
                name: "top1000".to_string(),
                value: "21,22,80,443,8080".to_string(),
            }],
        )
    }

    fn task() -> Task {
        Task {
            id: 7,
            name: "perimeter".to_string(),
            source_kind_id: 1,
            target: "example.com".to_string(),
            ignore: String::new(),
            search: String::new(),
            source_ids: vec![],
            project_id: None,
            target_count: 1,
            node_names: vec!["scanner-eu-01".to_string()],
            all_nodes: false,
            template_id: 3,
            dedup: false,
            status_id: TaskStatus::Running.id(),
            progress: 0,
            created_at: Utc::now(),
            ended_at: String::new(),
        }
    }

    fn template(parameters: serde_json::Value, poc_names: Vec<String>) -> ScanTemplate {
        ScanTemplate {
            id: 3,
            name: "full".to_string(),
            parameters,
            poc_names,
        }
    }

    #[test]
    fn dict_token_resolves_to_storage_id() {
        let template = template(
            serde_json::json!({"DirScan": {"scanner": "-dict {dict.dir.common}"}}),
            vec![],
        );
        let descriptor =
            build_descriptor(&task(), &template, &lookups(), false, String::new()).unwrap();
        assert_eq!(
            descriptor.parameters[&ScanPhase::DirScan]["scanner"],
            "-dict 4217"
        );
    }

    #[test]
    fn unresolvable_token_stays_verbatim() {
        let template = template(
            serde_json::json!({"DirScan": {"scanner": "-dict {dict.dir.missing}"}}),
            vec![],
        );
        let descriptor =
            build_descriptor(&task(), &template, &lookups(), false, String::new()).unwrap();
        assert_eq!(
            descriptor.parameters[&ScanPhase::DirScan]["scanner"],
            "-dict {dict.dir.missing}"
        );
    }

    #[test]
    fn tokens_match_case_insensitively() {
        let template = template(
            serde_json::json!({"PortScan": {"scanner": "-p {PORT.Top1000}"}}),
            vec![],
        );
        let descriptor =
            build_descriptor(&task(), &template, &lookups(), false, String::new()).unwrap();
        assert_eq!(
            descriptor.parameters[&ScanPhase::PortScan]["scanner"],
            "-p 21,22,80,443,8080"
        );
    }

    #[test]
    fn poc_selection_appends_to_existing_value() {
        let template = template(
            serde_json::json!({"VulnerabilityScan": {"custom-poc": "-severity high"}}),
            vec!["cve-2024-0001".to_string()],
        );
        let descriptor =
            build_descriptor(&task(), &template, &lookups(), false, String::new()).unwrap();
        assert_eq!(
            descriptor.parameters[&ScanPhase::VulnerabilityScan][CUSTOM_POC_PLUGIN],
            "-severity high -t cve-2024-0001.yaml"
        );
    }

    #[test]
    fn poc_selection_fills_missing_phase_and_plugin() {
        let template = template(
            serde_json::json!({}),
            vec![POC_ALL_SENTINEL.to_string()],
        );
        let descriptor =
            build_descriptor(&task(), &template, &lookups(), false, String::new()).unwrap();
        assert_eq!(
            descriptor.parameters[&ScanPhase::VulnerabilityScan][CUSTOM_POC_PLUGIN],
            "-t *"
        );
    }

    #[test]
    fn poc_list_is_not_serialized_into_descriptor() {
        let template = template(serde_json::json!({}), vec!["cve-2024-0001".to_string()]);
        let descriptor =
            build_descriptor(&task(), &template, &lookups(), false, String::new()).unwrap();
        let json = serde_json::to_value(&descriptor).unwrap();
        assert!(json.get("poc_names").is_none());
    }

    #[test]
    fn substitution_is_stable_across_repeat_builds() {
        let template = template(
            serde_json::json!({
                "PortScan": {"scanner": "-p {port.top1000}"},
                "DirScan": {"scanner": "-dict {dict.dir.common} -x {dict.dir.missing}"}
            }),
            vec![],
        );
        let first =
            build_descriptor(&task(), &template, &lookups(), false, String::new()).unwrap();
        let second =
            build_descriptor(&task(), &template, &lookups(), false, String::new()).unwrap();
        assert_eq!(
            serde_json::to_value(&first.parameters).unwrap(),
            serde_json::to_value(&second.parameters).unwrap()
        );
    }

    #[test]
    fn malformed_template_parameters_is_a_validation_error() {
        let template = template(serde_json::json!({"NoSuchPhase": {}}), vec![]);
        let err =
            build_descriptor(&task(), &template, &lookups(), false, String::new()).unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
    }

    #[test]
    fn carried_fields_copy_from_task() {
        let template = template(serde_json::json!({}), vec![]);
        let descriptor = build_descriptor(
            &task(),
            &template,
            &lookups(),
            true,
            "example.com".to_string(),
        )
        .unwrap();
        assert_eq!(descriptor.task_id, 7);
        assert_eq!(descriptor.task_name, "perimeter");
        assert_eq!(descriptor.source_kind, 1);
        assert!(descriptor.resume);
        assert_eq!(descriptor.targets, "example.com");
    }
}
