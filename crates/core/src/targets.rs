//! Target-set resolution: expansion of raw target text into discrete scan
//! targets, and the line-oriented ignore filter applied on top.
//!
//! Resolution is deterministic: the same raw text and ignore pattern
//! always produce the same ordered, de-duplicated target list, so resume
//! and retest paths can re-derive the set instead of replaying a cache.

use std::collections::HashSet;
use std::net::Ipv4Addr;

use indexmap::IndexSet;
use ipnetwork::IpNetwork;
use regex::Regex;

/// Expand a single raw entry into concrete targets.
///
/// - Entries carrying a scheme (`://`) pass through verbatim.
/// - `a.b.c.d-e.f.g.h` expands to the inclusive IPv4 range.
/// - CIDR notation expands to the network's host addresses.
/// - Anything else, including entries that fail to parse as a range or
///   network, passes through verbatim.
pub fn expand_entry(entry: &str) -> Vec<String> {
    let entry = entry.trim();
    if entry.is_empty() {
        return Vec::new();
    }
    if entry.contains("://") {
        return vec![entry.to_string()];
    }
    if entry.contains('-') {
        if let Some(range) = expand_ipv4_range(entry) {
            return range;
        }
        return vec![entry.to_string()];
    }
    if entry.contains('/') {
        if let Some(hosts) = expand_network(entry) {
            return hosts;
        }
    }
    vec![entry.to_string()]
}

/// Expand `start-end` into every IPv4 address in the inclusive range.
fn expand_ipv4_range(spec: &str) -> Option<Vec<String>> {
    let (start, end) = spec.split_once('-')?;
    let start: Ipv4Addr = start.trim().parse().ok()?;
    let end: Ipv4Addr = end.trim().parse().ok()?;
    let (lo, hi) = (u32::from(start), u32::from(end));
    if lo > hi {
        return None;
    }
    Some((lo..=hi).map(|v| Ipv4Addr::from(v).to_string()).collect())
}

/// Expand CIDR notation into host addresses.
///
/// For IPv4 the network and broadcast addresses are dropped (except for
/// /31 and /32, which have no distinct ones). IPv6 networks are not
/// enumerated; `None` lets the entry pass through for the worker to
/// interpret.
fn expand_network(spec: &str) -> Option<Vec<String>> {
    match spec.parse::<IpNetwork>().ok()? {
        IpNetwork::V4(net) => {
            let network = net.network();
            let broadcast = net.broadcast();
            Some(
                net.iter()
                    .filter(|ip| net.prefix() >= 31 || (*ip != network && *ip != broadcast))
                    .map(|ip| ip.to_string())
                    .collect(),
            )
        }
        IpNetwork::V6(_) => None,
    }
}

/// Line-oriented allow/deny filter parsed from a task's ignore text.
///
/// Lines without a `*` are expanded like targets and matched exactly;
/// lines with a `*` become wildcard patterns. A target matching ANY entry
/// is excluded.
#[derive(Debug, Default)]
pub struct IgnoreFilter {
    exact: HashSet<String>,
    patterns: Vec<Regex>,
}

impl IgnoreFilter {
    pub fn parse(text: &str) -> Self {
        let mut exact = HashSet::new();
        let mut patterns = Vec::new();
        for line in text.split('\n') {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line.contains('*') {
                let escaped = regex::escape(line).replace(r"\*", ".*");
                // A pattern that still fails to compile is dropped rather
                // than poisoning the whole filter.
                if let Ok(re) = Regex::new(&escaped) {
                    patterns.push(re);
                }
            } else {
                for entry in expand_entry(line) {
                    exact.insert(entry);
                }
            }
        }
        Self { exact, patterns }
    }

    /// Whether `target` is disqualified by any ignore entry.
    pub fn excludes(&self, target: &str) -> bool {
        self.exact.contains(target) || self.patterns.iter().any(|re| re.is_match(target))
    }
}

/// Resolve raw newline-delimited target text into an ordered,
/// de-duplicated target list with the ignore filter applied.
pub fn resolve_targets(raw: &str, ignore: &str) -> Vec<String> {
    let filter = IgnoreFilter::parse(ignore);
    let mut out: IndexSet<String> = IndexSet::new();
    for line in raw.split('\n') {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        for candidate in expand_entry(line) {
            let candidate = candidate.trim();
            if candidate.is_empty() || filter.excludes(candidate) {
                continue;
            }
            out.insert(candidate.to_string());
        }
    }
    out.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_entries_pass_through() {
        assert_eq!(
            expand_entry("https://example.com/login"),
            vec!["https://example.com/login"]
        );
    }

    #[test]
    fn ipv4_range_expands_inclusively() {
        let hosts = expand_entry("10.0.0.1-10.0.0.3");
        assert_eq!(hosts, vec!["10.0.0.1", "10.0.0.2", "10.0.0.3"]);
    }

    #[test]
    fn reversed_range_passes_through() {
        assert_eq!(expand_entry("10.0.0.3-10.0.0.1"), vec!["10.0.0.3-10.0.0.1"]);
    }

    #[test]
    fn hostname_with_dash_passes_through() {
        assert_eq!(expand_entry("api-gw.example.com"), vec!["api-gw.example.com"]);
    }

    #[test]
    fn cidr_expands_to_hosts() {
        let hosts = expand_entry("192.168.1.0/30");
        assert_eq!(hosts, vec!["192.168.1.1", "192.168.1.2"]);
    }

    #[test]
    fn slash_31_keeps_both_addresses() {
        let hosts = expand_entry("192.168.1.0/31");
        assert_eq!(hosts, vec!["192.168.1.0", "192.168.1.1"]);
    }

    #[test]
    fn url_path_is_not_treated_as_cidr() {
        assert_eq!(expand_entry("example.com/admin"), vec!["example.com/admin"]);
    }

    #[test]
    fn ipv6_network_passes_through() {
        assert_eq!(expand_entry("2001:db8::/120"), vec!["2001:db8::/120"]);
    }

    #[test]
    fn exact_ignore_excludes_expanded_entries() {
        let targets = resolve_targets("10.0.0.1-10.0.0.3", "10.0.0.2");
        assert_eq!(targets, vec!["10.0.0.1", "10.0.0.3"]);
    }

    #[test]
    fn wildcard_ignore_excludes_matches() {
        let raw = "app.example.com\nstaging.example.com\napp.other.com";
        let targets = resolve_targets(raw, "*.example.com");
        assert_eq!(targets, vec!["app.other.com"]);
    }

    #[test]
    fn any_matching_pattern_disqualifies() {
        let filter = IgnoreFilter::parse("*.example.com\n*.other.com");
        assert!(filter.excludes("app.example.com"));
        assert!(filter.excludes("app.other.com"));
        assert!(!filter.excludes("app.third.com"));
    }

    #[test]
    fn duplicates_collapse_preserving_first_position() {
        let raw = "a.example.com\nb.example.com\na.example.com";
        let targets = resolve_targets(raw, "");
        assert_eq!(targets, vec!["a.example.com", "b.example.com"]);
    }

    #[test]
    fn blank_and_whitespace_lines_are_dropped() {
        let targets = resolve_targets("\n  \r\n a.example.com \n", "");
        assert_eq!(targets, vec!["a.example.com"]);
    }

    #[test]
    fn fully_ignored_input_resolves_empty() {
        assert!(resolve_targets("a.example.com", "a.example.com").is_empty());
    }

    #[test]
    fn resolution_is_repeatable() {
        let raw = "192.168.1.0/30\nhttps://example.com\nexample.com";
        let first = resolve_targets(raw, "192.168.1.2");
        let second = resolve_targets(raw, "192.168.1.2");
        assert_eq!(first, second);
    }
}
