//! The scan pipeline phase enumeration.
//!
//! Phase names are part of the wire contract with worker nodes: they key
//! the parameter maps inside a [`JobDescriptor`](crate::descriptor) and
//! prefix the timing fields workers write into per-target progress hashes.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A phase of the worker-side scan pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScanPhase {
    TargetHandler,
    SubdomainScan,
    SubdomainSecurity,
    PortScanPreparation,
    PortScan,
    PortFingerprint,
    AssetMapping,
    AssetHandle,
    #[serde(rename = "URLScan")]
    UrlScan,
    WebCrawler,
    #[serde(rename = "URLSecurity")]
    UrlSecurity,
    DirScan,
    VulnerabilityScan,
}

/// Per-phase parameter maps: phase -> plugin key -> argument string.
///
/// `IndexMap` keeps the phase iteration order stable in serialized
/// descriptors and in the progress detail view.
pub type PhaseParams = IndexMap<ScanPhase, IndexMap<String, String>>;

impl ScanPhase {
    /// All phases in pipeline order.
    pub const ALL: [ScanPhase; 13] = [
        ScanPhase::TargetHandler,
        ScanPhase::SubdomainScan,
        ScanPhase::SubdomainSecurity,
        ScanPhase::PortScanPreparation,
        ScanPhase::PortScan,
        ScanPhase::PortFingerprint,
        ScanPhase::AssetMapping,
        ScanPhase::AssetHandle,
        ScanPhase::UrlScan,
        ScanPhase::WebCrawler,
        ScanPhase::UrlSecurity,
        ScanPhase::DirScan,
        ScanPhase::VulnerabilityScan,
    ];

    /// The wire name, as used in descriptor keys and progress hash fields.
    pub fn as_str(self) -> &'static str {
        match self {
            ScanPhase::TargetHandler => "TargetHandler",
            ScanPhase::SubdomainScan => "SubdomainScan",
            ScanPhase::SubdomainSecurity => "SubdomainSecurity",
            ScanPhase::PortScanPreparation => "PortScanPreparation",
            ScanPhase::PortScan => "PortScan",
            ScanPhase::PortFingerprint => "PortFingerprint",
            ScanPhase::AssetMapping => "AssetMapping",
            ScanPhase::AssetHandle => "AssetHandle",
            ScanPhase::UrlScan => "URLScan",
            ScanPhase::WebCrawler => "WebCrawler",
            ScanPhase::UrlSecurity => "URLSecurity",
            ScanPhase::DirScan => "DirScan",
            ScanPhase::VulnerabilityScan => "VulnerabilityScan",
        }
    }
}

impl std::fmt::Display for ScanPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_serializes_to_wire_name() {
        let json = serde_json::to_string(&ScanPhase::UrlScan).unwrap();
        assert_eq!(json, "\"URLScan\"");
        let back: ScanPhase = serde_json::from_str("\"URLSecurity\"").unwrap();
        assert_eq!(back, ScanPhase::UrlSecurity);
    }

    #[test]
    fn wire_names_match_as_str() {
        for phase in ScanPhase::ALL {
            let json = serde_json::to_string(&phase).unwrap();
            assert_eq!(json.trim_matches('"'), phase.as_str());
        }
    }

    #[test]
    fn phase_params_keeps_insertion_order() {
        let mut params: PhaseParams = PhaseParams::new();
        params.insert(ScanPhase::PortScan, IndexMap::new());
        params.insert(ScanPhase::TargetHandler, IndexMap::new());
        let keys: Vec<_> = params.keys().copied().collect();
        assert_eq!(keys, vec![ScanPhase::PortScan, ScanPhase::TargetHandler]);
    }
}
