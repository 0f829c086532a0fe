use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// The aggregated investigation record for one domain.
///
/// Every field except `domain` is independently optional: `None` means the
/// corresponding collector failed or returned nothing. A completed report is
/// read-only; re-running an investigation produces a new `Report`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub domain: String,
    pub traceroute: Option<String>,
    pub dns: Option<String>,
    pub ip_lookup: Option<IpLookup>,
    pub tech_stack: Option<BTreeMap<String, Vec<String>>>,
    pub infrastructure: Option<Infrastructure>,
    pub site_details: Option<BTreeMap<String, TechDetail>>,
    pub narrative: Option<String>,
}

/// Structured IP ownership data from the RDAP registry lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IpLookup {
    pub asn_cidr: Option<String>,
    pub asn_description: Option<String>,
    pub network: Option<Network>,
    /// Remainder of the registry payload, preserved as-is.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Network {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cidr: Vec<String>,
    pub name: Option<String>,
    pub country: Option<String>,
}

/// Infrastructure hints classified from HTTP response headers.
///
/// Only the detected subset serializes: absent strings and false booleans are
/// skipped, matching the fixed vocabulary emitted by the header collector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Infrastructure {
    #[serde(rename = "Server", skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    #[serde(rename = "Cache", skip_serializing_if = "Option::is_none")]
    pub cache: Option<String>,
    #[serde(rename = "Via", skip_serializing_if = "Option::is_none")]
    pub via: Option<String>,
    #[serde(
        rename = "Cloudflare",
        default,
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub cloudflare: bool,
    #[serde(
        rename = "CloudFront",
        default,
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub cloudfront: bool,
}

impl Infrastructure {
    pub fn is_empty(&self) -> bool {
        self.server.is_none()
            && self.cache.is_none()
            && self.via.is_none()
            && !self.cloudflare
            && !self.cloudfront
    }
}

/// One technology detected on the live page, with version and categories.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TechDetail {
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
}

/// Merge collector outputs into a `Report`. Pure: no I/O, cannot fail.
///
/// The only transformation is set-to-sequence coercion of the tech-stack
/// values so the report serializes cleanly. Element order within each
/// category follows the set's iteration order and is not stable across
/// runs; no consumer depends on it.
pub fn assemble(
    domain: &str,
    traceroute: Option<String>,
    dns: Option<String>,
    ip_lookup: Option<IpLookup>,
    tech_stack: Option<HashMap<String, HashSet<String>>>,
    infrastructure: Option<Infrastructure>,
    site_details: Option<BTreeMap<String, TechDetail>>,
) -> Report {
    let tech_stack = tech_stack.map(|categories| {
        categories
            .into_iter()
            .map(|(category, items)| (category, items.into_iter().collect::<Vec<_>>()))
            .collect::<BTreeMap<_, _>>()
    });

    Report {
        domain: domain.to_string(),
        traceroute,
        dns,
        ip_lookup,
        tech_stack,
        infrastructure,
        site_details,
        narrative: None,
    }
}

impl Report {
    /// Indented structural dump of the report, used as the prompt body for
    /// the narrative service and as the rendered body of nested sections.
    pub fn canonical_text(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| format!("{:?}", self))
    }
}
