use crate::collect::SiteFingerprint;
use crate::error::ReconError;
use crate::report::TechDetail;
use async_trait::async_trait;
use regex::Regex;
use reqwest::header::HeaderMap;
use reqwest::Client;
use std::collections::BTreeMap;

/// Wappalyzer-style page fingerprinting: loads the page once and classifies
/// detected technologies with versions and categories.
pub struct WappalyzerProbe {
    client: Client,
}

impl WappalyzerProbe {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SiteFingerprint for WappalyzerProbe {
    async fn fingerprint(&self, url: &str) -> Result<BTreeMap<String, TechDetail>, ReconError> {
        let response = self.client.get(url).send().await?;
        let headers = response.headers().clone();
        let body = response.text().await?;
        Ok(detect_details(&headers, &body))
    }
}

struct BodySignature {
    name: &'static str,
    categories: &'static [&'static str],
    // First capture group, when present, is the version.
    pattern: &'static str,
}

const BODY_SIGNATURES: &[BodySignature] = &[
    BodySignature {
        name: "jQuery",
        categories: &["JavaScript libraries"],
        pattern: r"jquery[.-]([0-9][0-9a-z.-]*?)(?:\.min)?\.js",
    },
    BodySignature {
        name: "Bootstrap",
        categories: &["UI frameworks"],
        pattern: r"bootstrap[/@.-]([0-9][0-9.]*)",
    },
    BodySignature {
        name: "React",
        categories: &["JavaScript frameworks"],
        pattern: r"react(?:[.-]dom)?[.-]([0-9][0-9.]*)",
    },
    BodySignature {
        name: "Google Analytics",
        categories: &["Analytics"],
        pattern: r"google-analytics\.com|googletagmanager\.com/gtag",
    },
];

/// Classify detected technologies with versions and categories.
/// Deterministic given the response headers and body.
pub fn detect_details(headers: &HeaderMap, body: &str) -> BTreeMap<String, TechDetail> {
    let mut details = BTreeMap::new();
    let body_lower = body.to_lowercase();

    if let Some(server) = headers.get("server").and_then(|v| v.to_str().ok()) {
        let mut parts = server.splitn(2, '/');
        let product = parts.next().unwrap_or(server).trim();
        if !product.is_empty() {
            details.insert(
                product.to_string(),
                TechDetail {
                    version: parts.next().map(str::to_string),
                    categories: vec!["Web servers".to_string()],
                },
            );
        }
    }

    if headers.contains_key("cf-ray") {
        details.insert(
            "Cloudflare".to_string(),
            TechDetail {
                version: None,
                categories: vec!["CDN".to_string()],
            },
        );
    }

    // <meta name="generator" content="WordPress 6.4"> and friends.
    let generator =
        Regex::new(r#"(?i)<meta[^>]+name=["']generator["'][^>]+content=["']([^"']+)["']"#)
            .expect("generator pattern is valid");
    if let Some(caps) = generator.captures(body) {
        let content = caps[1].trim();
        let mut parts = content.splitn(2, ' ');
        let name = parts.next().unwrap_or(content);
        details.insert(
            name.to_string(),
            TechDetail {
                version: parts.next().map(str::to_string),
                categories: vec!["CMS".to_string()],
            },
        );
    }

    for signature in BODY_SIGNATURES {
        let regex = Regex::new(signature.pattern).expect("signature pattern is valid");
        if let Some(caps) = regex.captures(&body_lower) {
            details
                .entry(signature.name.to_string())
                .or_insert_with(|| TechDetail {
                    version: caps.get(1).map(|m| m.as_str().to_string()),
                    categories: signature
                        .categories
                        .iter()
                        .map(|c| (*c).to_string())
                        .collect(),
                });
        }
    }

    details
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn detects_generator_meta_with_version() {
        let body = r#"<meta name="generator" content="WordPress 6.4">"#;
        let details = detect_details(&HeaderMap::new(), body);
        let wp = &details["WordPress"];
        assert_eq!(wp.version.as_deref(), Some("6.4"));
        assert_eq!(wp.categories, vec!["CMS"]);
    }

    #[test]
    fn detects_jquery_version_from_script_src() {
        let body = r#"<script src="/js/jquery-3.7.1.min.js"></script>"#;
        let details = detect_details(&HeaderMap::new(), body);
        assert_eq!(details["jQuery"].version.as_deref(), Some("3.7.1"));
    }

    #[test]
    fn detects_server_header_split_into_product_and_version() {
        let mut headers = HeaderMap::new();
        headers.insert("server", HeaderValue::from_static("Apache/2.4.58"));
        let details = detect_details(&headers, "");
        assert_eq!(details["Apache"].version.as_deref(), Some("2.4.58"));
        assert_eq!(details["Apache"].categories, vec!["Web servers"]);
    }
}
