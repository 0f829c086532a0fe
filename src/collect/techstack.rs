use crate::collect::TechFingerprint;
use crate::error::ReconError;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::Client;
use std::collections::{HashMap, HashSet};

/// Technology categories detected from one GET against the live site,
/// builtwith-style: header values plus body markers.
pub struct BuiltWithProbe {
    client: Client,
}

impl BuiltWithProbe {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TechFingerprint for BuiltWithProbe {
    async fn fingerprint(&self, url: &str) -> Result<HashMap<String, HashSet<String>>, ReconError> {
        let response = self.client.get(url).send().await?;
        let headers = response.headers().clone();
        let body = response.text().await?;
        Ok(detect_stack(&headers, &body))
    }
}

// (category, technology, body marker) for markers detectable in page source.
const BODY_SIGNATURES: &[(&str, &str, &str)] = &[
    ("cms", "WordPress", "wp-content"),
    ("cms", "Drupal", "drupal"),
    ("cms", "Joomla", "joomla"),
    ("javascript-frameworks", "React", "react"),
    ("javascript-frameworks", "Angular", "ng-app"),
    ("javascript-frameworks", "Vue.js", "vue.js"),
    ("javascript-libraries", "jQuery", "jquery"),
    ("web-frameworks", "Laravel", "laravel"),
    ("web-frameworks", "Django", "csrfmiddlewaretoken"),
    ("analytics", "Google Analytics", "google-analytics.com"),
    ("analytics", "Google Tag Manager", "googletagmanager.com"),
    ("font-scripts", "Google Font API", "fonts.googleapis.com"),
];

/// Classify a page into technology categories. Deterministic given the
/// response headers and body.
pub fn detect_stack(headers: &HeaderMap, body: &str) -> HashMap<String, HashSet<String>> {
    let mut stack: HashMap<String, HashSet<String>> = HashMap::new();
    let mut record = |category: &str, item: String| {
        stack.entry(category.to_string()).or_default().insert(item);
    };

    if let Some(server) = headers.get("server").and_then(|v| v.to_str().ok()) {
        // "nginx/1.25.3" and plain "nginx" both report as the product name.
        let product = server.split('/').next().unwrap_or(server).trim();
        if !product.is_empty() {
            record("web-servers", product.to_string());
        }
    }

    if let Some(powered) = headers.get("x-powered-by").and_then(|v| v.to_str().ok()) {
        record("programming-languages", powered.to_string());
    }

    let body_lower = body.to_lowercase();
    for (category, tech, marker) in BODY_SIGNATURES {
        if body_lower.contains(marker) {
            record(category, (*tech).to_string());
        }
    }

    stack
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn detects_server_product_without_version() {
        let mut headers = HeaderMap::new();
        headers.insert("server", HeaderValue::from_static("nginx/1.25.3"));
        let stack = detect_stack(&headers, "");
        assert!(stack["web-servers"].contains("nginx"));
    }

    #[test]
    fn detects_body_markers_case_insensitively() {
        let body = r#"<link href="/WP-CONTENT/themes/a.css"><script src="jquery.min.js">"#;
        let stack = detect_stack(&HeaderMap::new(), body);
        assert!(stack["cms"].contains("WordPress"));
        assert!(stack["javascript-libraries"].contains("jQuery"));
    }

    #[test]
    fn empty_page_yields_empty_stack() {
        assert!(detect_stack(&HeaderMap::new(), "").is_empty());
    }
}
