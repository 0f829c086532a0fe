use crate::collect::HeaderFetch;
use crate::error::ReconError;
use crate::report::Infrastructure;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::Client;

/// Infrastructure hints from a single GET against the target URL.
pub struct HeaderProbe {
    client: Client,
}

impl HeaderProbe {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HeaderFetch for HeaderProbe {
    async fn fetch(&self, url: &str) -> Result<Infrastructure, ReconError> {
        let response = self.client.get(url).send().await?;
        Ok(classify_headers(response.headers()))
    }
}

/// Classify response headers into the fixed infrastructure vocabulary.
/// Pure and deterministic; only the subset present is emitted.
pub fn classify_headers(headers: &HeaderMap) -> Infrastructure {
    let text = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    Infrastructure {
        server: text("server"),
        cache: text("x-cache"),
        via: text("via"),
        cloudflare: headers.contains_key("cf-ray") || headers.contains_key("cf-cache-status"),
        cloudfront: headers.contains_key("x-amz-cf-id") || headers.contains_key("x-amz-cf-pop"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderName, HeaderValue};

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(
                name.parse::<HeaderName>().unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        map
    }

    #[test]
    fn classifies_nginx_behind_cloudflare() {
        let infra = classify_headers(&headers(&[("server", "nginx"), ("cf-ray", "abc")]));
        assert_eq!(infra.server.as_deref(), Some("nginx"));
        assert!(infra.cloudflare);
        assert!(infra.cache.is_none());
        assert!(infra.via.is_none());
        assert!(!infra.cloudfront);
    }

    #[test]
    fn classifies_cloudfront_markers() {
        let infra = classify_headers(&headers(&[
            ("x-amz-cf-pop", "IAD89-C1"),
            ("x-cache", "Hit from cloudfront"),
            ("via", "1.1 abc.cloudfront.net (CloudFront)"),
        ]));
        assert!(infra.cloudfront);
        assert_eq!(infra.cache.as_deref(), Some("Hit from cloudfront"));
        assert!(infra.via.is_some());
        assert!(!infra.cloudflare);
    }

    #[test]
    fn empty_headers_yield_empty_classification() {
        let infra = classify_headers(&HeaderMap::new());
        assert!(infra.is_empty());
    }
}
