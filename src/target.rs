use crate::error::ReconError;
use reqwest::Url;

/// Normalized investigation target: the full URL handed to HTTP-oriented
/// collectors and the bare hostname handed to DNS/IP-oriented ones.
#[derive(Debug, Clone)]
pub struct Target {
    url: Url,
    host: String,
}

impl Target {
    /// Parse and normalize operator input, defaulting to `https://` when the
    /// input carries no scheme.
    pub fn parse(input: &str) -> Result<Self, ReconError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ReconError::InvalidTarget(
                "target domain must not be empty".to_string(),
            ));
        }

        let with_scheme = if trimmed.contains("://") {
            trimmed.to_string()
        } else {
            format!("https://{}", trimmed)
        };

        let url = Url::parse(&with_scheme)
            .map_err(|e| ReconError::InvalidTarget(format!("{}: {}", trimmed, e)))?;

        let host = url
            .host_str()
            .ok_or_else(|| {
                ReconError::InvalidTarget(format!("no hostname in target: {}", trimmed))
            })?
            .to_string();

        Ok(Self { url, host })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn host(&self) -> &str {
        &self.host
    }
}
