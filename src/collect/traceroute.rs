use crate::collect::TracerouteLookup;
use crate::error::ReconError;
use async_trait::async_trait;
use reqwest::Client;

/// Traceroute via the ipinfo lookup API, keyed by resolved IP.
pub struct IpinfoTraceroute {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl IpinfoTraceroute {
    pub fn new(client: Client, base_url: String, token: Option<String>) -> Self {
        Self {
            client,
            base_url,
            token,
        }
    }
}

#[async_trait]
impl TracerouteLookup for IpinfoTraceroute {
    async fn traceroute(&self, ip: &str) -> Result<String, ReconError> {
        let token = self.token.as_deref().ok_or_else(|| {
            ReconError::Service("traceroute API token not configured".to_string())
        })?;

        let url = format!("{}/{}/traceroute", self.base_url.trim_end_matches('/'), ip);
        let response = self
            .client
            .get(&url)
            .query(&[("token", token)])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ReconError::Transport(format!(
                "traceroute API returned {}: {}",
                status, body
            )));
        }

        Ok(response.text().await?)
    }
}
