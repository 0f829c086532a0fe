use crate::collect::Resolve;
use crate::error::ReconError;
use async_trait::async_trait;
use std::time::Duration;
use tokio::net::lookup_host;
use tokio::time::timeout;

/// Resolves domains through the operating system resolver.
pub struct SystemResolver {
    timeout: Duration,
}

impl SystemResolver {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl Resolve for SystemResolver {
    async fn resolve(&self, domain: &str) -> Result<String, ReconError> {
        // lookup_host needs a port; it is discarded from the result.
        let lookup = timeout(self.timeout, lookup_host((domain, 443)))
            .await
            .map_err(|_| ReconError::Resolution(format!("{}: resolution timed out", domain)))?
            .map_err(|e| ReconError::Resolution(format!("{}: {}", domain, e)))?;

        lookup
            .map(|addr| addr.ip().to_string())
            .next()
            .ok_or_else(|| ReconError::Resolution(format!("{}: no addresses returned", domain)))
    }
}
