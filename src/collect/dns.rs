use crate::collect::DnsLookup;
use crate::error::ReconError;
use async_trait::async_trait;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

/// DNS records via the local `dig` binary (`nslookup` on Windows).
pub struct DigCommand {
    timeout: Duration,
}

impl DigCommand {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn tool() -> &'static str {
        if cfg!(windows) {
            "nslookup"
        } else {
            "dig"
        }
    }
}

#[async_trait]
impl DnsLookup for DigCommand {
    async fn lookup(&self, domain: &str) -> Result<String, ReconError> {
        let tool = Self::tool();
        let output = timeout(self.timeout, Command::new(tool).arg(domain).output())
            .await
            .map_err(|_| ReconError::Transport(format!("{} timed out for {}", tool, domain)))?
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ReconError::ToolNotFound(tool.to_string())
                } else {
                    ReconError::Transport(e.to_string())
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ReconError::Transport(format!(
                "{} exited with {}: {}",
                tool,
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
