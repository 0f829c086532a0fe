use serde::{Deserialize, Serialize};
use std::{env, path::PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub narrative: NarrativeConfig,
    pub recon: ReconConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrativeConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: String,
    pub max_tokens: usize,
    pub temperature: f32,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconConfig {
    /// Bound on every external call so one collector cannot hang a run.
    pub timeout_seconds: u64,
    pub user_agent: String,
    pub rdap_base_url: String,
    pub traceroute_base_url: String,
    pub traceroute_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            narrative: NarrativeConfig {
                api_key: None,
                base_url: None,
                model: "gpt-4o-mini".to_string(),
                max_tokens: 500,
                temperature: 0.7,
                timeout_seconds: 60,
            },
            recon: ReconConfig {
                timeout_seconds: 15,
                user_agent: format!("webscope/{}", env!("CARGO_PKG_VERSION")),
                rdap_base_url: "https://rdap.org".to_string(),
                traceroute_base_url: "https://api.ipinfo.io".to_string(),
                traceroute_token: None,
            },
        }
    }
}

impl Config {
    /// Get the default config file path (~/.webscope.toml)
    pub fn default_config_path() -> crate::Result<PathBuf> {
        let home_dir = env::var("HOME")
            .or_else(|_| env::var("USERPROFILE"))
            .map_err(|_| anyhow::anyhow!("Could not determine home directory"))?;
        Ok(PathBuf::from(home_dir).join(".webscope.toml"))
    }

    /// Load config from file, falling back to defaults if file doesn't exist
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::default_config_path()?;

        let mut config = if config_path.exists() {
            Self::from_file(&config_path)?
        } else {
            Self::default()
        };

        config.apply_env_credentials();
        Ok(config)
    }

    /// Load config from a specific file path
    pub fn from_file(path: &PathBuf) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.apply_env_credentials();
        Ok(config)
    }

    /// Credentials come from the environment when the file leaves them
    /// unset; they are never written back to disk.
    fn apply_env_credentials(&mut self) {
        if self.narrative.api_key.is_none() {
            self.narrative.api_key = env::var("OPENAI_API_KEY").ok();
        }
        if self.recon.traceroute_token.is_none() {
            self.recon.traceroute_token = env::var("IPINFO_TOKEN").ok();
        }
    }

    /// Save config to a file
    pub fn to_file(&self, path: &PathBuf) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Create a config file with all available options documented
    pub fn create_documented_config() -> String {
        r#"# webscope Configuration File
# This file configures how webscope investigates a target website

[narrative]
# API key for the narrative service (or set OPENAI_API_KEY)
# api_key = "your-api-key-here"

# Base URL override for OpenAI-compatible endpoints
# base_url = "https://api.openai.com"

# Model used to generate the site description
model = "gpt-4o-mini"

# Maximum tokens for the generated narrative
max_tokens = 500

# Sampling temperature; non-zero on purpose, the narrative is allowed
# stylistic variance between runs
temperature = 0.7

# Request timeout in seconds for the narrative call
timeout_seconds = 60

[recon]
# Timeout in seconds applied to every collector call
timeout_seconds = 15

# User-Agent sent with HTTP probes
user_agent = "webscope/0.1.0"

# RDAP registry endpoint for IP ownership lookups
rdap_base_url = "https://rdap.org"

# Traceroute lookup API endpoint and token (or set IPINFO_TOKEN)
traceroute_base_url = "https://api.ipinfo.io"
# traceroute_token = "your-token-here"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_config_parses_back() {
        let config: Config = toml::from_str(&Config::create_documented_config()).unwrap();
        assert_eq!(config.recon.timeout_seconds, 15);
        assert_eq!(config.narrative.max_tokens, 500);
        assert!(config.narrative.api_key.is_none());
    }
}
