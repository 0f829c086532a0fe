use crate::config::NarrativeConfig;
use crate::error::ReconError;
use crate::report::Report;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Generates a prose site description from an assembled report.
#[async_trait]
pub trait NarrativeService: Send + Sync {
    async fn summarize(&self, report: &Report) -> Result<String, ReconError>;
}

/// OpenAI-compatible chat completion backend for the narrative.
pub struct OpenAiNarrative {
    config: NarrativeConfig,
    client: Client,
}

impl OpenAiNarrative {
    pub fn new(config: NarrativeConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .unwrap();

        Self { config, client }
    }

    fn endpoint(&self) -> String {
        let base = self
            .config
            .base_url
            .as_deref()
            .unwrap_or("https://api.openai.com");
        format!("{}/v1/chat/completions", base.trim_end_matches('/'))
    }
}

const SYSTEM_PERSONA: &str = "You are a well-experienced cloud and web developer \
with expertise in software architectures and cloud computing.";

#[async_trait]
impl NarrativeService for OpenAiNarrative {
    async fn summarize(&self, report: &Report) -> Result<String, ReconError> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or_else(|| ReconError::Service("narrative API key not provided".to_string()))?;

        let prompt = format!(
            "Analyze the following website report and provide a detailed description \
             about the site's nature, infrastructure, and tech stack. Highlight any \
             important details:\n\n{}",
            report.canonical_text()
        );

        let payload = serde_json::json!({
            "model": self.config.model,
            "messages": [
                {
                    "role": "system",
                    "content": SYSTEM_PERSONA
                },
                {
                    "role": "user",
                    "content": prompt
                }
            ],
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature
        });

        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(ReconError::RateLimit);
        }
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ReconError::Service(format!("{}: {}", status, error_text)));
        }

        let response_json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ReconError::Parse(e.to_string()))?;

        let content = response_json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                ReconError::Parse("missing message content in completion response".to_string())
            })?;

        Ok(content.trim().to_string())
    }
}

/// Human-readable stand-in for a failed summarization, embedded as the site
/// description so a failed narrative never blocks export.
pub fn degraded_message(err: &ReconError) -> String {
    match err {
        ReconError::RateLimit => "Error: Rate limit exceeded. Please try again later.".to_string(),
        e => format!("Error: could not generate site description. Details: {}", e),
    }
}
