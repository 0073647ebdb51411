//! Implements the `Generator` trait against the OpenAI chat-completions API.

use crate::config::API_KEY_VAR;
use crate::summary::{Generator, SYSTEM_PROMPT};
use crate::{Config, Error, Result};
use tracing::trace;

const ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Sends the prompt to the chat-completions endpoint with the configured
/// model, temperature and token cap. Every transport, HTTP or payload-shape
/// failure maps to the recoverable `SummaryUnavailable`.
pub struct OpenAiGenerator {
    client: reqwest::Client,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiGenerator {
    pub fn new(config: &Config) -> Result<Self> {
        let api_key = config
            .api_key()
            .ok_or_else(|| {
                Error::SummaryUnavailable(format!(
                    "{API_KEY_VAR} is not set; the summary feature is disabled"
                ))
            })?
            .to_string();
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::SummaryUnavailable(format!("unable to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_key,
            model: config.model().to_string(),
            temperature: config.temperature(),
            max_tokens: config.max_tokens(),
        })
    }
}

#[async_trait::async_trait]
impl Generator for OpenAiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        trace!("requesting summary from model {}", self.model);
        let response = self
            .client
            .post(ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "model": self.model,
                "messages": [
                    { "role": "system", "content": SYSTEM_PROMPT },
                    { "role": "user", "content": prompt },
                ],
                "temperature": self.temperature,
                "max_tokens": self.max_tokens,
            }))
            .send()
            .await
            .map_err(|e| Error::SummaryUnavailable(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read response body".to_string());
            return Err(Error::SummaryUnavailable(format!(
                "the API returned status {status}: {body}"
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::SummaryUnavailable(format!("unreadable response: {e}")))?;
        let text = body
            .pointer("/choices/0/message/content")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                Error::SummaryUnavailable("the response contains no message content".to_string())
            })?;
        Ok(text.trim().to_string())
    }
}
