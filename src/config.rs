//! Configuration for the analyzer, including the text-generation settings.
//!
//! The OpenAI API key is read once from the environment when the `Config` is
//! constructed and carried as an explicit value from then on. Nothing else in
//! the program touches the environment for credentials, so the loader and the
//! calculator stay testable without any key present.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable holding the chat-completion API key.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TEMPERATURE: f32 = 0.5;
const DEFAULT_MAX_TOKENS: u32 = 300;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_EXCERPT_ROWS: usize = 10;

/// Runtime configuration. Construct with [`Config::from_env`] (which reads
/// the API key exactly once) or [`Config::default`] for a keyless config in
/// which the summary feature is disabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Chat-completion API key. `None` disables the summary feature; the
    /// numeric pipeline is unaffected.
    api_key: Option<String>,

    /// Model identifier sent with each generation request.
    model: String,

    /// Sampling temperature for generation.
    temperature: f32,

    /// Upper bound on generated tokens.
    max_tokens: u32,

    /// Timeout applied to the generation HTTP call.
    timeout_secs: u64,

    /// How many trailing rows of the time series are embedded in the prompt.
    excerpt_rows: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            excerpt_rows: DEFAULT_EXCERPT_ROWS,
        }
    }
}

impl Config {
    /// Creates a config with defaults, reading `OPENAI_API_KEY` from the
    /// environment. An empty value is treated the same as an absent one.
    pub fn from_env() -> Self {
        let api_key = std::env::var(API_KEY_VAR)
            .ok()
            .filter(|k| !k.trim().is_empty());
        Self {
            api_key,
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_excerpt_rows(mut self, excerpt_rows: usize) -> Self {
        self.excerpt_rows = excerpt_rows;
        self
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// True when a key is present and the summary feature can run.
    pub fn summary_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn excerpt_rows(&self) -> usize {
        self.excerpt_rows
    }
}
