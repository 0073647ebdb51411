//! Implements the `Generator` trait using canned in-memory responses.
//!
//! Note: this is compiled even in the "production" version of this app so
//! that the whole flow can be exercised, top to bottom, without a network
//! connection or an API key (see `Mode::from_env`).

use crate::summary::Generator;
use crate::{Error, Result};

const CANNED_REPLY: &str = "The company is consuming cash at a steady rate. \
At the current burn the remaining balance covers a limited number of periods; \
consider reducing spend or raising funds before the runway is exhausted.";

/// A `Generator` that never touches the network. By default it returns a
/// fixed reply; `failing()` simulates an unavailable service.
pub struct TestGenerator {
    reply: std::result::Result<String, String>,
}

impl Default for TestGenerator {
    fn default() -> Self {
        Self {
            reply: Ok(CANNED_REPLY.to_string()),
        }
    }
}

impl TestGenerator {
    /// A generator that returns `reply` for every prompt.
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self {
            reply: Ok(reply.into()),
        }
    }

    /// A generator whose every call fails, for exercising degradation paths.
    pub fn failing() -> Self {
        Self {
            reply: Err("simulated generation failure".to_string()),
        }
    }
}

#[async_trait::async_trait]
impl Generator for TestGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        self.reply.clone().map_err(Error::SummaryUnavailable)
    }
}
