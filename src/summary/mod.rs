//! Prompt construction and the text-generation seam.
//!
//! The prompt is a deterministic template over the computed figures and a
//! bounded excerpt of the series, so golden-file tests can assert on the
//! exact bytes. The network call itself sits behind the [`Generator`] trait
//! with a real HTTP implementation and an in-memory test implementation.

mod openai;
mod test_client;

use crate::analyze::BurnRunway;
use crate::model::TimeSeries;
use crate::{Config, Result};
use std::fmt::Write;

pub use openai::OpenAiGenerator;
pub use test_client::TestGenerator;

/// Fixed system-role instruction sent with every generation request.
pub const SYSTEM_PROMPT: &str = "You are a helpful financial assistant.";

/// Builds the generation prompt from the figures and the last
/// `excerpt_rows` observations. Byte-identical output for identical inputs.
pub fn build_prompt(result: &BurnRunway, series: &TimeSeries, excerpt_rows: usize) -> String {
    let mut prompt = String::from("Analyze the following cash balance data with dates:\n\n");
    for (date, balance) in series.excerpt(excerpt_rows) {
        let _ = writeln!(prompt, "{date}: {}", balance.normalize());
    }
    let _ = writeln!(prompt, "\nFigures computed from the series:");
    let _ = writeln!(
        prompt,
        "- Average change in cash balance: {} per period",
        result.average_delta().normalize()
    );
    let _ = writeln!(
        prompt,
        "- Burn rate: {} per period",
        result.burn_rate().normalize()
    );
    let _ = writeln!(
        prompt,
        "- Latest cash balance: {}",
        result.latest_balance().normalize()
    );
    let _ = writeln!(prompt, "- Estimated runway: {}", result.runway());
    prompt.push_str(
        "\nPlease provide a concise financial summary including burn rate and runway insights.\n",
    );
    prompt
}

/// The text-generation collaborator. One synchronous (from the caller's
/// point of view) request with a bounded timeout; any failure is the
/// recoverable `SummaryUnavailable`.
#[async_trait::async_trait]
pub trait Generator {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Selects the real or the in-memory generator.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Mode {
    /// Call the chat-completion API over HTTP.
    Live,
    /// Use the in-memory [`TestGenerator`]; no network.
    Test,
}

impl Mode {
    /// When `BURNRATE_IN_TEST_MODE` is set and non-zero in length the mode is
    /// `Mode::Test`, otherwise `Mode::Live`. This allows running the whole
    /// program, top to bottom, without a network or an API key.
    pub fn from_env() -> Self {
        match std::env::var("BURNRATE_IN_TEST_MODE") {
            Ok(value) if !value.is_empty() => Mode::Test,
            _ => Mode::Live,
        }
    }
}

/// Creates the generator for `mode`. In live mode this fails with
/// `SummaryUnavailable` when no API key is configured.
pub fn generator(config: &Config, mode: Mode) -> Result<Box<dyn Generator + Send + Sync>> {
    match mode {
        Mode::Live => Ok(Box::new(OpenAiGenerator::new(config)?)),
        Mode::Test => Ok(Box::new(TestGenerator::default())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::{analyze, Analysis, AnalysisOptions};
    use crate::model::{Cell, ColumnSelection, Dataset};

    fn sample_analysis() -> Analysis {
        let balances = ["100000", "85000", "70000", "55000", "40000", "25000"];
        let dates = [
            "2025-01-31",
            "2025-02-28",
            "2025-03-31",
            "2025-04-30",
            "2025-05-31",
            "2025-06-30",
        ];
        let rows = dates
            .iter()
            .zip(balances.iter())
            .map(|(d, b)| vec![Cell::Text(d.to_string()), Cell::Text(b.to_string())])
            .collect();
        let dataset = Dataset::new(
            vec!["Date".to_string(), "Cash Balance".to_string()],
            rows,
        )
        .unwrap();
        let selection = ColumnSelection::resolve(&dataset, "Date", "Cash Balance").unwrap();
        analyze(&dataset, &selection, AnalysisOptions::default()).unwrap()
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let analysis = sample_analysis();
        let a = build_prompt(analysis.result(), analysis.series(), 10);
        let b = build_prompt(analysis.result(), analysis.series(), 10);
        assert_eq!(a, b);
    }

    #[test]
    fn test_prompt_golden() {
        let analysis = sample_analysis();
        let prompt = build_prompt(analysis.result(), analysis.series(), 3);
        let expected = "\
Analyze the following cash balance data with dates:

2025-04-30: 55000
2025-05-31: 40000
2025-06-30: 25000

Figures computed from the series:
- Average change in cash balance: -15000 per period
- Burn rate: 15000 per period
- Latest cash balance: 25000
- Estimated runway: 1.7 periods

Please provide a concise financial summary including burn rate and runway insights.
";
        assert_eq!(prompt, expected);
    }

    #[test]
    fn test_excerpt_is_bounded() {
        let analysis = sample_analysis();
        let prompt = build_prompt(analysis.result(), analysis.series(), 2);
        assert!(!prompt.contains("2025-01-31"));
        assert!(prompt.contains("2025-05-31"));
        assert!(prompt.contains("2025-06-30"));
    }

    #[tokio::test]
    async fn test_mode_test_generator_needs_no_key() {
        let config = Config::default();
        assert!(!config.summary_enabled());
        let generator = generator(&config, Mode::Test).unwrap();
        let text = generator.generate("prompt").await.unwrap();
        assert!(!text.is_empty());
    }

    #[test]
    fn test_mode_live_without_key_is_summary_unavailable() {
        let config = Config::default();
        let result = generator(&config, Mode::Live);
        assert!(matches!(
            result,
            Err(crate::Error::SummaryUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_generation_leaves_result_intact() {
        let analysis = sample_analysis();
        let prompt = build_prompt(analysis.result(), analysis.series(), 10);
        let generator = TestGenerator::failing();
        let outcome = generator.generate(&prompt).await;
        assert!(outcome.is_err());
        // The figures are untouched and still displayable.
        assert_eq!(
            analysis.result().burn_rate(),
            rust_decimal::Decimal::from(15000)
        );
    }
}
