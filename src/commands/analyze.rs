//! The `analyze` command: the full pipeline over one uploaded file.
//!
//! Load → resolve columns → calculate → project the chart, and on request
//! ask the text-generation collaborator for a prose summary. A failed
//! summary call degrades to a warning; the numeric output always survives.

use crate::analyze::{AnalysisOptions, AveragePolicy, BurnRunway, DateCoercion};
use crate::args::AnalyzeArgs;
use crate::chart::{self, ChartPoint};
use crate::commands::Out;
use crate::load::{FormatHint, Workbook};
use crate::model::{ColumnSelection, PREVIEW_ROWS};
use crate::summary::{self, build_prompt};
use crate::{Config, Error, Mode};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt::Write;
use tracing::{debug, warn};

/// Structured output of the `analyze` command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AnalysisReport {
    result: BurnRunway,
    points: Vec<ChartPoint>,
    summary: Option<String>,
}

impl AnalysisReport {
    pub fn result(&self) -> &BurnRunway {
        &self.result
    }

    pub fn points(&self) -> &[ChartPoint] {
        &self.points
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }
}

pub async fn analyze(config: Config, mode: Mode, args: AnalyzeArgs) -> Result<Out<AnalysisReport>> {
    let hint = FormatHint::from_path(args.file())?;
    let bytes = tokio::fs::read(args.file())
        .await
        .with_context(|| format!("Unable to read '{}'", args.file().display()))?;
    let mut workbook = Workbook::open(bytes, hint)?;
    let sheet = pick_sheet(&workbook, args.sheet())?;

    let dataset = workbook.dataset(&sheet)?;
    debug!(
        "Loaded {} rows from sheet '{sheet}':\n{}",
        dataset.len(),
        dataset.preview(PREVIEW_ROWS)
    );

    let selection = ColumnSelection::resolve(&dataset, args.date_column(), args.balance_column())?;
    let options = AnalysisOptions {
        coercion: if args.strict_dates() {
            DateCoercion::Strict
        } else {
            DateCoercion::Lenient
        },
        averaging: match args.window() {
            Some(k) => AveragePolicy::TrailingWindow(k),
            None => AveragePolicy::FullHistory,
        },
    };
    let analysis = crate::analyze::analyze(&dataset, &selection, options)?;
    let points = chart::project(analysis.series());

    // The summary is on demand and never fatal: a failure leaves the
    // computed figures fully usable.
    let summary = if args.summary() {
        let prompt = build_prompt(analysis.result(), analysis.series(), config.excerpt_rows());
        let generated = match summary::generator(&config, mode) {
            Ok(generator) => generator.generate(&prompt).await,
            Err(e) => Err(e),
        };
        match generated {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("{e}");
                None
            }
        }
    } else {
        None
    };

    let result = analysis.result().clone();
    let message = render_message(&args, &points, &result, summary.as_deref());
    Ok(Out::new(
        message,
        AnalysisReport {
            result,
            points,
            summary,
        },
    ))
}

/// A spreadsheet with several sheets needs an explicit choice; a single
/// sheet (or a CSV) is unambiguous.
fn pick_sheet(workbook: &Workbook, requested: Option<&str>) -> crate::Result<String> {
    let names = workbook.sheet_names();
    match requested {
        Some(name) if names.iter().any(|n| n == name) => Ok(name.to_string()),
        Some(name) => Err(Error::Load(format!(
            "sheet '{name}' was not found; available sheets are {names:?}"
        ))),
        None if names.len() == 1 => Ok(names[0].clone()),
        None => Err(Error::Load(format!(
            "the workbook contains {} sheets; pass --sheet to choose one of {names:?}",
            names.len()
        ))),
    }
}

fn render_message(
    args: &AnalyzeArgs,
    points: &[ChartPoint],
    result: &BurnRunway,
    summary: Option<&str>,
) -> String {
    let mut message = format!(
        "Cash balance over time from '{}':\n\n",
        args.file().display()
    );
    message.push_str(&chart::render_table(
        points,
        args.date_column(),
        args.balance_column(),
    ));
    let _ = writeln!(
        message,
        "\nAverage change in cash balance: {} per period",
        result.average_delta().normalize()
    );
    let _ = writeln!(
        message,
        "Average burn rate: {} per period ({})",
        result.burn_rate().normalize(),
        result.policy()
    );
    let _ = writeln!(message, "Estimated runway: {}", result.runway());
    if let Some(text) = summary {
        let _ = writeln!(message, "\nAI summary:\n{text}");
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::Runway;
    use rust_decimal::Decimal;
    use std::num::NonZeroUsize;

    const CSV: &str = "\
Date,Cash Balance
2025-01-31,100000
2025-02-28,85000
2025-03-31,70000
2025-04-30,55000
2025-05-31,40000
2025-06-30,25000
";

    fn write_csv(dir: &tempfile::TempDir) -> std::path::PathBuf {
        let path = dir.path().join("plan.csv");
        std::fs::write(&path, CSV).unwrap();
        path
    }

    #[tokio::test]
    async fn test_analyze_csv_end_to_end() {
        let dir = tempfile::TempDir::new().unwrap();
        let args = AnalyzeArgs::new(write_csv(&dir));
        let out = analyze(Config::default(), Mode::Test, args).await.unwrap();
        let report = out.structure().unwrap();
        assert_eq!(report.result().burn_rate(), Decimal::from(15000));
        assert_eq!(report.points().len(), 6);
        assert!(report.summary().is_none());
        assert!(out.message().contains("Estimated runway: 1.7 periods"));
    }

    #[tokio::test]
    async fn test_analyze_with_summary_in_test_mode() {
        let dir = tempfile::TempDir::new().unwrap();
        let args = AnalyzeArgs::new(write_csv(&dir)).with_summary();
        let out = analyze(Config::default(), Mode::Test, args).await.unwrap();
        let report = out.structure().unwrap();
        assert!(report.summary().is_some());
        assert!(out.message().contains("AI summary:"));
    }

    #[tokio::test]
    async fn test_summary_failure_keeps_figures() {
        // Live mode with no API key: the generation step fails, the numeric
        // result is still returned.
        let dir = tempfile::TempDir::new().unwrap();
        let args = AnalyzeArgs::new(write_csv(&dir)).with_summary();
        let out = analyze(Config::default(), Mode::Live, args).await.unwrap();
        let report = out.structure().unwrap();
        assert!(report.summary().is_none());
        assert_eq!(report.result().burn_rate(), Decimal::from(15000));
        assert_eq!(
            report.result().runway(),
            Runway::Periods(Decimal::from(25000) / Decimal::from(15000))
        );
    }

    #[tokio::test]
    async fn test_trailing_window_flag() {
        let dir = tempfile::TempDir::new().unwrap();
        let csv = "\
Date,Cash Balance
2025-01-31,100000
2025-02-28,99000
2025-03-31,89000
2025-04-30,79000
2025-05-31,69000
";
        let path = dir.path().join("plan.csv");
        std::fs::write(&path, csv).unwrap();
        let args = AnalyzeArgs::new(&path).with_window(NonZeroUsize::new(3).unwrap());
        let out = analyze(Config::default(), Mode::Test, args).await.unwrap();
        assert_eq!(
            out.structure().unwrap().result().burn_rate(),
            Decimal::from(10000)
        );
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let args = AnalyzeArgs::new("/no/such/file.csv");
        let result = analyze(Config::default(), Mode::Test, args).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_bad_column_selection_is_reported() {
        let dir = tempfile::TempDir::new().unwrap();
        let args = AnalyzeArgs::new(write_csv(&dir)).with_columns("Date", "Balance");
        let result = analyze(Config::default(), Mode::Test, args).await;
        let error = result.unwrap_err();
        assert!(matches!(
            error.downcast_ref::<Error>(),
            Some(Error::InvalidSelection(_))
        ));
    }
}
