//! These structs provide the CLI interface for the burnrate CLI.

use crate::sample::SAMPLE_FILE_NAME;
use clap::{Parser, Subcommand};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tracing_subscriber::filter::LevelFilter;

/// burnrate: analyze cash burn rate and runway from spreadsheet data.
///
/// Point the program at an Excel or CSV export of dated cash balance
/// observations. It sorts the rows chronologically, averages the
/// period-over-period changes in the balance, and reports the burn rate and
/// how many periods the latest balance can sustain it. With --summary and an
/// OPENAI_API_KEY in the environment it also asks a chat-completion model
/// for a short prose summary of the figures.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Compute the burn rate and runway from a spreadsheet or CSV file.
    Analyze(AnalyzeArgs),
    /// List the sheet names contained in a spreadsheet file.
    Sheets(SheetsArgs),
    /// Write the sample dataset as an .xlsx file showing the expected shape.
    Sample(SampleArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// none, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,
}

impl Common {
    pub fn new(log_level: LevelFilter) -> Self {
        Self { log_level }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }
}

/// Args for the `burnrate analyze` command.
#[derive(Debug, Parser, Clone)]
pub struct AnalyzeArgs {
    /// Path to the .xlsx, .xls or .csv file to analyze.
    file: PathBuf,

    /// The sheet to analyze. Required only when the workbook contains more
    /// than one sheet; ignored for CSV input.
    #[arg(long)]
    sheet: Option<String>,

    /// Name of the column holding the observation dates.
    #[arg(long, default_value = "Date")]
    date_column: String,

    /// Name of the column holding the cash balance.
    #[arg(long, default_value = "Cash Balance")]
    balance_column: String,

    /// Average only the most recent N period-over-period changes instead of
    /// the whole history.
    #[arg(long)]
    window: Option<NonZeroUsize>,

    /// Fail on the first row whose date cannot be parsed, instead of
    /// dropping such rows.
    #[arg(long)]
    strict_dates: bool,

    /// Ask the configured AI model for a prose summary of the figures.
    /// Requires OPENAI_API_KEY in the environment.
    #[arg(long)]
    summary: bool,
}

impl AnalyzeArgs {
    /// Defaults matching the sample dataset's headers.
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            sheet: None,
            date_column: "Date".to_string(),
            balance_column: "Cash Balance".to_string(),
            window: None,
            strict_dates: false,
            summary: false,
        }
    }

    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }

    pub fn with_columns(
        mut self,
        date_column: impl Into<String>,
        balance_column: impl Into<String>,
    ) -> Self {
        self.date_column = date_column.into();
        self.balance_column = balance_column.into();
        self
    }

    pub fn with_window(mut self, window: NonZeroUsize) -> Self {
        self.window = Some(window);
        self
    }

    pub fn with_summary(mut self) -> Self {
        self.summary = true;
        self
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn sheet(&self) -> Option<&str> {
        self.sheet.as_deref()
    }

    pub fn date_column(&self) -> &str {
        &self.date_column
    }

    pub fn balance_column(&self) -> &str {
        &self.balance_column
    }

    pub fn window(&self) -> Option<NonZeroUsize> {
        self.window
    }

    pub fn strict_dates(&self) -> bool {
        self.strict_dates
    }

    pub fn summary(&self) -> bool {
        self.summary
    }
}

/// Args for the `burnrate sheets` command.
#[derive(Debug, Parser, Clone)]
pub struct SheetsArgs {
    /// Path to the .xlsx, .xls or .csv file to inspect.
    file: PathBuf,
}

impl SheetsArgs {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self { file: file.into() }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }
}

/// Args for the `burnrate sample` command.
#[derive(Debug, Parser, Clone)]
pub struct SampleArgs {
    /// Where to write the sample .xlsx file.
    #[arg(long, default_value = SAMPLE_FILE_NAME)]
    output: PathBuf,
}

impl SampleArgs {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
        }
    }

    pub fn output(&self) -> &Path {
        &self.output
    }
}
