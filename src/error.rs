//! The error taxonomy for the analysis pipeline.
//!
//! Every variant here is recoverable: the caller can re-upload a file, pick
//! different columns, or fix the data. Commands wrap these in `anyhow` at the
//! boundary where context about the user's input is added.

use thiserror::Error;

/// Result alias used throughout the library core.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The uploaded bytes are not a well-formed instance of the declared
    /// format, or the format could not be determined.
    #[error("unable to load tabular data: {0}")]
    Load(String),

    /// A selected column name is missing from the dataset, or the date and
    /// balance columns are the same.
    #[error("invalid column selection: {0}")]
    InvalidSelection(String),

    /// A selected column could not be coerced. Under the lenient policy
    /// this means every row's date failed; under the strict policy, any
    /// failed date or balance cell.
    #[error("could not coerce column '{column}': {detail}")]
    DateParse { column: String, detail: String },

    /// Fewer than two usable rows remain, so no delta can be computed.
    #[error("at least two usable rows are required, found {found}")]
    InsufficientData { found: usize },

    /// The text-generation call failed or the feature is disabled. The
    /// numeric results remain valid and displayable.
    #[error("summary unavailable: {0}")]
    SummaryUnavailable(String),
}
