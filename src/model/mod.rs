//! Types that represent the core data model, such as `Dataset` and `Amount`.
mod amount;
mod dataset;
mod series;

pub use amount::{Amount, AmountError};
pub use dataset::{Cell, Dataset, PREVIEW_ROWS};
pub use series::{ColumnSelection, TimeSeries};
