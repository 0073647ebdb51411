//! Column selection and the coerced, date-ordered time series.

use crate::model::Dataset;
use crate::{Error, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The pair of columns the user designated as the time axis and the balance.
///
/// This is a pure name-level check. Whether the values in those columns can
/// actually be coerced is the calculator's concern.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ColumnSelection {
    date_column: String,
    balance_column: String,
}

impl ColumnSelection {
    /// Validates that both names exist in `dataset` and are distinct.
    pub fn resolve(
        dataset: &Dataset,
        date_column: impl Into<String>,
        balance_column: impl Into<String>,
    ) -> Result<Self> {
        let date_column = date_column.into();
        let balance_column = balance_column.into();
        for name in [&date_column, &balance_column] {
            if !dataset.has_column(name) {
                return Err(Error::InvalidSelection(format!(
                    "column '{name}' was not found; available columns are {:?}",
                    dataset.columns()
                )));
            }
        }
        if date_column == balance_column {
            return Err(Error::InvalidSelection(format!(
                "the date and balance columns must be different, both are '{date_column}'"
            )));
        }
        Ok(Self {
            date_column,
            balance_column,
        })
    }

    pub fn date_column(&self) -> &str {
        &self.date_column
    }

    pub fn balance_column(&self) -> &str {
        &self.balance_column
    }
}

/// The selected columns coerced and sorted ascending by date. Construction
/// happens in the calculator; consumers only read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TimeSeries {
    points: Vec<(NaiveDate, Decimal)>,
}

impl TimeSeries {
    /// `points` must already be sorted ascending by date.
    pub(crate) fn new(points: Vec<(NaiveDate, Decimal)>) -> Self {
        debug_assert!(points.windows(2).all(|w| w[0].0 <= w[1].0));
        Self { points }
    }

    pub fn points(&self) -> &[(NaiveDate, Decimal)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The chronologically last observation.
    pub fn latest(&self) -> Option<(NaiveDate, Decimal)> {
        self.points.last().copied()
    }

    /// The last `n` points, used to bound the prompt payload.
    pub fn excerpt(&self, n: usize) -> &[(NaiveDate, Decimal)] {
        let start = self.points.len().saturating_sub(n);
        &self.points[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Cell;

    fn dataset() -> Dataset {
        Dataset::new(
            vec!["Date".to_string(), "Cash Balance".to_string()],
            vec![vec![
                Cell::Text("2025-01-31".to_string()),
                Cell::Text("100000".to_string()),
            ]],
        )
        .unwrap()
    }

    #[test]
    fn test_resolve_ok() {
        let selection = ColumnSelection::resolve(&dataset(), "Date", "Cash Balance").unwrap();
        assert_eq!(selection.date_column(), "Date");
        assert_eq!(selection.balance_column(), "Cash Balance");
    }

    #[test]
    fn test_resolve_missing_column() {
        let result = ColumnSelection::resolve(&dataset(), "Date", "Balance");
        assert!(matches!(result, Err(Error::InvalidSelection(_))));
    }

    #[test]
    fn test_resolve_same_column() {
        let result = ColumnSelection::resolve(&dataset(), "Date", "Date");
        assert!(matches!(result, Err(Error::InvalidSelection(_))));
    }

    #[test]
    fn test_excerpt_bounds() {
        let d = |s: &str| s.parse::<NaiveDate>().unwrap();
        let series = TimeSeries::new(vec![
            (d("2025-01-31"), Decimal::from(3)),
            (d("2025-02-28"), Decimal::from(2)),
            (d("2025-03-31"), Decimal::from(1)),
        ]);
        assert_eq!(series.excerpt(2).len(), 2);
        assert_eq!(series.excerpt(2)[0].0, d("2025-02-28"));
        assert_eq!(series.excerpt(10).len(), 3);
        assert_eq!(series.latest().unwrap().1, Decimal::from(1));
    }
}
