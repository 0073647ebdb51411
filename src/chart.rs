//! Projects the time series into the shape a line-chart surface consumes.
//!
//! Pure pass-through: no aggregation, no resampling. The CLI renders the
//! points as a plain table; a graphical surface can consume the same pairs.

use crate::model::TimeSeries;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One chart observation: a date on the x axis, a balance on the y axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ChartPoint {
    date: NaiveDate,
    value: Decimal,
}

impl ChartPoint {
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn value(&self) -> Decimal {
        self.value
    }
}

/// Projects the sorted, coerced series into chart points, in order.
pub fn project(series: &TimeSeries) -> Vec<ChartPoint> {
    series
        .points()
        .iter()
        .map(|(date, value)| ChartPoint {
            date: *date,
            value: *value,
        })
        .collect()
}

/// Renders the points as a two-column plain-text table.
pub fn render_table(points: &[ChartPoint], date_header: &str, value_header: &str) -> String {
    let value_width = points
        .iter()
        .map(|p| p.value.normalize().to_string().len())
        .chain(std::iter::once(value_header.len()))
        .max()
        .unwrap_or(0);
    // ISO dates are a fixed 10 characters wide.
    let date_width = date_header.len().max(10);

    let mut out = format!("{date_header:<date_width$}  {value_header:>value_width$}\n");
    for point in points {
        out.push_str(&format!(
            "{:<date_width$}  {:>value_width$}\n",
            point.date.to_string(),
            point.value.normalize().to_string(),
        ));
    }
    out
}
