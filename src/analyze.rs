//! The burn-rate and runway calculator.
//!
//! This is the numeric heart of the tool: coerce the date column, sort
//! chronologically, take period-over-period deltas of the balance, average
//! them, and divide the latest balance by the burn rate. Everything is pure
//! in-memory arithmetic; a failure here is deterministic for a given input,
//! so nothing retries.

use crate::model::{Amount, Cell, ColumnSelection, Dataset, TimeSeries};
use crate::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

/// Date-only formats tried when coercing a text cell, in order. `%y` must
/// come before `%Y`: `%Y` also matches a two-digit number, which would turn
/// "2/28/25" into year 25.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%y", "%m/%d/%Y"];

/// Datetime formats tried after the date-only formats; the time is dropped.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// What to do with a row whose date or balance cell cannot be coerced.
///
/// This is one policy for the whole operation, chosen up front. It covers
/// both selected columns: a balance that fails to parse in a row whose date
/// coerced is treated the same way as a bad date.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateCoercion {
    /// Drop unparseable rows; fail with `DateParse` only when every row's
    /// date fails.
    #[default]
    Lenient,
    /// Any unparseable date or balance fails the whole operation.
    Strict,
}

serde_plain::derive_display_from_serialize!(DateCoercion);
serde_plain::derive_fromstr_from_deserialize!(DateCoercion);

/// Which deltas feed the average.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AveragePolicy {
    /// Mean of every period-over-period delta.
    #[default]
    FullHistory,
    /// Mean of only the most recent `k` deltas.
    TrailingWindow(NonZeroUsize),
}

impl fmt::Display for AveragePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AveragePolicy::FullHistory => write!(f, "full-history"),
            AveragePolicy::TrailingWindow(k) => write!(f, "trailing-window({k})"),
        }
    }
}

/// The two policy axes of the calculator, both explicit configuration.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AnalysisOptions {
    pub coercion: DateCoercion,
    pub averaging: AveragePolicy,
}

/// Runway is a number of periods or an explicit undefined state, never a
/// numeric stand-in like zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Runway {
    Periods(Decimal),
    Undefined,
}

impl Runway {
    pub fn periods(&self) -> Option<Decimal> {
        match self {
            Runway::Periods(p) => Some(*p),
            Runway::Undefined => None,
        }
    }
}

impl fmt::Display for Runway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Runway::Periods(p) => write!(f, "{} periods", p.round_dp(1).normalize()),
            Runway::Undefined => write!(f, "undefined (cash balance is flat or growing)"),
        }
    }
}

/// The computed figures. A value object, recomputed fresh on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BurnRunway {
    average_delta: Decimal,
    burn_rate: Decimal,
    latest_balance: Decimal,
    runway: Runway,
    policy: AveragePolicy,
}

impl BurnRunway {
    /// Mean period-over-period change. Negative when cash shrinks.
    pub fn average_delta(&self) -> Decimal {
        self.average_delta
    }

    /// `-average_delta`: positive means cash consumed per period.
    pub fn burn_rate(&self) -> Decimal {
        self.burn_rate
    }

    /// Balance of the chronologically last row.
    pub fn latest_balance(&self) -> Decimal {
        self.latest_balance
    }

    pub fn runway(&self) -> Runway {
        self.runway
    }

    pub fn policy(&self) -> AveragePolicy {
        self.policy
    }
}

/// The full output of one analysis: the coerced, sorted series, its deltas
/// (the derived column), and the figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Analysis {
    series: TimeSeries,
    deltas: Vec<Decimal>,
    result: BurnRunway,
}

impl Analysis {
    pub fn series(&self) -> &TimeSeries {
        &self.series
    }

    /// `deltas[i] = balance[i+1] - balance[i]` over the sorted series.
    pub fn deltas(&self) -> &[Decimal] {
        &self.deltas
    }

    pub fn result(&self) -> &BurnRunway {
        &self.result
    }
}

/// Runs the calculator over the selected columns of `dataset`.
///
/// Degenerate inputs are reported in this order: date coercion runs first,
/// so a non-empty dataset in which no row's date coerces is an
/// [`Error::DateParse`]; anything else that leaves fewer than two usable
/// rows, including rows dropped for an unusable balance, is
/// [`Error::InsufficientData`].
pub fn analyze(
    dataset: &Dataset,
    selection: &ColumnSelection,
    options: AnalysisOptions,
) -> Result<Analysis> {
    let date_ix = dataset
        .column_index(selection.date_column())
        .ok_or_else(|| missing(selection.date_column()))?;
    let balance_ix = dataset
        .column_index(selection.balance_column())
        .ok_or_else(|| missing(selection.balance_column()))?;

    let mut observations: Vec<(NaiveDate, Decimal)> = Vec::new();
    let mut coerced_dates = 0usize;
    for (row_ix, row) in dataset.rows().iter().enumerate() {
        let date = match coerce_date(&row[date_ix]) {
            Some(date) => date,
            None => {
                if options.coercion == DateCoercion::Strict {
                    return Err(Error::DateParse {
                        column: selection.date_column().to_string(),
                        detail: format!(
                            "row {} value '{}' is not a recognized date",
                            row_ix + 2,
                            row[date_ix]
                        ),
                    });
                }
                continue;
            }
        };
        coerced_dates += 1;
        let balance = match coerce_balance(&row[balance_ix]) {
            Some(balance) => balance,
            None => {
                if options.coercion == DateCoercion::Strict {
                    return Err(Error::DateParse {
                        column: selection.balance_column().to_string(),
                        detail: format!(
                            "row {} value '{}' is not a recognized amount",
                            row_ix + 2,
                            row[balance_ix]
                        ),
                    });
                }
                continue;
            }
        };
        observations.push((date, balance));
    }

    // Rows dropped for an unusable balance do not count against the date
    // column, so the DateParse report fires only when no date coerced at all.
    if coerced_dates == 0 && !dataset.is_empty() {
        return Err(Error::DateParse {
            column: selection.date_column().to_string(),
            detail: format!("all {} rows failed date coercion", dataset.len()),
        });
    }
    if observations.len() < 2 {
        return Err(Error::InsufficientData {
            found: observations.len(),
        });
    }

    // Stable, so rows sharing a date keep their original relative order.
    observations.sort_by_key(|(date, _)| *date);

    let deltas: Vec<Decimal> = observations
        .windows(2)
        .map(|pair| pair[1].1 - pair[0].1)
        .collect();
    let window = match options.averaging {
        AveragePolicy::FullHistory => deltas.as_slice(),
        AveragePolicy::TrailingWindow(k) => &deltas[deltas.len().saturating_sub(k.get())..],
    };
    let average_delta = window.iter().copied().sum::<Decimal>() / Decimal::from(window.len() as u64);
    let burn_rate = -average_delta;
    let latest_balance = observations
        .last()
        .map(|(_, balance)| *balance)
        .unwrap_or_default();
    let runway = if burn_rate > Decimal::ZERO {
        Runway::Periods(latest_balance / burn_rate)
    } else {
        Runway::Undefined
    };

    Ok(Analysis {
        series: TimeSeries::new(observations),
        deltas,
        result: BurnRunway {
            average_delta,
            burn_rate,
            latest_balance,
            runway,
            policy: options.averaging,
        },
    })
}

fn missing(column: &str) -> Error {
    Error::InvalidSelection(format!("column '{column}' was not found in the dataset"))
}

/// Coerces one cell of the date column. Numbers are not accepted as dates;
/// a bare number in a date column is far more often a mis-selected column
/// than an Excel serial date.
fn coerce_date(cell: &Cell) -> Option<NaiveDate> {
    match cell {
        Cell::Date(date) => Some(*date),
        Cell::Text(s) => {
            let trimmed = s.trim();
            for format in DATE_FORMATS {
                if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
                    return Some(date);
                }
            }
            for format in DATETIME_FORMATS {
                if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
                    return Some(datetime.date());
                }
            }
            None
        }
        Cell::Number(_) | Cell::Blank => None,
    }
}

fn coerce_balance(cell: &Cell) -> Option<Decimal> {
    match cell {
        Cell::Number(n) => Some(*n),
        Cell::Text(s) => Amount::from_str(s).ok().map(|amount| amount.value()),
        Cell::Date(_) | Cell::Blank => None,
    }
}
