//! The in-memory tabular buffer shared by every stage of the pipeline.

use crate::{Error, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How many rows [`Dataset::preview`] renders by default.
pub const PREVIEW_ROWS: usize = 5;

/// A single cell value. CSV input produces only `Text` and `Blank`;
/// spreadsheet input keeps the typed values the container stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    Text(String),
    Number(Decimal),
    Date(NaiveDate),
    Blank,
}

impl Cell {
    pub fn is_blank(&self) -> bool {
        matches!(self, Cell::Blank)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Number(n) => write!(f, "{}", n.normalize()),
            Cell::Date(d) => write!(f, "{d}"),
            Cell::Blank => Ok(()),
        }
    }
}

/// An ordered sequence of rows under a fixed header. Column names are unique;
/// rows never exceed the header width. Immutable once parsed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Dataset {
    /// Builds a dataset from a header and rows. Rows shorter than the header
    /// are padded with blanks; a longer row or a duplicate column name is a
    /// load error, since it means the source was not a rectangular table.
    pub fn new(columns: Vec<String>, mut rows: Vec<Vec<Cell>>) -> Result<Self> {
        if columns.is_empty() {
            return Err(Error::Load("the table has no columns".to_string()));
        }
        for (ix, name) in columns.iter().enumerate() {
            if columns[..ix].contains(name) {
                return Err(Error::Load(format!("duplicate column name '{name}'")));
            }
        }
        for (ix, row) in rows.iter_mut().enumerate() {
            if row.len() > columns.len() {
                return Err(Error::Load(format!(
                    "row {} is longer than the header ({} cells vs {} columns)",
                    ix + 2,
                    row.len(),
                    columns.len()
                )));
            }
            row.resize(columns.len(), Cell::Blank);
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Renders the header and the first `n` rows as a plain-text table.
    pub fn preview(&self, n: usize) -> String {
        let shown = self.rows.iter().take(n);
        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.len()).collect();
        let rendered: Vec<Vec<String>> = shown
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect();
        for row in &rendered {
            for (ix, cell) in row.iter().enumerate() {
                widths[ix] = widths[ix].max(cell.len());
            }
        }
        let mut out = String::new();
        for (ix, name) in self.columns.iter().enumerate() {
            if ix > 0 {
                out.push_str("  ");
            }
            out.push_str(&format!("{name:<width$}", width = widths[ix]));
        }
        out.push('\n');
        for row in &rendered {
            for (ix, cell) in row.iter().enumerate() {
                if ix > 0 {
                    out.push_str("  ");
                }
                out.push_str(&format!("{cell:<width$}", width = widths[ix]));
            }
            out.push('\n');
        }
        out
    }
}
