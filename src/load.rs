//! Loads uploaded bytes into a [`Dataset`].
//!
//! Two source formats are supported: spreadsheet containers (`.xlsx`/`.xls`,
//! read with `calamine`) and delimited text (`.csv`). A spreadsheet may hold
//! several named sheets, so opening one yields the sheet names first and the
//! caller picks which sheet to materialize. A CSV is a single table and
//! parses directly.

use crate::model::{Cell, Dataset};
use crate::{Error, Result};
use calamine::{open_workbook_auto_from_rs, Data, Reader, Sheets};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::path::Path;

/// The sheet name reported for a CSV, which has exactly one table.
pub const CSV_SHEET: &str = "data";

/// Which parser to use for an uploaded byte buffer, derived from the
/// filename extension.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatHint {
    /// An `.xlsx` or `.xls` container with one or more named sheets.
    Spreadsheet,
    /// Delimited plain text.
    Csv,
}

serde_plain::derive_display_from_serialize!(FormatHint);
serde_plain::derive_fromstr_from_deserialize!(FormatHint);

impl FormatHint {
    /// Maps a filename extension to a parser: `xlsx`/`xls` → spreadsheet,
    /// `csv` → delimited text. Anything else is a load error.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "xlsx" | "xls" => Ok(FormatHint::Spreadsheet),
            "csv" => Ok(FormatHint::Csv),
            other => Err(Error::Load(format!(
                "unsupported file extension '{other}' for '{}'; expected xlsx, xls or csv",
                path.display()
            ))),
        }
    }
}

/// An opened upload. Holds the parsed container so that sheet names can be
/// listed without materializing cell data.
pub enum Workbook {
    Spreadsheet(Sheets<Cursor<Vec<u8>>>),
    Csv(Dataset),
}

impl Workbook {
    /// Parses `bytes` according to `hint`. Malformed input is a recoverable
    /// [`Error::Load`]; the caller can prompt for a new upload.
    pub fn open(bytes: Vec<u8>, hint: FormatHint) -> Result<Self> {
        match hint {
            FormatHint::Spreadsheet => {
                let sheets = open_workbook_auto_from_rs(Cursor::new(bytes))
                    .map_err(|e| Error::Load(format!("not a readable spreadsheet: {e}")))?;
                Ok(Workbook::Spreadsheet(sheets))
            }
            FormatHint::Csv => Ok(Workbook::Csv(parse_csv(&bytes)?)),
        }
    }

    /// The names of the sheets in this upload. A CSV reports a single
    /// placeholder name, [`CSV_SHEET`].
    pub fn sheet_names(&self) -> Vec<String> {
        match self {
            Workbook::Spreadsheet(sheets) => sheets.sheet_names(),
            Workbook::Csv(_) => vec![CSV_SHEET.to_string()],
        }
    }

    /// Materializes one sheet as a [`Dataset`]. For a CSV the requested name
    /// is ignored since there is only one table.
    pub fn dataset(&mut self, sheet_name: &str) -> Result<Dataset> {
        match self {
            Workbook::Spreadsheet(sheets) => {
                let range = sheets.worksheet_range(sheet_name).map_err(|e| {
                    Error::Load(format!("unable to read sheet '{sheet_name}': {e}"))
                })?;
                let mut rows = range.rows();
                let header = rows
                    .next()
                    .ok_or_else(|| Error::Load(format!("sheet '{sheet_name}' is empty")))?;
                let columns = header
                    .iter()
                    .enumerate()
                    .map(|(ix, cell)| header_name(&cell.to_string(), ix))
                    .collect();
                let data = rows
                    .map(|row| row.iter().map(cell_from_data).collect())
                    .collect();
                Dataset::new(columns, data)
            }
            Workbook::Csv(dataset) => Ok(dataset.clone()),
        }
    }
}

/// Parses delimited text into a dataset. The first record is the header.
fn parse_csv(bytes: &[u8]) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(Cursor::new(bytes));

    let mut records = reader.records();
    let header = match records.next() {
        Some(record) => record.map_err(|e| Error::Load(format!("not a readable CSV: {e}")))?,
        None => return Err(Error::Load("the CSV contains no rows".to_string())),
    };
    let columns = header
        .iter()
        .enumerate()
        .map(|(ix, field)| header_name(field, ix))
        .collect();

    let mut rows = Vec::new();
    for record in records {
        let record = record.map_err(|e| Error::Load(format!("not a readable CSV: {e}")))?;
        rows.push(record.iter().map(cell_from_text).collect());
    }
    Dataset::new(columns, rows)
}

/// A blank header cell gets a positional name so column names stay unique.
fn header_name(raw: &str, ix: usize) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        format!("column_{}", ix + 1)
    } else {
        trimmed.to_string()
    }
}

fn cell_from_text(field: &str) -> Cell {
    if field.trim().is_empty() {
        Cell::Blank
    } else {
        Cell::Text(field.to_string())
    }
}

/// Converts a calamine cell, keeping the container's typing. Error cells and
/// non-finite floats become blanks and fall to the coercion policy downstream.
fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Blank,
        Data::String(s) => cell_from_text(s),
        Data::Float(f) => Decimal::from_f64(*f).map(Cell::Number).unwrap_or(Cell::Blank),
        Data::Int(i) => Cell::Number(Decimal::from(*i)),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|ndt| Cell::Date(ndt.date()))
            .unwrap_or(Cell::Blank),
        Data::DateTimeIso(s) | Data::DurationIso(s) => cell_from_text(s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "Date,Cash Balance\n2025-01-31,100000\n2025-02-28,85000\n";

    #[test]
    fn test_format_hint_from_path() {
        assert_eq!(
            FormatHint::from_path("plan.xlsx").unwrap(),
            FormatHint::Spreadsheet
        );
        assert_eq!(
            FormatHint::from_path("plan.XLS").unwrap(),
            FormatHint::Spreadsheet
        );
        assert_eq!(FormatHint::from_path("plan.csv").unwrap(), FormatHint::Csv);
        assert!(matches!(
            FormatHint::from_path("plan.pdf"),
            Err(Error::Load(_))
        ));
        assert!(matches!(FormatHint::from_path("plan"), Err(Error::Load(_))));
    }

    #[test]
    fn test_csv_parses_directly() {
        let mut workbook = Workbook::open(CSV.as_bytes().to_vec(), FormatHint::Csv).unwrap();
        assert_eq!(workbook.sheet_names(), vec![CSV_SHEET.to_string()]);
        let dataset = workbook.dataset(CSV_SHEET).unwrap();
        assert_eq!(dataset.columns(), ["Date", "Cash Balance"]);
        assert_eq!(dataset.len(), 2);
        assert_eq!(
            dataset.rows()[1][1],
            Cell::Text("85000".to_string())
        );
    }

    #[test]
    fn test_csv_blank_fields_become_blank_cells() {
        let csv = "Date,Cash Balance\n2025-01-31,\n";
        let mut workbook = Workbook::open(csv.as_bytes().to_vec(), FormatHint::Csv).unwrap();
        let dataset = workbook.dataset(CSV_SHEET).unwrap();
        assert!(dataset.rows()[0][1].is_blank());
    }

    #[test]
    fn test_empty_csv_is_load_error() {
        let result = Workbook::open(Vec::new(), FormatHint::Csv);
        assert!(matches!(result, Err(Error::Load(_))));
    }

    #[test]
    fn test_garbage_spreadsheet_is_load_error() {
        let result = Workbook::open(b"this is not a zip archive".to_vec(), FormatHint::Spreadsheet);
        assert!(matches!(result, Err(Error::Load(_))));
    }

    #[test]
    fn test_blank_header_gets_positional_name() {
        let csv = ",Cash Balance\n2025-01-31,100000\n";
        let mut workbook = Workbook::open(csv.as_bytes().to_vec(), FormatHint::Csv).unwrap();
        let dataset = workbook.dataset(CSV_SHEET).unwrap();
        assert_eq!(dataset.columns()[0], "column_1");
    }
}
