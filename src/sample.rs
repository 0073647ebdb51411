//! The downloadable sample dataset.
//!
//! A static fixture: six month-end dates with a monotonically decreasing
//! cash balance, written as a real `.xlsx` so a user can see the expected
//! shape before uploading their own file. The same figures appear in the
//! calculator's tests.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Workbook};

/// Default file name for the written sample.
pub const SAMPLE_FILE_NAME: &str = "sample_burn_rate_data.xlsx";

/// Sheet name inside the sample workbook.
pub const SAMPLE_SHEET: &str = "Sheet1";

/// Header of the date column in the sample.
pub const DATE_HEADER: &str = "Date";

/// Header of the balance column in the sample.
pub const BALANCE_HEADER: &str = "Cash Balance";

/// The fixture data: month-end dates for the first half of 2025 and a
/// balance shrinking by 15000 per month.
pub fn rows() -> Vec<(NaiveDate, f64)> {
    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).expect("valid fixture date");
    vec![
        (date(2025, 1, 31), 100_000.0),
        (date(2025, 2, 28), 85_000.0),
        (date(2025, 3, 31), 70_000.0),
        (date(2025, 4, 30), 55_000.0),
        (date(2025, 5, 31), 40_000.0),
        (date(2025, 6, 30), 25_000.0),
    ]
}

/// Encodes the fixture as `.xlsx` bytes.
pub fn workbook_bytes() -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(SAMPLE_SHEET)
        .context("Unable to name the sample sheet")?;
    worksheet
        .write_string(0, 0, DATE_HEADER)
        .context("Unable to write the sample header")?;
    worksheet
        .write_string(0, 1, BALANCE_HEADER)
        .context("Unable to write the sample header")?;

    for (ix, (date, balance)) in rows().into_iter().enumerate() {
        let row = (ix + 1) as u32;
        worksheet
            .write_with_format(row, 0, &date, &date_format)
            .with_context(|| format!("Unable to write sample date in row {row}"))?;
        worksheet
            .write_number(row, 1, balance)
            .with_context(|| format!("Unable to write sample balance in row {row}"))?;
    }

    workbook
        .save_to_buffer()
        .context("Unable to encode the sample workbook")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::{analyze, AnalysisOptions};
    use crate::load::{FormatHint, Workbook};
    use crate::model::ColumnSelection;
    use rust_decimal::Decimal;

    #[test]
    fn test_sample_round_trips_through_the_loader() {
        let bytes = workbook_bytes().unwrap();
        let mut workbook = Workbook::open(bytes, FormatHint::Spreadsheet).unwrap();
        assert_eq!(workbook.sheet_names(), vec![SAMPLE_SHEET.to_string()]);

        let dataset = workbook.dataset(SAMPLE_SHEET).unwrap();
        assert_eq!(dataset.columns(), [DATE_HEADER, BALANCE_HEADER]);
        assert_eq!(dataset.len(), 6);

        let selection = ColumnSelection::resolve(&dataset, DATE_HEADER, BALANCE_HEADER).unwrap();
        let analysis = analyze(&dataset, &selection, AnalysisOptions::default()).unwrap();
        assert_eq!(analysis.result().average_delta(), Decimal::from(-15000));
        assert_eq!(analysis.result().burn_rate(), Decimal::from(15000));
        assert_eq!(analysis.result().latest_balance(), Decimal::from(25000));
    }
}
