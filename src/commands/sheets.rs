//! The `sheets` command: list sheet names without materializing cell data.

use crate::args::SheetsArgs;
use crate::commands::Out;
use crate::load::{FormatHint, Workbook};
use anyhow::{Context, Result};

pub async fn sheets(args: SheetsArgs) -> Result<Out<Vec<String>>> {
    let hint = FormatHint::from_path(args.file())?;
    let bytes = tokio::fs::read(args.file())
        .await
        .with_context(|| format!("Unable to read '{}'", args.file().display()))?;
    let workbook = Workbook::open(bytes, hint)?;
    let names = workbook.sheet_names();
    let message = format!(
        "'{}' contains {} sheet(s): {}",
        args.file().display(),
        names.len(),
        names.join(", ")
    );
    Ok(Out::new(message, names))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sheets_lists_xlsx_sheet_names() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("sample.xlsx");
        std::fs::write(&path, crate::sample::workbook_bytes().unwrap()).unwrap();

        let out = sheets(SheetsArgs::new(&path)).await.unwrap();
        assert_eq!(
            out.structure().unwrap(),
            &vec![crate::sample::SAMPLE_SHEET.to_string()]
        );
        assert!(out.message().contains("1 sheet(s)"));
    }

    #[tokio::test]
    async fn test_sheets_reports_csv_placeholder() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("plan.csv");
        std::fs::write(&path, "Date,Cash Balance\n2025-01-31,100000\n").unwrap();

        let out = sheets(SheetsArgs::new(&path)).await.unwrap();
        assert_eq!(
            out.structure().unwrap(),
            &vec![crate::load::CSV_SHEET.to_string()]
        );
    }
}
