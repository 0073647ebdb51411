//! The `sample` command: write the example dataset to disk.

use crate::args::SampleArgs;
use crate::commands::Out;
use anyhow::{Context, Result};

pub async fn sample(args: SampleArgs) -> Result<Out<()>> {
    let bytes = crate::sample::workbook_bytes()?;
    tokio::fs::write(args.output(), bytes)
        .await
        .with_context(|| format!("Unable to write '{}'", args.output().display()))?;
    Ok(Out::new_message(format!(
        "Wrote the sample dataset to '{}'",
        args.output().display()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sample_writes_a_loadable_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("sample.xlsx");
        let out = sample(SampleArgs::new(&path)).await.unwrap();
        assert!(out.message().contains("sample.xlsx"));

        let bytes = std::fs::read(&path).unwrap();
        let workbook =
            crate::load::Workbook::open(bytes, crate::load::FormatHint::Spreadsheet).unwrap();
        assert_eq!(workbook.sheet_names().len(), 1);
    }
}
