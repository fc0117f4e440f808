//! Table delivery: persist a finished table to a file

use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::*;

/// Ridge predictions file name
pub const RIDGE_OUTPUT_FILE: &str = "ridgecv_output.csv";
/// Lasso predictions file name
pub const LASSO_OUTPUT_FILE: &str = "lassocv_output.csv";
/// Lasso coefficient ranking file name
pub const COEFFICIENTS_OUTPUT_FILE: &str = "Estimated_Coefficient_Values.csv";
/// JSON run report file name
pub const RUN_REPORT_FILE: &str = "run_report.json";

/// Write `df` to `path` (CSV or Parquet based on extension)
pub fn write_table(df: &mut DataFrame, path: &Path) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "csv" => {
            let mut file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            CsvWriter::new(&mut file)
                .finish(df)
                .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
        }
        "parquet" => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            ParquetWriter::new(file)
                .finish(df)
                .with_context(|| format!("Failed to write Parquet file: {}", path.display()))?;
        }
        _ => anyhow::bail!(
            "Unsupported output format: {}. Supported formats: csv, parquet",
            extension
        ),
    }

    Ok(())
}
