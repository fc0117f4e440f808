//! Dataset loader for CSV and Parquet files

use anyhow::{Context, Result};
use polars::prelude::*;
use std::path::Path;

/// Tokens read as missing in CSV input. The housing data marks an absent
/// attribute (no pool, no garage, ...) with a literal `NA`.
pub const CSV_NULL_TOKENS: [&str; 4] = ["NA", "NaN", "N/A", "null"];

/// Load a dataset from a file (CSV or Parquet based on extension)
///
/// # Arguments
/// * `path` - Input file path
/// * `infer_schema_length` - Rows used for CSV type inference (0 = full scan)
pub fn load_dataset(path: &Path, infer_schema_length: usize) -> Result<DataFrame> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let lf = match extension.as_str() {
        "csv" => {
            let schema_length = if infer_schema_length == 0 {
                None
            } else {
                Some(infer_schema_length)
            };
            let null_values = NullValues::AllColumns(
                CSV_NULL_TOKENS.iter().map(|token| (*token).into()).collect(),
            );
            LazyCsvReader::new(path)
                .with_infer_schema_length(schema_length)
                .with_null_values(Some(null_values))
                .finish()
                .with_context(|| format!("Failed to load CSV file: {}", path.display()))?
        }
        "parquet" => LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to load Parquet file: {}", path.display()))?,
        _ => anyhow::bail!(
            "Unsupported file format: {}. Supported formats: csv, parquet",
            extension
        ),
    };

    lf.collect()
        .with_context(|| format!("Failed to read dataset: {}", path.display()))
}

/// Shape and estimated in-memory size of a loaded table
#[derive(Debug, Clone, Copy)]
pub struct DatasetStats {
    pub rows: usize,
    pub columns: usize,
    pub missing_cells: usize,
    pub memory_mb: f64,
}

/// Collect display statistics about a loaded table
pub fn dataset_stats(df: &DataFrame) -> DatasetStats {
    let (rows, columns) = df.shape();
    let missing_cells = df.get_columns().iter().map(|c| c.null_count()).sum();
    let memory_mb = df.estimated_size() as f64 / (1024.0 * 1024.0);
    DatasetStats {
        rows,
        columns,
        missing_cells,
        memory_mb,
    }
}
