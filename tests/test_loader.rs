//! Unit tests for dataset loader

use hprice::pipeline::{dataset_stats, load_dataset};
use polars::prelude::*;
use std::io::Write;
use tempfile::TempDir;

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_load_csv_file() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(file, "a,b,c").unwrap();
    writeln!(file, "1,2,3").unwrap();
    writeln!(file, "4,5,6").unwrap();
    drop(file);

    let df = load_dataset(&csv_path, 100).unwrap();
    let stats = dataset_stats(&df);

    assert_eq!(stats.rows, 2, "Should have 2 data rows");
    assert_eq!(stats.columns, 3, "Should have 3 columns");
    assert_eq!(stats.missing_cells, 0);
    assert_eq!(df.get_column_names(), &["a", "b", "c"]);
    assert!(stats.memory_mb >= 0.0, "Memory estimate should be non-negative");
}

#[test]
fn test_load_parquet_file() {
    let mut df = df! {
        "x" => [1i32, 2, 3],
        "y" => [4i32, 5, 6],
    }
    .unwrap();
    let (_temp_dir, parquet_path) = common::create_temp_parquet(&mut df);

    let loaded = load_dataset(&parquet_path, 100).unwrap();

    common::assert_shape(&loaded, 3, 2);
    assert_eq!(loaded.get_column_names(), &["x", "y"]);
}

#[test]
fn test_na_tokens_are_missing() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("housing.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(file, "Id,PoolQC,LotFrontage,Alley").unwrap();
    writeln!(file, "1,NA,65,Grvl").unwrap();
    writeln!(file, "2,Ex,NA,NA").unwrap();
    writeln!(file, "3,NA,,Pave").unwrap();
    drop(file);

    let df = load_dataset(&csv_path, 100).unwrap();

    let null_counts: Vec<usize> = df.get_columns().iter().map(|c| c.null_count()).collect();
    assert_eq!(null_counts, vec![0, 2, 2, 1]);
    assert_eq!(dataset_stats(&df).missing_cells, 5);
    // "NA" must not force a numeric column to text
    assert!(df.column("LotFrontage").unwrap().dtype().is_primitive_numeric());
}

#[test]
fn test_unsupported_format() {
    let temp_dir = TempDir::new().unwrap();
    let bad_path = temp_dir.path().join("test.xlsx");
    std::fs::File::create(&bad_path).unwrap();

    let result = load_dataset(&bad_path, 100);

    assert!(result.is_err(), "Unsupported format should return error");
    let err_msg = result.unwrap_err().to_string();
    assert!(
        err_msg.contains("Unsupported") && err_msg.contains("xlsx"),
        "Error message should name the unsupported format: {}",
        err_msg
    );
}

#[test]
fn test_nonexistent_file() {
    let path = std::path::Path::new("/nonexistent/path/to/file.csv");

    let result = load_dataset(path, 100);

    assert!(result.is_err(), "Nonexistent file should return error");
}

#[test]
fn test_full_scan_schema_inference() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("inference.csv");

    // Integers first, a float late in the file
    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(file, "tricky_col").unwrap();
    for i in 0..100 {
        writeln!(file, "{}", i).unwrap();
    }
    writeln!(file, "100.5").unwrap();
    drop(file);

    let df = load_dataset(&csv_path, 0).unwrap();

    assert_eq!(df.height(), 101);
    assert_eq!(df.column("tricky_col").unwrap().dtype(), &DataType::Float64);
}
