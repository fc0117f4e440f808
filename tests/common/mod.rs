//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a small housing training table with known characteristics
///
/// This DataFrame includes:
/// - `Id`: Row identifier 1..=20
/// - `LotArea`: Continuous, strongly right-skewed (one very large lot)
/// - `GrLivArea`: Continuous, roughly symmetric
/// - `OverallQual`: Integer with 5 distinct values (categorical numeric)
/// - `MSZoning`: Text categorical with one missing value
/// - `MasVnrArea`: Continuous with one missing value
/// - `SalePrice`: Target, linear in living area and quality
pub fn create_train_dataframe() -> DataFrame {
    df! {
        "Id" => (1..=20).collect::<Vec<i64>>(),
        "LotArea" => [8450.0f64, 9600.0, 11250.0, 9550.0, 14260.0, 14115.0, 10084.0, 10382.0, 6120.0, 7420.0,
                      11200.0, 11924.0, 12968.0, 10652.0, 10920.0, 6180.0, 7560.0, 8500.0, 9000.0, 215245.0],
        "GrLivArea" => [1710i64, 1262, 1786, 1717, 2198, 1362, 1694, 2090, 1774, 1077,
                        1040, 2324, 912, 1494, 1253, 854, 1004, 1296, 1114, 1339],
        "OverallQual" => [7i64, 6, 7, 7, 8, 5, 8, 7, 7, 5, 5, 9, 5, 7, 6, 7, 5, 6, 5, 6],
        "MSZoning" => [Some("RL"), Some("RL"), Some("RL"), Some("RL"), Some("RL"), Some("RL"), Some("RL"), Some("RL"), Some("RM"), Some("RL"),
                       Some("RL"), Some("RL"), Some("RL"), Some("RL"), Some("RL"), Some("RM"), Some("RL"), Some("FV"), None, Some("RL")],
        "MasVnrArea" => [Some(196.0f64), Some(0.0), Some(162.0), Some(42.0), Some(350.0), Some(50.0), Some(186.0), Some(240.0), Some(12.0), Some(20.0),
                         Some(30.0), Some(286.0), Some(64.0), Some(306.0), Some(212.0), Some(8.0), Some(180.0), Some(90.0), None, Some(40.0)],
        "SalePrice" => [146400.0f64, 108480.0, 151440.0, 139680.0, 178920.0, 99480.0, 154760.0, 160600.0, 149960.0, 87080.0,
                        81600.0, 200960.0, 81480.0, 136760.0, 108120.0, 110160.0, 82160.0, 115840.0, 88560.0, 113560.0],
    }
    .unwrap()
}

/// Create the matching test table (no target column)
///
/// Row 23 carries a zoning value never seen in training (`C (all)`), row 25
/// a quality value never seen in training (10), and row 26 is missing both
/// `OverallQual` and `MasVnrArea`.
pub fn create_test_dataframe() -> DataFrame {
    df! {
        "Id" => (21..=28).collect::<Vec<i64>>(),
        "LotArea" => [11622.0f64, 14267.0, 13830.0, 9978.0, 5005.0, 10000.0, 7980.0, 8402.0],
        "GrLivArea" => [896i64, 1329, 1629, 1604, 1280, 1655, 1187, 1465],
        "OverallQual" => [Some(5i64), Some(6), Some(5), Some(6), Some(10), None, Some(6), Some(7)],
        "MSZoning" => [Some("RH"), Some("RL"), Some("C (all)"), Some("RL"), Some("RL"), Some("RL"), Some("RL"), Some("FV")],
        "MasVnrArea" => [Some(0.0f64), Some(108.0), Some(0.0), Some(20.0), Some(0.0), None, Some(0.0), Some(100.0)],
    }
    .unwrap()
}

/// Create a larger synthetic regression problem `y = X w + noise`
pub fn create_synthetic_regression(rows: usize, cols: usize, seed: u64) -> (Vec<Vec<f64>>, Vec<f64>) {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    let mut rng = StdRng::seed_from_u64(seed);

    let weights: Vec<f64> = (0..cols)
        .map(|j| if j % 3 == 0 { rng.gen_range(-2.0..2.0) } else { 0.0 })
        .collect();
    let x: Vec<Vec<f64>> = (0..rows)
        .map(|_| (0..cols).map(|_| rng.gen_range(-1.0..1.0)).collect())
        .collect();
    let y = x
        .iter()
        .map(|row| {
            row.iter().zip(&weights).map(|(a, b)| a * b).sum::<f64>()
                + 0.5
                + rng.gen_range(-0.05..0.05)
        })
        .collect();
    (x, y)
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = write_csv_in(&temp_dir, "test_data.csv", df);
    (temp_dir, csv_path)
}

/// Write `df` as CSV into an existing temporary directory
pub fn write_csv_in(dir: &TempDir, name: &str, df: &mut DataFrame) -> PathBuf {
    let csv_path = dir.path().join(name);
    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();
    csv_path
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("test_data.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Assert that a DataFrame has expected shape
pub fn assert_shape(df: &DataFrame, expected_rows: usize, expected_cols: usize) {
    let (rows, cols) = df.shape();
    assert_eq!(rows, expected_rows, "Row count mismatch: expected {}, got {}", expected_rows, rows);
    assert_eq!(cols, expected_cols, "Column count mismatch: expected {}, got {}", expected_cols, cols);
}

/// Assert that a DataFrame contains specific columns
pub fn assert_has_columns(df: &DataFrame, expected_cols: &[&str]) {
    let actual_cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for col in expected_cols {
        assert!(
            actual_cols.contains(&col.to_string()),
            "Missing expected column: '{}'. Actual columns: {:?}",
            col,
            actual_cols
        );
    }
}

/// Assert that a DataFrame does NOT contain specific columns
pub fn assert_missing_columns(df: &DataFrame, unexpected_cols: &[&str]) {
    let actual_cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for col in unexpected_cols {
        assert!(
            !actual_cols.contains(&col.to_string()),
            "Unexpected column still present: '{}'",
            col
        );
    }
}

/// Read a column as `f64` values (missing as `None`)
pub fn f64_values(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    df.column(name)
        .unwrap()
        .cast(&DataType::Float64)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .collect()
}

/// Assert two floats agree within `tol`
pub fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "Expected {} to be within {} of {}",
        actual,
        tol,
        expected
    );
}
