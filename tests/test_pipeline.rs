//! Integration tests for the full cleaning and training pipeline

use hprice::pipeline::*;
use hprice::report::{prediction_table, CoefficientRanking};
use polars::prelude::*;
use tempfile::TempDir;

#[path = "common/mod.rs"]
mod common;

use common::*;

/// Load both fixture tables back from CSV, as the binary does
fn load_fixtures() -> (TempDir, DataFrame, DataFrame) {
    let temp_dir = TempDir::new().unwrap();
    let train_path = write_csv_in(&temp_dir, "train.csv", &mut create_train_dataframe());
    let test_path = write_csv_in(&temp_dir, "test.csv", &mut create_test_dataframe());
    let train = load_dataset(&train_path, 100).unwrap();
    let test = load_dataset(&test_path, 100).unwrap();
    (temp_dir, train, test)
}

#[test]
fn test_full_pipeline_produces_predictions() {
    let (_temp_dir, train, test) = load_fixtures();

    let (train_features, y) = extract_target(&train, "SalePrice").unwrap();
    assert_eq!(y.len(), 20);
    assert_close(y[0], 146400.0f64.ln_1p(), 1e-12);

    let (cleaner, train_table) = FeatureCleaner::fit(&train_features, CleaningConfig::default()).unwrap();
    let test_table = cleaner.transform(&test).unwrap();

    let x_train = DesignMatrix::from_table(&train_table, "training").unwrap();
    let x_test = DesignMatrix::from_table(&test_table, "test").unwrap();
    assert_eq!(x_train.columns(), x_test.columns());

    let config = RegressionConfig::default();
    let ridge = config.ridge().fit(&x_train, &y).unwrap();
    let lasso = config.lasso().fit(&x_train, &y).unwrap();

    for model in [&ridge, &lasso] {
        let log_predictions = model.predict(&x_test).unwrap();
        let table = prediction_table("Id", x_test.ids(), &log_predictions).unwrap();

        assert_shape(&table, 8, 2);
        assert_eq!(table.get_column_names(), &["Id", "SalePrice"]);
        let ids: Vec<i64> = table
            .column("Id")
            .unwrap()
            .i64()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(ids, (21..=28).collect::<Vec<i64>>());
        for price in f64_values(&table, "SalePrice") {
            let price = price.unwrap();
            assert!(
                price.is_finite() && price > 10_000.0 && price < 1_000_000.0,
                "{} prediction out of range: {}",
                model.kind(),
                price
            );
        }
    }

    let ranking = CoefficientRanking::from_model(&lasso);
    let frame = ranking.to_frame().unwrap();
    assert_shape(&frame, x_train.cols(), 2);
    let values: Vec<f64> = f64_values(&frame, "values").into_iter().flatten().collect();
    assert!(values.windows(2).all(|w| w[0] <= w[1]), "Ranking should be ascending");
}

#[test]
fn test_test_table_reuses_training_state() {
    let (_temp_dir, train, test) = load_fixtures();
    let (train_features, _) = extract_target(&train, "SalePrice").unwrap();
    let (cleaner, train_table) = FeatureCleaner::fit(&train_features, CleaningConfig::default()).unwrap();
    let test_table = cleaner.transform(&test).unwrap();

    assert_eq!(cleaner.skew().selected, vec!["LotArea"]);
    assert_eq!(test_table.column_names(), train_table.column_names());
    assert_eq!(test_table.column_names().len(), 11);

    // Skew transform replayed with the training selection
    let lot = f64_values(&test_table.features, "LotArea");
    assert_close(lot[0].unwrap(), 11622.0f64.ln_1p(), 1e-9);
    let living = f64_values(&test_table.features, "GrLivArea");
    assert_eq!(living[0], Some(896.0));

    // Unseen zoning value "C (all)" (Id 23) encodes as all zeros
    for name in ["MSZoning_FV", "MSZoning_RL", "MSZoning_RM"] {
        assert_eq!(f64_values(&test_table.features, name)[2], Some(0.0));
    }
    assert_missing_columns(&test_table.features, &["MSZoning_C (all)", "MSZoning_RH", "OverallQual_10"]);

    // Missing quality (Id 26) encodes as all zeros, missing veneer takes the test mean
    for name in ["OverallQual_5", "OverallQual_6", "OverallQual_7", "OverallQual_8", "OverallQual_9"] {
        assert_eq!(f64_values(&test_table.features, name)[5], Some(0.0));
    }
    let veneer = f64_values(&test_table.features, "MasVnrArea");
    assert_close(veneer[5].unwrap(), 228.0 / 7.0, 1e-9);
}

#[test]
fn test_impute_from_train_uses_training_means() {
    let (_temp_dir, train, test) = load_fixtures();
    let (train_features, _) = extract_target(&train, "SalePrice").unwrap();
    let config = CleaningConfig {
        impute_from_train: true,
        ..Default::default()
    };
    let (cleaner, train_table) = FeatureCleaner::fit(&train_features, config).unwrap();
    let test_table = cleaner.transform(&test).unwrap();

    let train_mean = cleaner.train_means().get("MasVnrArea").unwrap();
    let veneer = f64_values(&test_table.features, "MasVnrArea");
    assert_close(veneer[5].unwrap(), train_mean, 1e-9);

    // Training table filled with its own mean too
    let train_veneer = f64_values(&train_table.features, "MasVnrArea");
    assert_close(train_veneer[18].unwrap(), train_mean, 1e-9);
}

#[test]
fn test_missing_skewed_column_in_test_table_fails() {
    let (_temp_dir, train, test) = load_fixtures();
    let (train_features, _) = extract_target(&train, "SalePrice").unwrap();
    let (cleaner, _) = FeatureCleaner::fit(&train_features, CleaningConfig::default()).unwrap();

    let err = cleaner.transform(&test.drop("LotArea").unwrap()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::SchemaMismatch { .. })
    ));
}

#[test]
fn test_target_errors() {
    let df = create_train_dataframe();
    let err = extract_target(&df.drop("SalePrice").unwrap(), "SalePrice").unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::MissingColumn { .. })
    ));

    let df = df! {
        "Id" => [1i64, 2],
        "SalePrice" => [Some(100.0f64), None],
    }
    .unwrap();
    let err = extract_target(&df, "SalePrice").unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::MissingValues { .. })
    ));
}

#[test]
fn test_log_scale_round_trip() {
    for price in [0.0, 1.0, 34900.0, 755000.0] {
        assert_close(from_log_scale(to_log_scale(price)), price, 1e-6);
    }
}

#[test]
fn test_small_table_end_to_end() {
    // S is heavily right-skewed, F is evenly spaced, C has two categories
    let s: Vec<f64> = (1..=14).map(|v| v as f64).chain([100.0, 500.0]).collect();
    let f: Vec<f64> = (10..26).map(|v| v as f64).collect();
    let c: Vec<&str> = (0..16).map(|i| if i % 2 == 0 { "a" } else { "b" }).collect();
    let price: Vec<f64> = (0..16)
        .map(|i| 90_000.0 + 2_000.0 * f[i] + 40.0 * s[i] + if i % 2 == 0 { 8_000.0 } else { 0.0 })
        .collect();

    let train = df! {
        "Id" => (1..=16).collect::<Vec<i64>>(),
        "S" => s,
        "F" => f,
        "C" => c,
        "SalePrice" => price,
    }
    .unwrap();
    let test = df! {
        "Id" => [100i64],
        "S" => [20.0f64],
        "F" => [15.0f64],
        "C" => ["c"],
    }
    .unwrap();

    let (train_features, y) = extract_target(&train, "SalePrice").unwrap();
    let (cleaner, train_table) = FeatureCleaner::fit(&train_features, CleaningConfig::default()).unwrap();
    let test_table = cleaner.transform(&test).unwrap();

    assert_eq!(cleaner.skew().selected, vec!["S"]);
    assert_eq!(train_table.column_names(), vec!["S", "F", "C_a", "C_b"]);
    assert_eq!(test_table.column_names(), train_table.column_names());
    assert_eq!(f64_values(&test_table.features, "C_a"), vec![Some(0.0)]);
    assert_eq!(f64_values(&test_table.features, "C_b"), vec![Some(0.0)]);
    assert_close(
        f64_values(&test_table.features, "S")[0].unwrap(),
        20.0f64.ln_1p(),
        1e-12,
    );

    let x_train = DesignMatrix::from_table(&train_table, "training").unwrap();
    let x_test = DesignMatrix::from_table(&test_table, "test").unwrap();
    let config = RegressionConfig::default();
    let ridge = config.ridge().fit(&x_train, &y).unwrap();
    let lasso = config.lasso().fit(&x_train, &y).unwrap();

    for model in [&ridge, &lasso] {
        let log_predictions = model.predict(&x_test).unwrap();
        assert_eq!(log_predictions.len(), 1);
        for p in log_predictions {
            assert_close(to_log_scale(from_log_scale(p)), p, 1e-9);
        }

        let mut names: Vec<String> = CoefficientRanking::from_model(model)
            .entries()
            .iter()
            .map(|(name, _)| name.clone())
            .collect();
        let mut expected = x_train.columns().to_vec();
        names.sort();
        expected.sort();
        assert_eq!(names, expected);
    }
}
