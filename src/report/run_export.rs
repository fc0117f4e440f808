//! JSON run report export

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{
    ColumnClasses, ColumnGroup, ColumnGroups, CvDiagnostics, FeatureCleaner, FittedModel,
    RegressionConfig, SkewRecord,
};

/// Metadata about the run
#[derive(Serialize)]
pub struct RunMetadata {
    /// Timestamp of the run (ISO 8601 format)
    pub timestamp: String,
    /// hprice version
    pub hprice_version: String,
    pub train_file: String,
    pub test_file: String,
    pub id_column: String,
    pub target_column: String,
}

/// Cleaning settings and what they learned from the training table
#[derive(Serialize)]
pub struct CleaningReport<'a> {
    pub cardinality_threshold: usize,
    pub skew_threshold: f64,
    /// Fill policy applied to the test table
    pub test_imputation: String,
    pub classes: &'a ColumnClasses,
    pub skew: &'a SkewRecord,
    pub encoded_features: usize,
    /// Encoded columns built from more than one source
    pub collisions: Vec<&'a ColumnGroup>,
}

/// One trained model
#[derive(Serialize)]
pub struct ModelReport<'a> {
    pub model: String,
    pub alpha: f64,
    pub intercept: f64,
    pub nonzero_coefficients: usize,
    pub cross_validation: &'a CvDiagnostics,
}

impl<'a> ModelReport<'a> {
    fn from_model(model: &'a FittedModel) -> Self {
        Self {
            model: model.kind().to_string(),
            alpha: model.alpha(),
            intercept: model.intercept(),
            nonzero_coefficients: model.nonzero_coefficients(),
            cross_validation: model.cv(),
        }
    }
}

/// Complete run report
#[derive(Serialize)]
pub struct RunReport<'a> {
    pub metadata: RunMetadata,
    pub cleaning: CleaningReport<'a>,
    pub regression: &'a RegressionConfig,
    pub models: Vec<ModelReport<'a>>,
    /// Files written by the run
    pub outputs: Vec<String>,
}

/// Parameters for the run report
pub struct RunReportParams<'a> {
    pub train_file: &'a Path,
    pub test_file: &'a Path,
    pub target_column: &'a str,
    /// Column groups of the encoded training table
    pub groups: &'a ColumnGroups,
    pub regression: &'a RegressionConfig,
    pub outputs: &'a [std::path::PathBuf],
}

/// Write a JSON description of the run to `output_path`
///
/// # Arguments
/// * `cleaner` - Cleaning state frozen from the training table
/// * `models` - The trained models, in the order they were fitted
/// * `output_path` - Path to write the JSON file
/// * `params` - Inputs and settings of the run
pub fn export_run_report(
    cleaner: &FeatureCleaner,
    models: &[&FittedModel],
    output_path: &Path,
    params: &RunReportParams,
) -> Result<()> {
    let config = cleaner.config();
    let report = RunReport {
        metadata: RunMetadata {
            timestamp: Utc::now().to_rfc3339(),
            hprice_version: env!("CARGO_PKG_VERSION").to_string(),
            train_file: params.train_file.display().to_string(),
            test_file: params.test_file.display().to_string(),
            id_column: config.id_column.clone(),
            target_column: params.target_column.to_string(),
        },
        cleaning: CleaningReport {
            cardinality_threshold: config.cardinality_threshold,
            skew_threshold: config.skew_threshold,
            test_imputation: cleaner.impute_source().to_string(),
            classes: cleaner.classes(),
            skew: cleaner.skew(),
            encoded_features: cleaner.schema().len(),
            collisions: params.groups.collisions(),
        },
        regression: params.regression,
        models: models.iter().map(|m| ModelReport::from_model(m)).collect(),
        outputs: params
            .outputs
            .iter()
            .map(|p| p.display().to_string())
            .collect(),
    };

    let json =
        serde_json::to_string_pretty(&report).context("Failed to serialize run report to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write run report to {}", output_path.display()))?;

    Ok(())
}
