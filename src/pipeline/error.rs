//! Error types for the cleaning and regression pipeline.
//!
//! Every variant names the stage (and column, where there is one) that
//! failed so the operator can tell which part of the run to look at.

use thiserror::Error;

/// Failures raised by the cleaning and regression stages.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PipelineError {
    /// A column the frozen training state relies on is absent, or a feature
    /// set does not match the fitted schema.
    #[error("Schema mismatch during {stage}: column '{column}'")]
    SchemaMismatch { stage: String, column: String },

    /// Row or column counts disagree.
    #[error("Dimension mismatch during {stage}: expected {expected}, found {actual}")]
    DimensionMismatch {
        stage: String,
        expected: usize,
        actual: usize,
    },

    /// A value is still missing where a complete numeric matrix is required.
    #[error("Column '{column}' still contains missing values during {stage}")]
    MissingValues { stage: String, column: String },

    /// A NaN or infinite value reached a numeric routine.
    #[error("Column '{column}' contains a non-finite value during {stage}")]
    NonFinite { stage: String, column: String },

    /// No regularization strengths to choose from.
    #[error("No candidate regularization strengths given for {model}")]
    EmptyCandidates { model: String },

    /// A regularization strength that is not a finite positive number.
    #[error("Invalid regularization strength {alpha} for {model}: must be finite and positive")]
    InvalidStrength { model: String, alpha: f64 },

    /// The penalized Gram matrix could not be factorized.
    #[error("Ridge system is not positive definite at alpha = {alpha}")]
    NotPositiveDefinite { alpha: f64 },

    /// Not enough rows to build the requested folds.
    #[error("Cannot split {rows} row(s) into {folds} cross-validation folds")]
    TooFewRows { rows: usize, folds: usize },

    /// A required column (row identifier or target) is absent.
    #[error("Required column '{column}' not found")]
    MissingColumn { column: String },
}

impl PipelineError {
    pub fn schema_mismatch(stage: &str, column: &str) -> Self {
        PipelineError::SchemaMismatch {
            stage: stage.to_string(),
            column: column.to_string(),
        }
    }

    pub fn dimension_mismatch(stage: &str, expected: usize, actual: usize) -> Self {
        PipelineError::DimensionMismatch {
            stage: stage.to_string(),
            expected,
            actual,
        }
    }
}
