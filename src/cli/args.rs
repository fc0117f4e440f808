//! Command-line argument definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::pipeline::regression::{DEFAULT_LASSO_ALPHAS, DEFAULT_RIDGE_ALPHAS};
use crate::pipeline::{
    CleaningConfig, RegressionConfig, DEFAULT_CARDINALITY_THRESHOLD, DEFAULT_ID_COLUMN,
    DEFAULT_SKEW_THRESHOLD, DEFAULT_TARGET,
};

/// hprice - Clean housing data and predict sale prices with RidgeCV and LassoCV
#[derive(Parser, Debug)]
#[command(name = "hprice")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Training table (CSV or Parquet) with the target column
    #[arg(long)]
    pub train: Option<PathBuf>,

    /// Test table (CSV or Parquet) to predict, same columns minus the target
    #[arg(long)]
    pub test: Option<PathBuf>,

    /// Directory receiving the prediction files, coefficient ranking and run report
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Row identifier column, carried through to the prediction files
    #[arg(long, default_value = DEFAULT_ID_COLUMN)]
    pub id_column: String,

    /// Target column name (sale price) in the training table
    #[arg(short, long, default_value = DEFAULT_TARGET)]
    pub target: String,

    /// Numeric columns with fewer distinct values than this are treated as categorical
    #[arg(long, default_value_t = DEFAULT_CARDINALITY_THRESHOLD, value_parser = validate_cardinality_threshold)]
    pub cardinality_threshold: usize,

    /// Continuous columns with skewness above this value are log(1+x) transformed
    #[arg(long, default_value_t = DEFAULT_SKEW_THRESHOLD)]
    pub skew_threshold: f64,

    /// Candidate ridge strengths (comma-separated)
    #[arg(
        long,
        value_delimiter = ',',
        default_values_t = DEFAULT_RIDGE_ALPHAS.to_vec(),
        value_parser = validate_alpha
    )]
    pub ridge_alphas: Vec<f64>,

    /// Candidate lasso strengths (comma-separated)
    #[arg(
        long,
        value_delimiter = ',',
        default_values_t = DEFAULT_LASSO_ALPHAS.to_vec(),
        value_parser = validate_alpha
    )]
    pub lasso_alphas: Vec<f64>,

    /// Number of folds for lasso cross-validation
    #[arg(long, default_value = "5", value_parser = validate_cv_folds)]
    pub cv_folds: usize,

    /// Shuffle rows with this seed before cutting lasso folds.
    /// Without it, folds are contiguous blocks in row order.
    #[arg(long)]
    pub cv_seed: Option<u64>,

    /// Maximum coordinate-descent passes per lasso fit
    #[arg(long, default_value = "1000")]
    pub lasso_max_iter: usize,

    /// Lasso convergence tolerance (relative to the largest weight)
    #[arg(long, default_value = "1e-4")]
    pub lasso_tol: f64,

    /// Fill missing test values with training-table means
    /// instead of the test table's own means
    #[arg(long, default_value = "false")]
    pub impute_from_train: bool,

    /// Number of features shown per side of the coefficient ranking
    #[arg(long, default_value = "10")]
    pub top_features: usize,

    /// Skip writing run_report.json
    #[arg(long, default_value = "false")]
    pub no_report: bool,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan.
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show column classes and skewness of one table
    Inspect {
        /// Table to inspect (CSV or Parquet)
        input: PathBuf,

        /// Row identifier column (ignored by classification)
        #[arg(long, default_value = DEFAULT_ID_COLUMN)]
        id_column: String,

        /// Further columns to ignore, e.g. the target (comma-separated)
        #[arg(long, value_delimiter = ',', default_value = DEFAULT_TARGET)]
        exclude: Vec<String>,

        /// Numeric columns with fewer distinct values than this are treated as categorical
        #[arg(long, default_value_t = DEFAULT_CARDINALITY_THRESHOLD, value_parser = validate_cardinality_threshold)]
        cardinality_threshold: usize,

        /// Continuous columns with skewness above this value would be transformed
        #[arg(long, default_value_t = DEFAULT_SKEW_THRESHOLD)]
        skew_threshold: f64,

        /// Number of rows to use for schema inference (CSV only)
        #[arg(long, default_value = "10000")]
        infer_schema_length: usize,
    },
}

impl Cli {
    /// Training and test paths, required unless a subcommand runs
    pub fn inputs(&self) -> anyhow::Result<(&PathBuf, &PathBuf)> {
        let train = self.train.as_ref().ok_or_else(|| {
            anyhow::anyhow!("Training file is required. Use --train to specify a file.")
        })?;
        let test = self.test.as_ref().ok_or_else(|| {
            anyhow::anyhow!("Test file is required. Use --test to specify a file.")
        })?;
        Ok((train, test))
    }

    pub fn cleaning_config(&self) -> CleaningConfig {
        CleaningConfig {
            id_column: self.id_column.clone(),
            cardinality_threshold: self.cardinality_threshold,
            skew_threshold: self.skew_threshold,
            impute_from_train: self.impute_from_train,
        }
    }

    pub fn regression_config(&self) -> RegressionConfig {
        RegressionConfig {
            ridge_alphas: self.ridge_alphas.clone(),
            lasso_alphas: self.lasso_alphas.clone(),
            cv_folds: self.cv_folds,
            cv_seed: self.cv_seed,
            lasso_max_iter: self.lasso_max_iter,
            lasso_tol: self.lasso_tol,
        }
    }

    pub fn output_file(&self, name: &str) -> PathBuf {
        self.output_dir.join(name)
    }
}

/// Validator for regularization strengths
fn validate_alpha(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !value.is_finite() || value <= 0.0 {
        Err(format!(
            "regularization strength must be a finite positive number, got {}",
            value
        ))
    } else {
        Ok(value)
    }
}

/// Validator for cv_folds parameter
fn validate_cv_folds(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid count", s))?;

    if value < 2 {
        Err(format!("cv_folds must be at least 2, got {}", value))
    } else {
        Ok(value)
    }
}

/// Validator for cardinality_threshold parameter
fn validate_cardinality_threshold(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid count", s))?;

    if value < 1 {
        Err(format!(
            "cardinality_threshold must be at least 1, got {}",
            value
        ))
    } else {
        Ok(value)
    }
}
