//! Cross-validated regularized linear regression
//!
//! Two trainers share one contract ([`CvRegressor`]): given a design matrix,
//! a target vector and a grid of regularization strengths, pick the strength
//! with the lowest cross-validated mean squared error and fit the final
//! coefficients at that strength.
//!
//! - [`RidgeCv`]: L2 penalty, leave-one-out error in closed form
//! - [`LassoCv`]: L1 penalty, k-fold error, coordinate descent

mod folds;
mod lasso;
mod linalg;
mod ridge;

use anyhow::Result;
use serde::Serialize;

use super::error::PipelineError;
use super::matrix::DesignMatrix;

pub use folds::{k_fold, Fold};
pub use lasso::{lasso_fit, LassoCv, LassoFit};
pub use ridge::{ridge_loo, RidgeCv, RidgeLoo};

/// Ridge strengths tried by default
pub const DEFAULT_RIDGE_ALPHAS: [f64; 20] = [
    0.05, 0.1, 0.3, 1.0, 3.0, 5.0, 6.0, 7.0, 7.5, 8.0, 8.5, 9.0, 10.0, 11.0, 12.0, 15.0, 30.0,
    50.0, 75.0, 100.0,
];

/// Lasso strengths tried by default
pub const DEFAULT_LASSO_ALPHAS: [f64; 8] = [1.0, 0.5, 0.1, 0.02, 0.001, 0.0003, 0.0004, 0.0005];

/// Settings for both trainers
#[derive(Debug, Clone, Serialize)]
pub struct RegressionConfig {
    pub ridge_alphas: Vec<f64>,
    pub lasso_alphas: Vec<f64>,
    pub cv_folds: usize,
    /// Shuffle rows with this seed before cutting lasso folds
    pub cv_seed: Option<u64>,
    pub lasso_max_iter: usize,
    pub lasso_tol: f64,
}

impl Default for RegressionConfig {
    fn default() -> Self {
        Self {
            ridge_alphas: DEFAULT_RIDGE_ALPHAS.to_vec(),
            lasso_alphas: DEFAULT_LASSO_ALPHAS.to_vec(),
            cv_folds: 5,
            cv_seed: None,
            lasso_max_iter: 1000,
            lasso_tol: 1e-4,
        }
    }
}

impl RegressionConfig {
    pub fn ridge(&self) -> RidgeCv {
        RidgeCv::new(self.ridge_alphas.clone())
    }

    pub fn lasso(&self) -> LassoCv {
        LassoCv::new(self.lasso_alphas.clone())
            .with_folds(self.cv_folds)
            .with_seed(self.cv_seed)
            .with_max_iter(self.lasso_max_iter)
            .with_tol(self.lasso_tol)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ModelKind {
    Ridge,
    Lasso,
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelKind::Ridge => write!(f, "RidgeCV"),
            ModelKind::Lasso => write!(f, "LassoCV"),
        }
    }
}

/// Cross-validation record kept with a fitted model
#[derive(Debug, Clone, Serialize)]
pub struct CvDiagnostics {
    /// Candidate strengths in the order they were given
    pub alphas: Vec<f64>,
    /// Mean CV squared error per candidate
    pub mean_errors: Vec<f64>,
    /// Per-candidate, per-fold errors (k-fold only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fold_errors: Option<Vec<Vec<f64>>>,
    /// Coordinate-descent iterations of the final fit (lasso only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iterations: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub converged: Option<bool>,
}

/// Parameters of a trained model. Immutable once built.
#[derive(Debug, Clone)]
pub struct FittedModel {
    kind: ModelKind,
    feature_names: Vec<String>,
    coefficients: Vec<f64>,
    intercept: f64,
    alpha: f64,
    cv: CvDiagnostics,
}

impl FittedModel {
    pub(crate) fn new(
        kind: ModelKind,
        feature_names: Vec<String>,
        coefficients: Vec<f64>,
        intercept: f64,
        alpha: f64,
        cv: CvDiagnostics,
    ) -> Self {
        Self {
            kind,
            feature_names,
            coefficients,
            intercept,
            alpha,
            cv,
        }
    }

    /// Predict (on the log scale) for every row of `x`.
    ///
    /// # Errors
    /// `x` must have the fitted column count, and the same column names in
    /// the same order.
    pub fn predict(&self, x: &DesignMatrix) -> Result<Vec<f64>> {
        let stage = format!("{} prediction", self.kind);
        if x.cols() != self.coefficients.len() {
            return Err(
                PipelineError::dimension_mismatch(&stage, self.coefficients.len(), x.cols()).into(),
            );
        }
        if let Some((_, actual)) = self
            .feature_names
            .iter()
            .zip(x.columns())
            .find(|(expected, actual)| expected != actual)
        {
            return Err(PipelineError::schema_mismatch(&stage, actual).into());
        }

        Ok(linalg::affine(x.values(), &self.coefficients, self.intercept))
    }

    /// Feature name and weight, in feature order
    pub fn coefficients(&self) -> Vec<(String, f64)> {
        self.feature_names
            .iter()
            .cloned()
            .zip(self.coefficients.iter().copied())
            .collect()
    }

    pub fn nonzero_coefficients(&self) -> usize {
        self.coefficients.iter().filter(|&&w| w != 0.0).count()
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// The chosen regularization strength
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn cv(&self) -> &CvDiagnostics {
        &self.cv
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }
}

/// A regressor that chooses its own strength by cross-validation
pub trait CvRegressor {
    fn kind(&self) -> ModelKind;

    /// Fit on `x` against `y` (one target per row).
    fn fit(&self, x: &DesignMatrix, y: &[f64]) -> Result<FittedModel>;
}

/// Reject an empty grid or a strength that is not finite and positive.
fn validate_candidates(kind: ModelKind, alphas: &[f64]) -> Result<(), PipelineError> {
    if alphas.is_empty() {
        return Err(PipelineError::EmptyCandidates {
            model: kind.to_string(),
        });
    }
    if let Some(&alpha) = alphas.iter().find(|a| !a.is_finite() || **a <= 0.0) {
        return Err(PipelineError::InvalidStrength {
            model: kind.to_string(),
            alpha,
        });
    }
    Ok(())
}

/// Row counts of features and target must agree and the target must be
/// finite.
fn validate_fit_input(kind: ModelKind, x: &DesignMatrix, y: &[f64]) -> Result<(), PipelineError> {
    let stage = format!("{} fit", kind);
    if x.rows() != y.len() {
        return Err(PipelineError::dimension_mismatch(&stage, x.rows(), y.len()));
    }
    if y.iter().any(|v| !v.is_finite()) {
        return Err(PipelineError::NonFinite {
            stage,
            column: "target".to_string(),
        });
    }
    Ok(())
}
