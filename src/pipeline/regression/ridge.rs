//! Ridge regression with leave-one-out selection of the penalty

use anyhow::Result;
use faer::linalg::solvers::SpSolver;
use faer::{Mat, Side};

use super::linalg;
use super::{
    validate_candidates, validate_fit_input, CvDiagnostics, CvRegressor, FittedModel, ModelKind,
};
use crate::pipeline::error::PipelineError;
use crate::pipeline::matrix::DesignMatrix;

/// Ridge solution at one strength with its leave-one-out error
#[derive(Debug, Clone)]
pub struct RidgeLoo {
    pub alpha: f64,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    /// Mean squared leave-one-out error
    pub loo_mse: f64,
}

/// Centered data and the Gram matrix, shared across strengths
struct CenteredProblem {
    xc: Mat<f64>,
    x_mean: Vec<f64>,
    yc: Vec<f64>,
    y_mean: f64,
    gram: Mat<f64>,
    xty: Vec<f64>,
}

impl CenteredProblem {
    fn new(x: &Mat<f64>, y: &[f64]) -> Self {
        let (xc, x_mean) = linalg::center_columns(x);
        let (yc, y_mean) = linalg::center(y);
        let gram = xc.transpose() * &xc;
        let xty = linalg::transpose_times(&xc, &yc);
        Self {
            xc,
            x_mean,
            yc,
            y_mean,
            gram,
            xty,
        }
    }

    /// Solve `(Xc^T Xc + alpha I) w = Xc^T yc` and score it by leave-one-out.
    ///
    /// The intercept is unpenalized, so the hat diagonal is
    /// `1/n + xc_i^T (Xc^T Xc + alpha I)^-1 xc_i` and the leave-one-out
    /// residual is `r_i / (1 - h_ii)`.
    fn solve(&self, alpha: f64) -> Result<RidgeLoo, PipelineError> {
        let n = self.yc.len();
        let p = self.xty.len();

        let mut penalized = self.gram.clone();
        for j in 0..p {
            penalized[(j, j)] += alpha;
        }
        let chol = penalized
            .cholesky(Side::Lower)
            .map_err(|_| PipelineError::NotPositiveDefinite { alpha })?;

        let coefficients = linalg::first_column(&chol.solve(linalg::column(&self.xty).as_ref()));
        let intercept = self.y_mean - linalg::dot(&self.x_mean, &coefficients);

        let fitted = linalg::affine(&self.xc, &coefficients, 0.0);
        // Column i is (Xc^T Xc + alpha I)^-1 xc_i
        let hat_solve = chol.solve(self.xc.transpose());

        let inv_n = 1.0 / n as f64;
        let mut sum_sq = 0.0;
        for i in 0..n {
            let residual = self.yc[i] - fitted[i];
            let leverage = inv_n
                + (0..p)
                    .map(|j| self.xc[(i, j)] * hat_solve[(j, i)])
                    .sum::<f64>();
            let denom = 1.0 - leverage;
            if denom <= f64::EPSILON {
                return Err(PipelineError::NonFinite {
                    stage: format!("ridge leave-one-out at alpha = {}", alpha),
                    column: format!("row {}", i),
                });
            }
            let loo = residual / denom;
            sum_sq += loo * loo;
        }

        Ok(RidgeLoo {
            alpha,
            coefficients,
            intercept,
            loo_mse: sum_sq / n as f64,
        })
    }
}

/// Fit ridge at one strength and compute its mean leave-one-out error.
///
/// Needs at least two rows.
pub fn ridge_loo(x: &Mat<f64>, y: &[f64], alpha: f64) -> Result<RidgeLoo, PipelineError> {
    if x.nrows() != y.len() {
        return Err(PipelineError::dimension_mismatch("ridge fit", x.nrows(), y.len()));
    }
    if y.len() < 2 {
        return Err(PipelineError::TooFewRows {
            rows: y.len(),
            folds: 2,
        });
    }
    CenteredProblem::new(x, y).solve(alpha)
}

/// Ridge regression choosing its strength by leave-one-out error
#[derive(Debug, Clone)]
pub struct RidgeCv {
    alphas: Vec<f64>,
}

impl RidgeCv {
    pub fn new(alphas: Vec<f64>) -> Self {
        Self { alphas }
    }

    pub fn alphas(&self) -> &[f64] {
        &self.alphas
    }
}

impl CvRegressor for RidgeCv {
    fn kind(&self) -> ModelKind {
        ModelKind::Ridge
    }

    fn fit(&self, x: &DesignMatrix, y: &[f64]) -> Result<FittedModel> {
        validate_candidates(self.kind(), &self.alphas)?;
        validate_fit_input(self.kind(), x, y)?;
        if y.len() < 2 {
            return Err(PipelineError::TooFewRows {
                rows: y.len(),
                folds: 2,
            }
            .into());
        }

        let problem = CenteredProblem::new(x.values(), y);
        let mut best: Option<RidgeLoo> = None;
        let mut mean_errors = Vec::with_capacity(self.alphas.len());

        for &alpha in &self.alphas {
            let solution = problem.solve(alpha)?;
            mean_errors.push(solution.loo_mse);
            let better = match &best {
                Some(current) => solution.loo_mse < current.loo_mse,
                None => true,
            };
            if better {
                best = Some(solution);
            }
        }

        let best = best.ok_or_else(|| PipelineError::EmptyCandidates {
            model: self.kind().to_string(),
        })?;

        Ok(FittedModel::new(
            self.kind(),
            x.columns().to_vec(),
            best.coefficients,
            best.intercept,
            best.alpha,
            CvDiagnostics {
                alphas: self.alphas.clone(),
                mean_errors,
                fold_errors: None,
                iterations: None,
                converged: None,
            },
        ))
    }
}
