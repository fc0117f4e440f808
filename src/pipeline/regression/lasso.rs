//! Lasso regression by cyclic coordinate descent, with k-fold selection of
//! the penalty

use anyhow::Result;
use faer::Mat;

use super::folds::k_fold;
use super::linalg;
use super::{
    validate_candidates, validate_fit_input, CvDiagnostics, CvRegressor, FittedModel, ModelKind,
};
use crate::pipeline::error::PipelineError;
use crate::pipeline::matrix::DesignMatrix;

/// Result of one coordinate-descent fit
#[derive(Debug, Clone)]
pub struct LassoFit {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    pub iterations: usize,
    pub converged: bool,
}

#[inline]
fn soft_threshold(value: f64, threshold: f64) -> f64 {
    if value > threshold {
        value - threshold
    } else if value < -threshold {
        value + threshold
    } else {
        0.0
    }
}

/// Minimize `(1/2n) ||y - Xw - b||^2 + alpha ||w||_1`.
///
/// The intercept is unpenalized (features and target are centered). A
/// zero-variance column keeps a zero weight. Iteration stops once the largest
/// weight change is at most `tol` times the largest weight.
///
/// # Arguments
/// * `warm_start` - Initial weights, e.g. the solution at a larger strength
pub fn lasso_fit(
    x: &Mat<f64>,
    y: &[f64],
    alpha: f64,
    max_iter: usize,
    tol: f64,
    warm_start: Option<&[f64]>,
) -> LassoFit {
    let n = x.nrows();
    let p = x.ncols();
    let (xc, x_mean) = linalg::center_columns(x);
    let (yc, y_mean) = linalg::center(y);

    // Column-major copies keep the inner loops on contiguous memory
    let columns: Vec<Vec<f64>> = (0..p)
        .map(|j| (0..n).map(|i| xc[(i, j)]).collect())
        .collect();
    let norms: Vec<f64> = columns.iter().map(|c| linalg::dot(c, c)).collect();

    let mut w = match warm_start {
        Some(init) if init.len() == p => init.to_vec(),
        _ => vec![0.0; p],
    };
    for j in 0..p {
        if norms[j] == 0.0 {
            w[j] = 0.0;
        }
    }

    let mut residual = yc.clone();
    for (j, column) in columns.iter().enumerate() {
        if w[j] != 0.0 {
            for (r, xij) in residual.iter_mut().zip(column) {
                *r -= xij * w[j];
            }
        }
    }

    let threshold = alpha * n as f64;
    let mut iterations = 0;
    let mut converged = p == 0;

    while iterations < max_iter && !converged {
        iterations += 1;
        let mut max_delta = 0.0f64;
        let mut max_weight = 0.0f64;

        for (j, column) in columns.iter().enumerate() {
            if norms[j] == 0.0 {
                continue;
            }
            let old = w[j];
            let rho = linalg::dot(column, &residual) + norms[j] * old;
            let new = soft_threshold(rho, threshold) / norms[j];

            if new != old {
                let delta = old - new;
                for (r, xij) in residual.iter_mut().zip(column) {
                    *r += xij * delta;
                }
                w[j] = new;
            }
            max_delta = max_delta.max((new - old).abs());
            max_weight = max_weight.max(new.abs());
        }

        converged = max_delta == 0.0 || max_delta <= tol * max_weight;
    }

    let intercept = y_mean - linalg::dot(&x_mean, &w);
    LassoFit {
        coefficients: w,
        intercept,
        iterations,
        converged,
    }
}

/// Lasso regression choosing its strength by k-fold error
#[derive(Debug, Clone)]
pub struct LassoCv {
    alphas: Vec<f64>,
    folds: usize,
    seed: Option<u64>,
    max_iter: usize,
    tol: f64,
}

impl LassoCv {
    pub fn new(alphas: Vec<f64>) -> Self {
        Self {
            alphas,
            folds: 5,
            seed: None,
            max_iter: 1000,
            tol: 1e-4,
        }
    }

    pub fn with_folds(mut self, folds: usize) -> Self {
        self.folds = folds;
        self
    }

    /// Shuffle rows with `seed` before cutting folds; `None` keeps row order.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    pub fn alphas(&self) -> &[f64] {
        &self.alphas
    }

    /// Candidate indices from the largest strength to the smallest, the
    /// order in which warm starts help most.
    fn descending_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.alphas.len()).collect();
        order.sort_by(|&a, &b| {
            self.alphas[b]
                .partial_cmp(&self.alphas[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        order
    }
}

impl CvRegressor for LassoCv {
    fn kind(&self) -> ModelKind {
        ModelKind::Lasso
    }

    fn fit(&self, x: &DesignMatrix, y: &[f64]) -> Result<FittedModel> {
        validate_candidates(self.kind(), &self.alphas)?;
        validate_fit_input(self.kind(), x, y)?;

        let folds = k_fold(y.len(), self.folds, self.seed)?;
        let order = self.descending_order();
        let mut fold_errors = vec![vec![0.0; folds.len()]; self.alphas.len()];

        for (fold_idx, fold) in folds.iter().enumerate() {
            let x_train = linalg::select_rows(x.values(), &fold.train);
            let y_train: Vec<f64> = fold.train.iter().map(|&i| y[i]).collect();
            let x_test = linalg::select_rows(x.values(), &fold.test);
            let y_test: Vec<f64> = fold.test.iter().map(|&i| y[i]).collect();

            let mut warm: Option<Vec<f64>> = None;
            for &alpha_idx in &order {
                let fit = lasso_fit(
                    &x_train,
                    &y_train,
                    self.alphas[alpha_idx],
                    self.max_iter,
                    self.tol,
                    warm.as_deref(),
                );
                let predicted = linalg::affine(&x_test, &fit.coefficients, fit.intercept);
                fold_errors[alpha_idx][fold_idx] = linalg::mean_squared_error(&y_test, &predicted);
                warm = Some(fit.coefficients);
            }
        }

        let mean_errors: Vec<f64> = fold_errors
            .iter()
            .map(|errors| errors.iter().sum::<f64>() / errors.len() as f64)
            .collect();

        // Ties go to the larger strength
        let mut best_idx = order[0];
        for &alpha_idx in &order[1..] {
            if mean_errors[alpha_idx] < mean_errors[best_idx] {
                best_idx = alpha_idx;
            }
        }
        if !mean_errors[best_idx].is_finite() {
            return Err(PipelineError::NonFinite {
                stage: "lasso cross-validation".to_string(),
                column: format!("alpha = {}", self.alphas[best_idx]),
            }
            .into());
        }

        let alpha = self.alphas[best_idx];
        let fit = lasso_fit(x.values(), y, alpha, self.max_iter, self.tol, None);

        Ok(FittedModel::new(
            self.kind(),
            x.columns().to_vec(),
            fit.coefficients,
            fit.intercept,
            alpha,
            CvDiagnostics {
                alphas: self.alphas.clone(),
                mean_errors,
                fold_errors: Some(fold_errors),
                iterations: Some(fit.iterations),
                converged: Some(fit.converged),
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soft_threshold() {
        assert_eq!(soft_threshold(3.0, 1.0), 2.0);
        assert_eq!(soft_threshold(-3.0, 1.0), -2.0);
        assert_eq!(soft_threshold(0.5, 1.0), 0.0);
    }

    #[test]
    fn test_constant_column_gets_zero_weight() {
        let mut x = Mat::<f64>::zeros(4, 2);
        for i in 0..4 {
            x[(i, 0)] = i as f64;
            x[(i, 1)] = 7.0;
        }
        let y = [1.0, 3.0, 5.0, 7.0];
        let fit = lasso_fit(&x, &y, 1e-6, 1000, 1e-8, None);
        assert_eq!(fit.coefficients[1], 0.0);
        assert!((fit.coefficients[0] - 2.0).abs() < 1e-3);
        assert!(fit.converged);
    }
}
