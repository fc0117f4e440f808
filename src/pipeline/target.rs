//! Target column handling
//!
//! The sale price is modelled on a log scale: training targets are
//! `log(1+y)` and predictions are mapped back with `exp(x)-1`.

use anyhow::{Context, Result};
use polars::prelude::*;

use super::error::PipelineError;

/// Default name of the target column
pub const DEFAULT_TARGET: &str = "SalePrice";

/// Forward target transform
#[inline]
pub fn to_log_scale(value: f64) -> f64 {
    value.ln_1p()
}

/// Inverse of [`to_log_scale`]
#[inline]
pub fn from_log_scale(value: f64) -> f64 {
    value.exp_m1()
}

/// Split the target column off the training table.
///
/// # Returns
/// The table without the target, and the target on the log scale.
///
/// # Errors
/// The target column is absent, has a missing value, or has a value that
/// `log(1+y)` cannot take (`y <= -1`).
pub fn extract_target(df: &DataFrame, target: &str) -> Result<(DataFrame, Vec<f64>)> {
    let column = df.column(target).map_err(|_| PipelineError::MissingColumn {
        column: target.to_string(),
    })?;

    let as_float = column
        .cast(&DataType::Float64)
        .with_context(|| format!("Target column '{}' must be numeric", target))?;

    let mut values = Vec::with_capacity(as_float.len());
    for (row, value) in as_float.f64()?.into_iter().enumerate() {
        let value = value.ok_or_else(|| PipelineError::MissingValues {
            stage: format!("target extraction (row {})", row),
            column: target.to_string(),
        })?;
        if !value.is_finite() || value <= -1.0 {
            anyhow::bail!(
                "Target column '{}' has value {} at row {}; log(1+y) needs y > -1",
                target,
                value,
                row
            );
        }
        values.push(to_log_scale(value));
    }

    let features = df
        .drop(target)
        .with_context(|| format!("Failed to drop target column '{}'", target))?;

    Ok((features, values))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_scale_round_trip() {
        for &v in &[0.0, 1.0, 12_345.0, 755_000.0] {
            assert!((from_log_scale(to_log_scale(v)) - v).abs() < 1e-6 * v.max(1.0));
        }
    }

    #[test]
    fn test_extract_target_drops_column() {
        let df = df! {
            "Id" => [1i64, 2],
            "SalePrice" => [100_000.0f64, 200_000.0],
        }
        .unwrap();
        let (features, target) = extract_target(&df, "SalePrice").unwrap();
        assert_eq!(features.width(), 1);
        assert!((target[0] - 100_001.0f64.ln()).abs() < 1e-9);
    }

    #[test]
    fn test_missing_target_value_errors() {
        let df = df! {
            "SalePrice" => [Some(1.0f64), None],
        }
        .unwrap();
        let err = extract_target(&df, "SalePrice").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::MissingValues { .. })
        ));
    }
}
