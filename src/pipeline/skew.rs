//! Skewness analysis and log transform of skewed continuous features
//!
//! Skewness is measured on the training table only. The selected columns are
//! recorded and the identical `log(1+x)` transform is replayed on the test
//! table.

use anyhow::{Context, Result};
use polars::prelude::*;
use serde::Serialize;

use super::error::PipelineError;

/// Continuous columns with skewness strictly above this are log-transformed.
pub const DEFAULT_SKEW_THRESHOLD: f64 = 0.7;

/// Skewness measured for one continuous column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSkew {
    pub column: String,
    /// `None` when the column has no non-missing values
    pub skewness: Option<f64>,
}

/// Skewness of every continuous training column plus the frozen selection
#[derive(Debug, Clone, Default, Serialize)]
pub struct SkewRecord {
    pub threshold: f64,
    pub measured: Vec<ColumnSkew>,
    pub selected: Vec<String>,
}

impl SkewRecord {
    pub fn is_selected(&self, column: &str) -> bool {
        self.selected.iter().any(|c| c == column)
    }

    /// Selected columns with their skewness, most skewed first
    pub fn selected_with_skewness(&self) -> Vec<(String, f64)> {
        let mut out: Vec<(String, f64)> = self
            .measured
            .iter()
            .filter(|m| self.is_selected(&m.column))
            .filter_map(|m| m.skewness.map(|s| (m.column.clone(), s)))
            .collect();
        out.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        out
    }
}

/// Biased sample skewness `m3 / m2^(3/2)` over the present values.
///
/// Returns `None` for an empty slice and `0.0` for a constant one.
pub fn skewness(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;

    let (mut m2, mut m3) = (0.0, 0.0);
    for &v in values {
        let d = v - mean;
        m2 += d * d;
        m3 += d * d * d;
    }
    m2 /= n;
    m3 /= n;

    if m2 == 0.0 {
        return Some(0.0);
    }
    Some(m3 / m2.powf(1.5))
}

/// Skewness of a numeric column, ignoring missing values.
pub fn column_skewness(column: &Column) -> Result<Option<f64>> {
    let as_float = column
        .cast(&DataType::Float64)
        .with_context(|| format!("Column '{}' is not numeric", column.name()))?;
    let values: Vec<f64> = as_float.f64()?.into_iter().flatten().collect();
    Ok(skewness(&values))
}

/// Names whose skewness is strictly greater than `threshold`.
pub fn select_skewed(measured: &[ColumnSkew], threshold: f64) -> Vec<String> {
    measured
        .iter()
        .filter(|m| matches!(m.skewness, Some(s) if s > threshold))
        .map(|m| m.column.clone())
        .collect()
}

/// Measure skewness of the continuous training columns and freeze the
/// selection.
pub fn fit_skew(df: &DataFrame, continuous: &[String], threshold: f64) -> Result<SkewRecord> {
    let mut measured = Vec::with_capacity(continuous.len());
    for name in continuous {
        let column = df
            .column(name)
            .with_context(|| format!("Continuous column '{}' not found", name))?;
        measured.push(ColumnSkew {
            column: name.clone(),
            skewness: column_skewness(column)?,
        });
    }

    let selected = select_skewed(&measured, threshold);
    Ok(SkewRecord {
        threshold,
        measured,
        selected,
    })
}

/// Apply `log(1+x)` to one column, keeping missing values missing.
pub fn log1p_column(column: &Column) -> Result<Column> {
    let as_float = column
        .cast(&DataType::Float64)
        .with_context(|| format!("Column '{}' is not numeric", column.name()))?;
    let values: Vec<Option<f64>> = as_float
        .f64()?
        .into_iter()
        .map(|v| v.map(f64::ln_1p))
        .collect();
    Ok(Column::new(column.name().clone(), values))
}

/// Replay the recorded transform on `df`.
///
/// Every selected column must be present; an absent one is a schema
/// mismatch, never a silent skip. A value `log(1+x)` cannot take
/// (`x <= -1`) is reported against the column here rather than surfacing
/// later as a non-finite feature.
pub fn apply_skew(df: &mut DataFrame, record: &SkewRecord) -> Result<()> {
    for name in &record.selected {
        let column = df
            .column(name)
            .map_err(|_| PipelineError::schema_mismatch("skew transform", name))?;
        let transformed = log1p_column(column)?;
        if transformed.f64()?.into_iter().flatten().any(|v| !v.is_finite()) {
            return Err(PipelineError::NonFinite {
                stage: "skew transform".to_string(),
                column: name.clone(),
            }
            .into());
        }
        df.with_column(transformed)
            .with_context(|| format!("Failed to replace column '{}'", name))?;
    }
    Ok(())
}
