//! Missing value imputation by column mean

use std::collections::HashMap;

use anyhow::{Context, Result};
use polars::prelude::*;
use serde::Serialize;

/// Mean of every column over its non-missing values (`None` when a column
/// has no values at all).
#[derive(Debug, Clone, Default, Serialize)]
pub struct ColumnMeans {
    means: HashMap<String, Option<f64>>,
}

impl ColumnMeans {
    pub fn get(&self, column: &str) -> Option<f64> {
        self.means.get(column).copied().flatten()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.means.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.means.len()
    }

    pub fn is_empty(&self) -> bool {
        self.means.is_empty()
    }
}

/// Where fill values come from
#[derive(Debug, Clone, Default)]
pub enum ImputeSource {
    /// Each table is filled with its own column means
    #[default]
    OwnMeans,
    /// Fill with externally supplied means (e.g. computed on the training
    /// table); columns absent from the reference fall back to their own mean
    Reference(ColumnMeans),
}

impl std::fmt::Display for ImputeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImputeSource::OwnMeans => write!(f, "own column means"),
            ImputeSource::Reference(_) => write!(f, "training column means"),
        }
    }
}

fn mean_of(column: &Column) -> Result<Option<f64>> {
    let as_float = column.cast(&DataType::Float64)?;
    let (sum, count) = as_float
        .f64()?
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    Ok(if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    })
}

/// Compute the mean of every column of `df`.
pub fn column_means(df: &DataFrame) -> Result<ColumnMeans> {
    let mut means = HashMap::with_capacity(df.width());
    for column in df.get_columns() {
        let name = column.name().to_string();
        let mean = mean_of(column).with_context(|| format!("Failed to average column '{}'", name))?;
        means.insert(name, mean);
    }
    Ok(ColumnMeans { means })
}

/// Fill missing values in every column of `df` in place.
///
/// Returns the number of cells filled. A column with no values at all and no
/// reference mean stays missing.
pub fn impute_means(df: &mut DataFrame, source: &ImputeSource) -> Result<usize> {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    let mut filled = 0usize;

    for name in names {
        let column = df.column(&name)?;
        if column.null_count() == 0 {
            continue;
        }

        let fill = match source {
            ImputeSource::Reference(means) if means.contains(&name) => means.get(&name),
            _ => mean_of(column)?,
        };
        let Some(fill) = fill else {
            continue;
        };

        let values: Vec<f64> = column
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .map(|v| v.unwrap_or(fill))
            .collect();
        filled += column.null_count();

        df.with_column(Column::new(name.as_str().into(), values))
            .with_context(|| format!("Failed to replace column '{}'", name))?;
    }

    Ok(filled)
}
