//! Column classification
//!
//! Splits a table's feature columns into continuous numeric columns,
//! numeric columns that are really categorical (few distinct values), and
//! text columns. The classification is computed once on the training table
//! and reused for the test table.

use std::collections::HashSet;

use anyhow::{Context, Result};
use polars::prelude::*;
use serde::Serialize;

/// Numeric columns with fewer distinct values than this are categorical.
pub const DEFAULT_CARDINALITY_THRESHOLD: usize = 13;

/// How a feature column is treated by the cleaning steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnKind {
    Continuous,
    CategoricalNumeric,
    CategoricalText,
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnKind::Continuous => write!(f, "continuous"),
            ColumnKind::CategoricalNumeric => write!(f, "categorical (numeric)"),
            ColumnKind::CategoricalText => write!(f, "categorical (text)"),
        }
    }
}

/// Three disjoint sets of column names, each in table order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ColumnClasses {
    pub continuous: Vec<String>,
    pub categorical_numeric: Vec<String>,
    pub categorical_text: Vec<String>,
    /// Numeric categorical columns whose training values are floats; their
    /// indicators are labelled `2.0` rather than `2` in every table
    pub float_categorical: Vec<String>,
}

impl ColumnClasses {
    pub fn kind_of(&self, name: &str) -> Option<ColumnKind> {
        if self.continuous.iter().any(|c| c == name) {
            Some(ColumnKind::Continuous)
        } else if self.categorical_numeric.iter().any(|c| c == name) {
            Some(ColumnKind::CategoricalNumeric)
        } else if self.categorical_text.iter().any(|c| c == name) {
            Some(ColumnKind::CategoricalText)
        } else {
            None
        }
    }

    /// Columns to one-hot encode: text columns first, then numeric ones.
    pub fn categorical(&self) -> impl Iterator<Item = &String> {
        self.categorical_text
            .iter()
            .chain(self.categorical_numeric.iter())
    }

    pub fn is_categorical(&self, name: &str) -> bool {
        self.categorical().any(|c| c == name)
    }

    pub fn has_float_labels(&self, name: &str) -> bool {
        self.float_categorical.iter().any(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.continuous.len() + self.categorical_numeric.len() + self.categorical_text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A column is text-typed when its dtype is not a primitive numeric type.
pub fn is_text_column(column: &Column) -> bool {
    !column.dtype().is_primitive_numeric()
}

/// Count distinct non-missing values of a column.
pub fn distinct_count(column: &Column) -> Result<usize> {
    if is_text_column(column) {
        let as_text = column.cast(&DataType::String)?;
        let values: HashSet<&str> = as_text.str()?.into_iter().flatten().collect();
        Ok(values.len())
    } else {
        let as_float = column.cast(&DataType::Float64)?;
        let values: HashSet<u64> = as_float
            .f64()?
            .into_iter()
            .flatten()
            // +0.0 and -0.0 are the same category
            .map(|v| if v == 0.0 { 0.0f64.to_bits() } else { v.to_bits() })
            .collect();
        Ok(values.len())
    }
}

/// Classify every column of `df` not named in `exclude`.
///
/// # Arguments
/// * `df` - Table to inspect
/// * `exclude` - Columns that are not features (row identifier, target)
/// * `cardinality_threshold` - Numeric columns with strictly fewer distinct
///   values are categorical
pub fn classify_columns(
    df: &DataFrame,
    exclude: &[&str],
    cardinality_threshold: usize,
) -> Result<ColumnClasses> {
    let mut classes = ColumnClasses::default();

    if df.height() == 0 {
        return Ok(classes);
    }

    for column in df.get_columns() {
        let name = column.name().as_str();
        if exclude.contains(&name) {
            continue;
        }

        if is_text_column(column) {
            classes.categorical_text.push(name.to_string());
            continue;
        }

        let distinct = distinct_count(column)
            .with_context(|| format!("Failed to count distinct values of '{}'", name))?;
        if distinct < cardinality_threshold {
            classes.categorical_numeric.push(name.to_string());
            if matches!(column.dtype(), DataType::Float32 | DataType::Float64) {
                classes.float_categorical.push(name.to_string());
            }
        } else {
            classes.continuous.push(name.to_string());
        }
    }

    Ok(classes)
}
