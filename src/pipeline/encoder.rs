//! One-hot encoding and train/test schema alignment
//!
//! Categorical columns (text and low-cardinality numeric) are expanded into
//! one indicator column per observed value, named `<column>_<value>`. The
//! row identifier is pulled out of the feature set and carried separately.
//! The training table's encoded column list becomes the canonical schema the
//! test table is reindexed onto.

use std::collections::{BTreeSet, HashMap};

use anyhow::{Context, Result};
use polars::prelude::*;
use serde::Serialize;

use super::error::PipelineError;
use super::schema::{is_text_column, ColumnClasses};

/// Where the values of an encoded column came from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ColumnSource {
    /// A feature column copied through unchanged
    Passthrough(String),
    /// Indicator for `column == value`
    Indicator { column: String, value: String },
}

impl std::fmt::Display for ColumnSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnSource::Passthrough(column) => write!(f, "{}", column),
            ColumnSource::Indicator { column, value } => write!(f, "{}={}", column, value),
        }
    }
}

/// One output column and every source that was merged into it, in the order
/// they were produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnGroup {
    pub name: String,
    pub sources: Vec<ColumnSource>,
}

/// Order-preserving index from encoded column name to its sources.
///
/// Two sources can produce the same name (a raw column literally called
/// `Street_Pave` next to the `Street=Pave` indicator). They are resolved into
/// a single group; per row the first non-missing member value wins.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ColumnGroups {
    groups: Vec<ColumnGroup>,
}

impl ColumnGroups {
    pub fn groups(&self) -> &[ColumnGroup] {
        &self.groups
    }

    /// Groups fed by more than one source
    pub fn collisions(&self) -> Vec<&ColumnGroup> {
        self.groups.iter().filter(|g| g.sources.len() > 1).collect()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Accumulates encoded columns, merging name collisions into one group.
#[derive(Default)]
struct GroupBuilder {
    index: HashMap<String, usize>,
    groups: ColumnGroups,
    values: Vec<Vec<Option<f64>>>,
}

impl GroupBuilder {
    fn add(&mut self, name: String, source: ColumnSource, values: Vec<Option<f64>>) {
        if let Some(&slot) = self.index.get(&name) {
            let merged = &mut self.values[slot];
            for (existing, incoming) in merged.iter_mut().zip(values) {
                if existing.is_none() {
                    *existing = incoming;
                }
            }
            self.groups.groups[slot].sources.push(source);
            return;
        }

        self.index.insert(name.clone(), self.values.len());
        self.groups.groups.push(ColumnGroup {
            name,
            sources: vec![source],
        });
        self.values.push(values);
    }

    fn finish(self) -> Result<(DataFrame, ColumnGroups)> {
        let columns: Vec<Column> = self
            .groups
            .groups
            .iter()
            .zip(self.values)
            .map(|(group, values)| Column::new(group.name.as_str().into(), values))
            .collect();
        let frame = DataFrame::new(columns).context("Failed to assemble encoded table")?;
        Ok((frame, self.groups))
    }
}

/// An encoded feature table indexed by row identifier
#[derive(Debug, Clone)]
pub struct EncodedTable {
    /// Row identifiers, one per row of `features`
    pub ids: Vec<i64>,
    /// Numeric feature columns (Float64)
    pub features: DataFrame,
    pub groups: ColumnGroups,
}

impl EncodedTable {
    pub fn rows(&self) -> usize {
        self.ids.len()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.features
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }
}

/// Read the row identifier column as integers.
pub fn extract_ids(df: &DataFrame, id_column: &str) -> Result<Vec<i64>> {
    let column = df.column(id_column).map_err(|_| PipelineError::MissingColumn {
        column: id_column.to_string(),
    })?;
    let as_int = column
        .cast(&DataType::Int64)
        .with_context(|| format!("Identifier column '{}' is not integer", id_column))?;

    as_int
        .i64()?
        .into_iter()
        .enumerate()
        .map(|(row, id)| {
            id.ok_or_else(|| {
                anyhow::anyhow!(
                    "Identifier column '{}' has a missing value at row {}",
                    id_column,
                    row
                )
            })
        })
        .collect()
}

/// Label used in an indicator name for a float category value.
fn float_label(value: f64) -> String {
    // -0.0 and 0.0 are one category
    let value = if value == 0.0 { 0.0 } else { value };
    if value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// Label for a numeric category value.
///
/// `float_labels` is the format frozen from the training column, so an
/// integer-typed test column still matches `2.0` indicators. A fractional
/// value never gets an integer label.
fn numeric_label(value: f64, float_labels: bool) -> String {
    if float_labels || value.fract() != 0.0 || !value.is_finite() {
        float_label(value)
    } else {
        format!("{}", value as i64)
    }
}

/// Per-row category labels plus the sorted distinct labels of a column.
fn category_labels(
    column: &Column,
    float_labels: bool,
) -> Result<(Vec<Option<String>>, Vec<String>)> {
    if is_text_column(column) {
        let as_text = column.cast(&DataType::String)?;
        let labels: Vec<Option<String>> = as_text
            .str()?
            .into_iter()
            .map(|v| v.map(|s| s.to_string()))
            .collect();
        let distinct: BTreeSet<String> = labels.iter().flatten().cloned().collect();
        return Ok((labels, distinct.into_iter().collect()));
    }

    let numeric: Vec<Option<f64>> = column.cast(&DataType::Float64)?.f64()?.into_iter().collect();
    let label_of = |v: f64| numeric_label(v, float_labels);

    let labels: Vec<Option<String>> = numeric.iter().map(|v| v.map(label_of)).collect();

    let mut distinct: Vec<f64> = numeric.iter().flatten().copied().collect();
    distinct.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mut sorted_labels: Vec<String> = Vec::with_capacity(distinct.len());
    for v in distinct {
        let label = label_of(v);
        if sorted_labels.last() != Some(&label) {
            sorted_labels.push(label);
        }
    }

    Ok((labels, sorted_labels))
}

/// One-hot encode the categorical columns of `df` and index it by
/// `id_column`.
///
/// Non-categorical feature columns pass through as Float64 in table order;
/// indicator columns follow, text-categorical columns first. A categorical
/// column named in `classes` but absent from `df` produces no indicators
/// (alignment fills them later). A missing categorical value yields an
/// all-zero indicator row.
pub fn one_hot_encode(
    df: &DataFrame,
    classes: &ColumnClasses,
    id_column: &str,
) -> Result<EncodedTable> {
    let ids = extract_ids(df, id_column)?;
    let mut builder = GroupBuilder::default();

    for column in df.get_columns() {
        let name = column.name().as_str();
        if name == id_column || classes.is_categorical(name) {
            continue;
        }
        let values: Vec<Option<f64>> = column
            .cast(&DataType::Float64)
            .with_context(|| format!("Column '{}' cannot be read as numeric", name))?
            .f64()?
            .into_iter()
            .collect();
        builder.add(
            name.to_string(),
            ColumnSource::Passthrough(name.to_string()),
            values,
        );
    }

    for name in classes.categorical() {
        let Ok(column) = df.column(name) else {
            continue;
        };
        let (labels, distinct) = category_labels(column, classes.has_float_labels(name))
            .with_context(|| format!("Failed to encode categorical column '{}'", name))?;

        for value in distinct {
            let indicator: Vec<Option<f64>> = labels
                .iter()
                .map(|label| match label {
                    Some(l) if *l == value => Some(1.0),
                    _ => Some(0.0),
                })
                .collect();
            builder.add(
                format!("{}_{}", name, value),
                ColumnSource::Indicator {
                    column: name.clone(),
                    value,
                },
                indicator,
            );
        }
    }

    let (features, groups) = builder.finish()?;
    Ok(EncodedTable {
        ids,
        features,
        groups,
    })
}

/// Ordered encoded column list of the training table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncodedSchema {
    columns: Vec<String>,
}

impl EncodedSchema {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    pub fn from_table(table: &EncodedTable) -> Self {
        Self::new(table.column_names())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Reindex `table` onto this schema.
    ///
    /// Columns absent from `table` are added as constant 0, columns not in
    /// the schema are dropped, order follows the schema, and any value still
    /// missing is filled with 0.
    pub fn align(&self, table: EncodedTable) -> Result<EncodedTable> {
        let rows = table.rows();
        let mut columns: Vec<Column> = Vec::with_capacity(self.columns.len());

        for name in &self.columns {
            let values: Vec<f64> = match table.features.column(name) {
                Ok(column) => column
                    .cast(&DataType::Float64)?
                    .f64()?
                    .into_iter()
                    .map(|v| v.unwrap_or(0.0))
                    .collect(),
                Err(_) => vec![0.0; rows],
            };
            columns.push(Column::new(name.as_str().into(), values));
        }

        let features = DataFrame::new(columns).context("Failed to assemble aligned table")?;
        Ok(EncodedTable {
            ids: table.ids,
            features,
            groups: table.groups,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_label_matches_integral_format() {
        assert_eq!(float_label(2.0), "2.0");
        assert_eq!(float_label(2.5), "2.5");
        assert_eq!(float_label(-0.0), "0.0");
    }

    #[test]
    fn test_signed_zero_is_one_category() {
        let column = Column::new("PoolArea".into(), &[0.0f64, -0.0, 1.5]);
        let (labels, distinct) = category_labels(&column, true).unwrap();
        assert_eq!(distinct, vec!["0.0", "1.5"]);
        assert_eq!(labels[1].as_deref(), Some("0.0"));
    }

    #[test]
    fn test_numeric_label_follows_frozen_format() {
        assert_eq!(numeric_label(2.0, true), "2.0");
        assert_eq!(numeric_label(2.0, false), "2");
        // Never truncated into an integer category
        assert_eq!(numeric_label(2.5, false), "2.5");
    }

    #[test]
    fn test_integer_categories_sorted_numerically() {
        let column = Column::new("MSSubClass".into(), &[120i64, 20, 60, 20]);
        let (labels, distinct) = category_labels(&column, false).unwrap();
        assert_eq!(distinct, vec!["20", "60", "120"]);
        assert_eq!(labels[0].as_deref(), Some("120"));
    }

    #[test]
    fn test_collision_merges_into_one_group() {
        let mut builder = GroupBuilder::default();
        builder.add(
            "A_x".to_string(),
            ColumnSource::Passthrough("A_x".to_string()),
            vec![Some(5.0), None],
        );
        builder.add(
            "A_x".to_string(),
            ColumnSource::Indicator {
                column: "A".to_string(),
                value: "x".to_string(),
            },
            vec![Some(1.0), Some(0.0)],
        );
        let (frame, groups) = builder.finish().unwrap();

        assert_eq!(frame.width(), 1);
        assert_eq!(groups.collisions().len(), 1);
        let values: Vec<Option<f64>> = frame.column("A_x").unwrap().f64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(5.0), Some(0.0)]);
    }
}
