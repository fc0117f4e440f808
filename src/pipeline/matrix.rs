//! Conversion of an encoded table into a dense numeric design matrix

use anyhow::Result;
use faer::Mat;
use polars::prelude::*;

use super::encoder::EncodedTable;
use super::error::PipelineError;

/// Dense feature matrix with its row identifiers and column names
#[derive(Debug, Clone)]
pub struct DesignMatrix {
    ids: Vec<i64>,
    columns: Vec<String>,
    values: Mat<f64>,
}

impl DesignMatrix {
    /// Wrap an existing matrix, checking that the labels fit its shape.
    pub fn new(ids: Vec<i64>, columns: Vec<String>, values: Mat<f64>) -> Result<Self> {
        if ids.len() != values.nrows() {
            return Err(
                PipelineError::dimension_mismatch("design matrix rows", ids.len(), values.nrows())
                    .into(),
            );
        }
        if columns.len() != values.ncols() {
            return Err(PipelineError::dimension_mismatch(
                "design matrix columns",
                columns.len(),
                values.ncols(),
            )
            .into());
        }
        Ok(Self {
            ids,
            columns,
            values,
        })
    }

    /// Build a matrix from a cleaned table. Every cell must be present and
    /// finite.
    ///
    /// # Arguments
    /// * `table` - Encoded, imputed (and for test data, aligned) table
    /// * `stage` - Name used in error messages ("training features", ...)
    pub fn from_table(table: &EncodedTable, stage: &str) -> Result<Self> {
        let rows = table.rows();
        let frame = &table.features;
        if frame.width() > 0 && frame.height() != rows {
            return Err(PipelineError::dimension_mismatch(stage, rows, frame.height()).into());
        }

        let mut values = Mat::<f64>::zeros(rows, frame.width());
        let mut columns = Vec::with_capacity(frame.width());

        for (col_idx, column) in frame.get_columns().iter().enumerate() {
            let name = column.name().to_string();
            let as_float = column.cast(&DataType::Float64)?;
            for (row_idx, value) in as_float.f64()?.into_iter().enumerate() {
                let value = value.ok_or_else(|| PipelineError::MissingValues {
                    stage: stage.to_string(),
                    column: name.clone(),
                })?;
                if !value.is_finite() {
                    return Err(PipelineError::NonFinite {
                        stage: stage.to_string(),
                        column: name,
                    }
                    .into());
                }
                values[(row_idx, col_idx)] = value;
            }
            columns.push(name);
        }

        Self::new(table.ids.clone(), columns, values)
    }

    pub fn ids(&self) -> &[i64] {
        &self.ids
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &Mat<f64> {
        &self.values
    }

    pub fn rows(&self) -> usize {
        self.values.nrows()
    }

    pub fn cols(&self) -> usize {
        self.values.ncols()
    }
}
