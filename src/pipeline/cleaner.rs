//! Feature cleaning: classification, skew correction, encoding, imputation
//!
//! Everything derived from data (column classes, skewed columns, encoded
//! schema, column means) is computed once from the training table and frozen
//! in a [`FeatureCleaner`], which then replays it on the test table.

use anyhow::{Context, Result};
use polars::prelude::*;

use super::encoder::{one_hot_encode, EncodedSchema, EncodedTable};
use super::impute::{column_means, impute_means, ColumnMeans, ImputeSource};
use super::schema::{classify_columns, ColumnClasses, DEFAULT_CARDINALITY_THRESHOLD};
use super::skew::{apply_skew, fit_skew, SkewRecord, DEFAULT_SKEW_THRESHOLD};

/// Default name of the row identifier column
pub const DEFAULT_ID_COLUMN: &str = "Id";

/// Settings for the cleaning steps
#[derive(Debug, Clone)]
pub struct CleaningConfig {
    pub id_column: String,
    pub cardinality_threshold: usize,
    pub skew_threshold: f64,
    /// Fill missing test values with training means instead of the test
    /// table's own means
    pub impute_from_train: bool,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            id_column: DEFAULT_ID_COLUMN.to_string(),
            cardinality_threshold: DEFAULT_CARDINALITY_THRESHOLD,
            skew_threshold: DEFAULT_SKEW_THRESHOLD,
            impute_from_train: false,
        }
    }
}

/// Cleaning state frozen from the training table
#[derive(Debug, Clone)]
pub struct FeatureCleaner {
    config: CleaningConfig,
    classes: ColumnClasses,
    skew: SkewRecord,
    schema: EncodedSchema,
    train_means: ColumnMeans,
}

impl FeatureCleaner {
    /// Learn the cleaning state from `train` (target already removed) and
    /// return the cleaned training table.
    pub fn fit(train: &DataFrame, config: CleaningConfig) -> Result<(Self, EncodedTable)> {
        let classes = classify_columns(
            train,
            &[config.id_column.as_str()],
            config.cardinality_threshold,
        )
        .context("Column classification failed")?;

        let mut table = train.clone();
        let skew = fit_skew(&table, &classes.continuous, config.skew_threshold)
            .context("Skewness analysis failed on training table")?;
        apply_skew(&mut table, &skew).context("Skew transform failed on training table")?;

        let mut encoded = one_hot_encode(&table, &classes, &config.id_column)
            .context("Encoding failed on training table")?;

        let train_means = column_means(&encoded.features)?;
        impute_means(&mut encoded.features, &ImputeSource::OwnMeans)
            .context("Imputation failed on training table")?;

        let schema = EncodedSchema::from_table(&encoded);

        Ok((
            Self {
                config,
                classes,
                skew,
                schema,
                train_means,
            },
            encoded,
        ))
    }

    /// Clean `test` with the frozen training state.
    ///
    /// # Errors
    /// A skew-selected training column absent from `test` is a
    /// [`SchemaMismatch`](super::error::PipelineError::SchemaMismatch).
    pub fn transform(&self, test: &DataFrame) -> Result<EncodedTable> {
        let mut table = test.clone();
        apply_skew(&mut table, &self.skew).context("Skew transform failed on test table")?;

        let mut encoded = one_hot_encode(&table, &self.classes, &self.config.id_column)
            .context("Encoding failed on test table")?;

        impute_means(&mut encoded.features, &self.impute_source())
            .context("Imputation failed on test table")?;

        self.schema.align(encoded)
    }

    /// Fill policy used for the test table
    pub fn impute_source(&self) -> ImputeSource {
        if self.config.impute_from_train {
            ImputeSource::Reference(self.train_means.clone())
        } else {
            ImputeSource::OwnMeans
        }
    }

    pub fn config(&self) -> &CleaningConfig {
        &self.config
    }

    pub fn classes(&self) -> &ColumnClasses {
        &self.classes
    }

    pub fn skew(&self) -> &SkewRecord {
        &self.skew
    }

    pub fn schema(&self) -> &EncodedSchema {
        &self.schema
    }

    pub fn train_means(&self) -> &ColumnMeans {
        &self.train_means
    }
}
