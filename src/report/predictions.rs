//! Prediction tables and coefficient rankings

use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;
use polars::prelude::*;

use crate::pipeline::{from_log_scale, FittedModel, PipelineError};

/// Name of the predicted price column
pub const PREDICTION_COLUMN: &str = "SalePrice";
/// Name of the coefficient value column
pub const COEFFICIENT_COLUMN: &str = "values";
/// Name of the coefficient key column
pub const FEATURE_COLUMN: &str = "feature";

/// Map log-scale predictions back to prices and key them by row identifier.
///
/// # Arguments
/// * `id_column` - Header of the identifier column
/// * `ids` - One identifier per prediction
/// * `log_predictions` - Model output on the `log(1+y)` scale
pub fn prediction_table(id_column: &str, ids: &[i64], log_predictions: &[f64]) -> Result<DataFrame> {
    if ids.len() != log_predictions.len() {
        return Err(PipelineError::dimension_mismatch(
            "prediction table",
            ids.len(),
            log_predictions.len(),
        )
        .into());
    }
    let prices: Vec<f64> = log_predictions.iter().map(|&p| from_log_scale(p)).collect();
    DataFrame::new(vec![
        Column::new(id_column.into(), ids),
        Column::new(PREDICTION_COLUMN.into(), prices),
    ])
    .context("Failed to build prediction table")
}

/// Model coefficients sorted ascending by weight
#[derive(Debug, Clone)]
pub struct CoefficientRanking {
    entries: Vec<(String, f64)>,
}

impl CoefficientRanking {
    pub fn from_model(model: &FittedModel) -> Self {
        Self::new(model.coefficients())
    }

    pub fn new(mut entries: Vec<(String, f64)>) -> Self {
        entries.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        Self { entries }
    }

    pub fn entries(&self) -> &[(String, f64)] {
        &self.entries
    }

    /// The `k` most negative weights, most negative first
    pub fn most_negative(&self, k: usize) -> &[(String, f64)] {
        &self.entries[..k.min(self.entries.len())]
    }

    /// The `k` most positive weights, most positive first
    pub fn most_positive(&self, k: usize) -> Vec<(String, f64)> {
        self.entries.iter().rev().take(k).cloned().collect()
    }

    /// Table keyed by feature name with one `values` column
    pub fn to_frame(&self) -> Result<DataFrame> {
        let names: Vec<&str> = self.entries.iter().map(|(n, _)| n.as_str()).collect();
        let values: Vec<f64> = self.entries.iter().map(|(_, v)| *v).collect();
        DataFrame::new(vec![
            Column::new(FEATURE_COLUMN.into(), names),
            Column::new(COEFFICIENT_COLUMN.into(), values),
        ])
        .context("Failed to build coefficient table")
    }

    /// Print the strongest negative and positive predictors
    pub fn display(&self, k: usize) {
        println!();
        println!(
            "    {} {}",
            style("📈").cyan(),
            style("INFLUENTIAL FEATURES (LASSO)").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Negative").add_attribute(Attribute::Bold),
            Cell::new("Weight").add_attribute(Attribute::Bold),
            Cell::new("Positive").add_attribute(Attribute::Bold),
            Cell::new("Weight").add_attribute(Attribute::Bold),
        ]);

        let negative: Vec<&(String, f64)> =
            self.most_negative(k).iter().filter(|(_, w)| *w < 0.0).collect();
        let positive: Vec<(String, f64)> = self
            .most_positive(k)
            .into_iter()
            .filter(|(_, w)| *w > 0.0)
            .collect();

        for i in 0..negative.len().max(positive.len()) {
            let (neg_name, neg_weight) = match negative.get(i) {
                Some((name, w)) => (Cell::new(name), Cell::new(format!("{:.5}", w)).fg(Color::Red)),
                None => (Cell::new(""), Cell::new("")),
            };
            let (pos_name, pos_weight) = match positive.get(i) {
                Some((name, w)) => (Cell::new(name), Cell::new(format!("{:.5}", w)).fg(Color::Green)),
                None => (Cell::new(""), Cell::new("")),
            };
            table.add_row(vec![
                neg_name,
                neg_weight.set_alignment(CellAlignment::Right),
                pos_name,
                pos_weight.set_alignment(CellAlignment::Right),
            ]);
        }

        for line in table.to_string().lines() {
            println!("    {}", line);
        }
    }
}

/// Print the cross-validation error for each candidate strength
pub fn display_cv_curve(model: &FittedModel) {
    let cv = model.cv();
    println!();
    println!(
        "    {} {} {}",
        style("📉").cyan(),
        style(format!("{} CROSS-VALIDATION", model.kind()).to_uppercase())
            .white()
            .bold(),
        style(format!("(chosen alpha = {})", model.alpha())).dim()
    );
    println!("    {}", style("─".repeat(50)).dim());

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Alpha").add_attribute(Attribute::Bold),
        Cell::new("Mean CV MSE").add_attribute(Attribute::Bold),
    ]);
    for (alpha, error) in cv.alphas.iter().zip(&cv.mean_errors) {
        let mut cell = Cell::new(format!("{:.6}", error)).set_alignment(CellAlignment::Right);
        if *alpha == model.alpha() {
            cell = cell.fg(Color::Green).add_attribute(Attribute::Bold);
        }
        table.add_row(vec![Cell::new(alpha), cell]);
    }

    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}
