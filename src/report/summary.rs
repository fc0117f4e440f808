//! Run summary report generation

use std::time::Duration;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;

use crate::pipeline::{ColumnClasses, FittedModel};

/// Headline numbers of one training run
#[derive(Debug, Default)]
pub struct RunSummary {
    pub train_rows: usize,
    pub test_rows: usize,
    pub raw_features: usize,
    pub continuous: usize,
    pub categorical_numeric: usize,
    pub categorical_text: usize,
    pub skewed: usize,
    pub encoded_features: usize,
    pub collisions: usize,
    pub train_missing: usize,
    pub test_missing: usize,
    pub ridge_alpha: Option<f64>,
    pub ridge_error: Option<f64>,
    pub lasso_alpha: Option<f64>,
    pub lasso_error: Option<f64>,
    pub lasso_nonzero: usize,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn new(train_rows: usize, test_rows: usize, raw_features: usize) -> Self {
        Self {
            train_rows,
            test_rows,
            raw_features,
            ..Default::default()
        }
    }

    pub fn set_classes(&mut self, classes: &ColumnClasses) {
        self.continuous = classes.continuous.len();
        self.categorical_numeric = classes.categorical_numeric.len();
        self.categorical_text = classes.categorical_text.len();
    }

    pub fn set_ridge(&mut self, model: &FittedModel) {
        self.ridge_alpha = Some(model.alpha());
        self.ridge_error = best_error(model);
    }

    pub fn set_lasso(&mut self, model: &FittedModel) {
        self.lasso_alpha = Some(model.alpha());
        self.lasso_error = best_error(model);
        self.lasso_nonzero = model.nonzero_coefficients();
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("RUN SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("📁 Rows (train / test)"),
            Cell::new(format!("{} / {}", self.train_rows, self.test_rows)),
        ]);
        table.add_row(vec![
            Cell::new("🧾 Raw Features"),
            Cell::new(self.raw_features),
        ]);
        table.add_row(vec![
            Cell::new("📐 Continuous / Cat. Numeric / Cat. Text"),
            Cell::new(format!(
                "{} / {} / {}",
                self.continuous, self.categorical_numeric, self.categorical_text
            )),
        ]);
        table.add_row(vec![
            Cell::new("↪️  Log-transformed (skewed)"),
            Cell::new(self.skewed).fg(Color::Yellow),
        ]);
        table.add_row(vec![
            Cell::new("🧩 Encoded Features"),
            Cell::new(self.encoded_features)
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);
        table.add_row(vec![
            Cell::new("🔀 Merged Name Collisions"),
            Cell::new(self.collisions).fg(if self.collisions == 0 {
                Color::White
            } else {
                Color::Red
            }),
        ]);
        table.add_row(vec![
            Cell::new("🩹 Missing Cells (train / test)"),
            Cell::new(format!(
                "{} / {}",
                self.train_missing, self.test_missing
            )),
        ]);

        if let (Some(alpha), Some(error)) = (self.ridge_alpha, self.ridge_error) {
            table.add_row(vec![
                Cell::new("🏔️  RidgeCV alpha (LOO MSE)"),
                Cell::new(format!("{} ({:.5})", alpha, error)).fg(Color::Cyan),
            ]);
        }
        if let (Some(alpha), Some(error)) = (self.lasso_alpha, self.lasso_error) {
            table.add_row(vec![
                Cell::new("🪢 LassoCV alpha (CV MSE)"),
                Cell::new(format!("{} ({:.5})", alpha, error)).fg(Color::Cyan),
            ]);
            table.add_row(vec![
                Cell::new("✂️  Lasso Non-zero Weights"),
                Cell::new(format!("{} of {}", self.lasso_nonzero, self.encoded_features)),
            ]);
        }

        table.add_row(vec![
            Cell::new("⏱️  Elapsed"),
            Cell::new(format!("{:.2}s", self.elapsed.as_secs_f64()))
                .set_alignment(CellAlignment::Right),
        ]);

        for line in table.to_string().lines() {
            println!("    {}", line);
        }
    }
}

/// Cross-validation error at the chosen strength
fn best_error(model: &FittedModel) -> Option<f64> {
    let cv = model.cv();
    cv.alphas
        .iter()
        .position(|&a| a == model.alpha())
        .and_then(|i| cv.mean_errors.get(i).copied())
}
