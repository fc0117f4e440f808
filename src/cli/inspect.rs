//! Table inspection: column classes and skewness before/after log(1+x)

use std::path::Path;

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;
use polars::prelude::*;

use crate::pipeline::{
    classify_columns, column_skewness, dataset_stats, load_dataset, log1p_column, ColumnClasses,
};
use crate::utils::{create_spinner, finish_with_success};

/// Skewness of one continuous column with and without the log transform
#[derive(Debug, Clone, PartialEq)]
pub struct SkewInspection {
    pub column: String,
    pub before: Option<f64>,
    pub after: Option<f64>,
    /// Whether a training run would transform this column
    pub selected: bool,
}

/// What `inspect` found in one table
#[derive(Debug, Clone)]
pub struct InspectReport {
    pub rows: usize,
    pub columns: usize,
    pub classes: ColumnClasses,
    pub skew: Vec<SkewInspection>,
}

impl InspectReport {
    pub fn selected(&self) -> impl Iterator<Item = &SkewInspection> {
        self.skew.iter().filter(|s| s.selected)
    }
}

/// Classify the columns of `df` and measure skewness of the continuous ones.
pub fn inspect_table(
    df: &DataFrame,
    exclude: &[&str],
    cardinality_threshold: usize,
    skew_threshold: f64,
) -> Result<InspectReport> {
    let classes = classify_columns(df, exclude, cardinality_threshold)?;

    let mut skew = Vec::with_capacity(classes.continuous.len());
    for name in &classes.continuous {
        let column = df.column(name)?;
        let before = column_skewness(column)?;
        // Values below -1 make the transformed skew NaN
        let after = column_skewness(&log1p_column(column)?)?.filter(|s| s.is_finite());
        skew.push(SkewInspection {
            column: name.clone(),
            before,
            after,
            selected: matches!(before, Some(s) if s > skew_threshold),
        });
    }
    skew.sort_by(|a, b| {
        b.before
            .unwrap_or(f64::NEG_INFINITY)
            .partial_cmp(&a.before.unwrap_or(f64::NEG_INFINITY))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let (rows, columns) = df.shape();
    Ok(InspectReport {
        rows,
        columns,
        classes,
        skew,
    })
}

/// Run the `inspect` subcommand
pub fn run_inspect(
    input: &Path,
    id_column: &str,
    exclude: &[String],
    cardinality_threshold: usize,
    skew_threshold: f64,
    infer_schema_length: usize,
) -> Result<()> {
    println!("\n {} Inspecting table", style("◆").cyan().bold());
    println!("   Input:  {}", style(input.display()).dim());
    println!();

    let spinner = create_spinner("Loading table...");
    let df = load_dataset(input, infer_schema_length)?;
    let stats = dataset_stats(&df);
    finish_with_success(&spinner, "Table loaded");

    let mut ignored: Vec<&str> = vec![id_column];
    ignored.extend(exclude.iter().map(String::as_str));
    let report = inspect_table(&df, &ignored, cardinality_threshold, skew_threshold)?;

    println!();
    println!("   Rows:          {}", style(stats.rows).cyan());
    println!("   Columns:       {}", style(stats.columns).cyan());
    println!("   Missing cells: {}", style(stats.missing_cells).cyan());

    print_classes(&report.classes, cardinality_threshold);
    print_skew(&report, skew_threshold);

    println!(
        "\n {} {} of {} continuous column(s) would be log-transformed\n",
        style("✓").green().bold(),
        style(report.selected().count()).yellow().bold(),
        report.skew.len()
    );
    Ok(())
}

fn print_classes(classes: &ColumnClasses, cardinality_threshold: usize) {
    println!();
    println!(
        "   {} {}",
        style("Continuous").white().bold(),
        style(format!("({})", classes.continuous.len())).dim()
    );
    println!("     {}", classes.continuous.join(", "));

    println!();
    println!(
        "   {} {} {}",
        style("Numeric but categorical").yellow().bold(),
        style(format!("({})", classes.categorical_numeric.len())).dim(),
        style(format!("fewer than {} distinct values", cardinality_threshold)).dim()
    );
    println!("     {}", classes.categorical_numeric.join(", "));

    println!();
    println!(
        "   {} {}",
        style("Text").white().bold(),
        style(format!("({})", classes.categorical_text.len())).dim()
    );
    println!("     {}", classes.categorical_text.join(", "));
}

fn print_skew(report: &InspectReport, skew_threshold: f64) {
    if report.skew.is_empty() {
        return;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Column").add_attribute(Attribute::Bold),
        Cell::new("Skew").add_attribute(Attribute::Bold),
        Cell::new("Skew after log(1+x)").add_attribute(Attribute::Bold),
        Cell::new(format!("> {}", skew_threshold)).add_attribute(Attribute::Bold),
    ]);

    let fmt = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |s| format!("{:.3}", s));
    for entry in &report.skew {
        let flag = if entry.selected {
            Cell::new("transform").fg(Color::Yellow)
        } else {
            Cell::new("")
        };
        table.add_row(vec![
            Cell::new(&entry.column),
            Cell::new(fmt(entry.before)).set_alignment(CellAlignment::Right),
            Cell::new(fmt(entry.after)).set_alignment(CellAlignment::Right),
            flag,
        ]);
    }

    println!();
    for line in table.to_string().lines() {
        println!("   {}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inspect_table_flags_skewed_columns() {
        let df = df! {
            "Id" => (1..=15).collect::<Vec<i64>>(),
            "Area" => [1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0, 13.0, 14.0, 15.0],
            "Pool" => [0.0f64, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 500.0, 2000.0],
            "Zone" => ["A", "B", "A", "B", "A", "B", "A", "B", "A", "B", "A", "B", "A", "B", "A"],
        }
        .unwrap();

        let report = inspect_table(&df, &["Id"], 13, 0.7).unwrap();
        assert_eq!(report.rows, 15);
        assert_eq!(report.classes.continuous, vec!["Area".to_string()]);
        assert_eq!(report.classes.categorical_numeric, vec!["Pool".to_string()]);
        assert_eq!(report.classes.categorical_text, vec!["Zone".to_string()]);
        assert_eq!(report.skew.len(), 1);
        assert!(!report.skew[0].selected);
    }
}
