//! Terminal styling utilities for the run output

use console::{style, Emoji};
use std::path::Path;
use std::time::Duration;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static CHART: Emoji<'_, '_> = Emoji("📊 ", "");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static TARGET: Emoji<'_, '_> = Emoji("🎯 ", "");
pub static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");
pub static GRID: Emoji<'_, '_> = Emoji("🔢 ", "");

/// Print the application banner with ASCII art
pub fn print_banner(version: &str) {
    let banner = r#"
    ██╗  ██╗██████╗ ██████╗ ██╗ ██████╗███████╗
    ██║  ██║██╔══██╗██╔══██╗██║██╔════╝██╔════╝
    ███████║██████╔╝██████╔╝██║██║     █████╗
    ██╔══██║██╔═══╝ ██╔══██╗██║██║     ██╔══╝
    ██║  ██║██║     ██║  ██║██║╚██████╗███████╗
    ╚═╝  ╚═╝╚═╝     ╚═╝  ╚═╝╚═╝ ╚═════╝╚══════╝
    "#;

    println!();
    println!("{}", style(banner).cyan().bold());
    println!(
        "    {} {}",
        style("$").magenta().bold(),
        style("Sale prices from cleaned housing data").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Settings shown on the configuration card
pub struct ConfigCard<'a> {
    pub train: &'a Path,
    pub test: &'a Path,
    pub target: &'a str,
    pub output_dir: &'a Path,
    pub cardinality_threshold: usize,
    pub skew_threshold: f64,
    pub ridge_candidates: usize,
    pub lasso_candidates: usize,
    pub cv_folds: usize,
}

/// Print configuration card
pub fn print_config(card: &ConfigCard) {
    let box_width = 56;
    let line = "─".repeat(box_width - 2);

    println!("    ┌{}┐", line);
    println!(
        "    │ {}{}│",
        style("⚙️  Configuration").cyan().bold(),
        " ".repeat(box_width - 20)
    );
    println!("    ├{}┤", line);
    println!(
        "    │  {} Train:  {:<39}│",
        FOLDER,
        truncate_path(card.train, 38)
    );
    println!(
        "    │  {} Test:   {:<39}│",
        FOLDER,
        truncate_path(card.test, 38)
    );
    println!(
        "    │  {} Target: {:<39}│",
        TARGET,
        truncate_string(card.target, 38)
    );
    println!(
        "    │  {} Output: {:<39}│",
        SAVE,
        truncate_path(card.output_dir, 38)
    );
    println!("    ├{}┤", line);
    println!(
        "    │  {} Cardinality threshold: {:<24}│",
        CHART,
        style(card.cardinality_threshold).yellow()
    );
    println!(
        "    │  {} Skew threshold:        {:<24}│",
        CHART,
        style(format!("{:.2}", card.skew_threshold)).yellow()
    );
    println!(
        "    │  {} Strengths (ridge/lasso): {:<22}│",
        GRID,
        style(format!("{} / {}", card.ridge_candidates, card.lasso_candidates)).yellow()
    );
    println!(
        "    │  {} Lasso CV folds:        {:<24}│",
        GRID,
        style(card.cv_folds).yellow()
    );
    println!("    └{}┘", line);
    println!();
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print a warning to stderr
pub fn print_warning(message: &str) {
    eprintln!(
        "    {} {}",
        style("Warning:").yellow().bold(),
        style(message).yellow()
    );
}

/// Print how long a step took
pub fn print_step_time(elapsed: Duration) {
    println!(
        "    {}",
        style(format!("⏱  {:.2}s", elapsed.as_secs_f64())).dim()
    );
}

/// Print the final completion message
pub fn print_completion() {
    println!();
    println!(
        "    {} {}",
        ROCKET,
        style("hprice run complete!").green().bold()
    );
    println!();
}

/// Print a styled count message
pub fn print_count(description: &str, count: usize, threshold_info: Option<&str>) {
    if let Some(info) = threshold_info {
        println!(
            "      Found {} {} {}",
            style(count).yellow().bold(),
            description,
            style(info).dim()
        );
    } else {
        println!("      Found {} {}", style(count).yellow().bold(), description);
    }
}

// Helper functions

fn truncate_path(path: &Path, max_len: usize) -> String {
    let path_str = path.display().to_string();
    truncate_string(&path_str, max_len)
}

fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let tail: String = s
            .chars()
            .rev()
            .take(max_len - 3)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("...{}", tail)
    }
}
