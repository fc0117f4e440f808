//! hprice: Housing Sale-Price CLI Tool
//!
//! Cleans a training and a test table, fits RidgeCV and LassoCV on
//! log-scale sale prices and writes price predictions for the test rows.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;

use hprice::cli::{run_inspect, Cli, Commands};
use hprice::pipeline::{
    dataset_stats, extract_target, load_dataset, CvRegressor, DesignMatrix, FeatureCleaner,
};
use hprice::report::{
    display_cv_curve, export_run_report, prediction_table, write_table, CoefficientRanking,
    RunReportParams, RunSummary, COEFFICIENTS_OUTPUT_FILE, LASSO_OUTPUT_FILE, RIDGE_OUTPUT_FILE,
    RUN_REPORT_FILE,
};
use hprice::utils::{
    create_spinner, finish_with_success, finish_with_warning, print_banner, print_completion,
    print_config, print_count, print_info, print_step_header, print_step_time, print_success,
    print_warning, ConfigCard,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle subcommands
    if let Some(command) = &cli.command {
        return match command {
            Commands::Inspect {
                input,
                id_column,
                exclude,
                cardinality_threshold,
                skew_threshold,
                infer_schema_length,
            } => run_inspect(
                input,
                id_column,
                exclude,
                *cardinality_threshold,
                *skew_threshold,
                *infer_schema_length,
            ),
        };
    }

    let (train_path, test_path) = cli.inputs()?;
    let cleaning_config = cli.cleaning_config();
    let regression_config = cli.regression_config();

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(&ConfigCard {
        train: train_path,
        test: test_path,
        target: &cli.target,
        output_dir: &cli.output_dir,
        cardinality_threshold: cleaning_config.cardinality_threshold,
        skew_threshold: cleaning_config.skew_threshold,
        ridge_candidates: regression_config.ridge_alphas.len(),
        lasso_candidates: regression_config.lasso_alphas.len(),
        cv_folds: regression_config.cv_folds,
    });

    let run_start = Instant::now();

    // Step 1: Load both tables
    print_step_header(1, "Load Data");

    let step_start = Instant::now();
    let spinner = create_spinner("Reading training and test tables...");
    let train_raw = load_dataset(train_path, cli.infer_schema_length)?;
    let test_raw = load_dataset(test_path, cli.infer_schema_length)?;
    finish_with_success(&spinner, "Tables loaded");

    let train_stats = dataset_stats(&train_raw);
    let test_stats = dataset_stats(&test_raw);
    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!(
        "      Train: {} rows x {} columns ({:.2} MB)",
        train_stats.rows, train_stats.columns, train_stats.memory_mb
    );
    println!(
        "      Test:  {} rows x {} columns ({:.2} MB)",
        test_stats.rows, test_stats.columns, test_stats.memory_mb
    );

    let (train_features, y) = extract_target(&train_raw, &cli.target)?;
    print_success(&format!("Target '{}' moved to log(1+y) scale", cli.target));

    let mut summary = RunSummary::new(
        train_stats.rows,
        test_stats.rows,
        train_features.width().saturating_sub(1),
    );
    summary.train_missing = train_stats.missing_cells;
    summary.test_missing = test_stats.missing_cells;
    print_step_time(step_start.elapsed());

    // Step 2: Clean both tables with state learned from the training table
    print_step_header(2, "Feature Cleaning");

    let step_start = Instant::now();
    let spinner = create_spinner("Classifying, transforming, encoding and imputing...");
    let (cleaner, train_table) = FeatureCleaner::fit(&train_features, cleaning_config)?;
    let test_table = cleaner.transform(&test_raw)?;
    finish_with_success(&spinner, "Feature cleaning complete");

    let classes = cleaner.classes();
    summary.set_classes(classes);
    print_count("continuous column(s)", classes.continuous.len(), None);
    print_count(
        "numeric column(s) treated as categorical",
        classes.categorical_numeric.len(),
        Some(&format!(
            "(<{} distinct values)",
            cleaner.config().cardinality_threshold
        )),
    );
    print_count("text column(s)", classes.categorical_text.len(), None);

    let skewed = cleaner.skew().selected_with_skewness();
    summary.skewed = skewed.len();
    if skewed.is_empty() {
        print_info("No continuous column exceeds the skew threshold");
    } else {
        print_count(
            "skewed column(s) log-transformed",
            skewed.len(),
            Some(&format!("(>{:.2})", cleaner.config().skew_threshold)),
        );
    }

    let collisions = train_table.groups.collisions();
    summary.collisions = collisions.len();
    for group in &collisions {
        let sources: Vec<String> = group.sources.iter().map(|s| s.to_string()).collect();
        print_warning(&format!(
            "encoded column '{}' merges {}",
            group.name,
            sources.join(", ")
        ));
    }

    summary.encoded_features = cleaner.schema().len();
    print_success(&format!(
        "{} encoded feature(s), test table aligned ({})",
        cleaner.schema().len(),
        cleaner.impute_source()
    ));
    print_step_time(step_start.elapsed());

    let x_train = DesignMatrix::from_table(&train_table, "training design matrix")?;
    let x_test = DesignMatrix::from_table(&test_table, "test design matrix")?;

    // Step 3: RidgeCV
    print_step_header(3, "RidgeCV (leave-one-out)");

    let step_start = Instant::now();
    let spinner = create_spinner("Scoring ridge strengths...");
    let ridge = regression_config
        .ridge()
        .fit(&x_train, &y)
        .context("RidgeCV training failed")?;
    finish_with_success(&spinner, &format!("RidgeCV chose alpha = {}", ridge.alpha()));
    summary.set_ridge(&ridge);
    print_step_time(step_start.elapsed());

    // Step 4: LassoCV
    print_step_header(4, "LassoCV (k-fold)");

    let step_start = Instant::now();
    let spinner = create_spinner("Running coordinate descent over the strength grid...");
    let lasso = regression_config
        .lasso()
        .fit(&x_train, &y)
        .context("LassoCV training failed")?;
    if lasso.cv().converged == Some(false) {
        finish_with_warning(
            &spinner,
            &format!("LassoCV chose alpha = {} (not converged)", lasso.alpha()),
        );
        print_warning(&format!(
            "coordinate descent stopped after {} iterations; consider raising --lasso-max-iter",
            regression_config.lasso_max_iter
        ));
    } else {
        finish_with_success(
            &spinner,
            &format!("LassoCV chose alpha = {}", lasso.alpha()),
        );
    }
    summary.set_lasso(&lasso);
    print_count(
        "non-zero lasso coefficient(s)",
        lasso.nonzero_coefficients(),
        Some(&format!("of {}", lasso.feature_names().len())),
    );
    print_step_time(step_start.elapsed());

    // Step 5: Predict and save
    print_step_header(5, "Predict & Save Results");

    let step_start = Instant::now();
    std::fs::create_dir_all(&cli.output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            cli.output_dir.display()
        )
    })?;

    let spinner = create_spinner("Writing prediction files...");
    let ridge_path = cli.output_file(RIDGE_OUTPUT_FILE);
    let mut ridge_predictions =
        prediction_table(&cli.id_column, x_test.ids(), &ridge.predict(&x_test)?)?;
    write_table(&mut ridge_predictions, &ridge_path)?;

    let lasso_path = cli.output_file(LASSO_OUTPUT_FILE);
    let mut lasso_predictions =
        prediction_table(&cli.id_column, x_test.ids(), &lasso.predict(&x_test)?)?;
    write_table(&mut lasso_predictions, &lasso_path)?;

    let ranking = CoefficientRanking::from_model(&lasso);
    let coefficients_path = cli.output_file(COEFFICIENTS_OUTPUT_FILE);
    write_table(&mut ranking.to_frame()?, &coefficients_path)?;

    let mut outputs: Vec<PathBuf> = vec![ridge_path, lasso_path, coefficients_path];
    if !cli.no_report {
        let report_path = cli.output_file(RUN_REPORT_FILE);
        outputs.push(report_path.clone());
        export_run_report(
            &cleaner,
            &[&ridge, &lasso],
            &report_path,
            &RunReportParams {
                train_file: train_path,
                test_file: test_path,
                target_column: &cli.target,
                groups: &train_table.groups,
                regression: &regression_config,
                outputs: &outputs,
            },
        )?;
    }
    finish_with_success(
        &spinner,
        &format!("Saved {} file(s) to {}", outputs.len(), cli.output_dir.display()),
    );
    for path in &outputs {
        println!("      {} {}", style("•").dim(), path.display());
    }
    print_step_time(step_start.elapsed());

    // Display summary
    summary.elapsed = run_start.elapsed();
    display_cv_curve(&ridge);
    display_cv_curve(&lasso);
    ranking.display(cli.top_features);
    summary.display();

    print_completion();

    Ok(())
}
