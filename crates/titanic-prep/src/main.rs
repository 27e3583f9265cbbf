//! CLI entry point for the Titanic preprocessing pipeline.

use anyhow::{Result, anyhow};
use clap::Parser;
use dotenv::dotenv;
use std::path::Path;
use titanic_prep::visualize::{render_boxplot, render_histogram};
use titanic_prep::{
    DatasetOverview, OutputFormat, Pipeline, PipelineConfig, PipelineOutput, PreprocessingReport,
    ReportGenerator,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Titanic Dataset Preprocessing Pipeline",
    long_about = "Imputes, encodes, standardizes and outlier-filters the Titanic passenger CSV.\n\n\
                  EXAMPLES:\n  \
                  # Print an overview and summary\n  \
                  titanic-prep -i train.csv\n\n  \
                  # Write the cleaned table as Parquet plus a JSON report\n  \
                  titanic-prep -i train.csv -o results/ --format parquet --emit-report\n\n  \
                  # Text histograms and boxplots\n  \
                  titanic-prep -i train.csv --plots"
)]
struct Args {
    /// Path to the CSV file to process
    #[arg(short, long)]
    input: String,

    /// Output directory for the cleaned table
    ///
    /// Nothing is written unless this is set (or --emit-report is used)
    #[arg(short, long)]
    output: Option<String>,

    /// File format of the cleaned table
    #[arg(long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// JSON file with pipeline configuration overrides
    #[arg(short, long)]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all progress logs; only outputs the final JSON report.
    #[arg(long)]
    json: bool,

    /// Print text histograms and boxplots of Fare and Age
    #[arg(long)]
    plots: bool,

    /// Write a detailed JSON report to the output directory
    ///
    /// The report will be saved as <input_name>_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,
}

/// Default directory for reports when `--output` is not given.
const DEFAULT_OUTPUT_DIR: &str = "./outputs";

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load environment variables from .env file (may set RUST_LOG)
    dotenv().ok();

    init_logging(&args.log_level, args.quiet, args.json);

    let config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path);
            PipelineConfig::from_json_file(path)?
        }
        None => PipelineConfig::default(),
    };

    let pipeline = build_pipeline(&args, config)?;
    let mut output = pipeline
        .process_file(&args.input)
        .map_err(|e| anyhow!("Pipeline failed: {}", e))?;

    let input_stem = extract_file_stem(&args.input);

    let table_path = match &args.output {
        Some(dir) => Some(ReportGenerator::new(dir).save_table(
            &mut output.cleaned,
            &format!("{}_cleaned", input_stem),
            args.format,
        )?),
        None => None,
    };

    let report = ReportGenerator::build_report(&args.input, table_path.as_deref(), &output);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if args.emit_report {
        let dir = args.output.as_deref().unwrap_or(DEFAULT_OUTPUT_DIR);
        let report_path = ReportGenerator::new(dir).write_report(&report, &input_stem)?;
        info!("Report written to: {}", report_path.display());
    }

    print_overview(&output.overview);
    if args.plots {
        print_plots(&output);
    }
    print_human_readable_summary(&report);

    Ok(())
}

fn build_pipeline(args: &Args, config: PipelineConfig) -> Result<Pipeline> {
    let mut builder = Pipeline::builder().config(config);

    if !args.quiet && !args.json {
        builder = builder.on_progress(|update| {
            info!(
                "[{:.0}%] {}: {}",
                update.progress * 100.0,
                update.stage.display_name(),
                update.message
            );
        });
    }

    Ok(builder.build()?)
}

/// Extract the file stem (name without extension) from a path.
fn extract_file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}

/// Truncate a string to max length with ellipsis
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Print the loaded table's shape, column info and head.
///
/// Uses `println!` intentionally: this is the primary CLI output and must be
/// visible regardless of log level.
fn print_overview(overview: &DatasetOverview) {
    println!();
    println!("{}", "=".repeat(80));
    println!("DATASET OVERVIEW");
    println!("{}", "=".repeat(80));
    println!("  Rows: {}", overview.shape.0);
    println!("  Columns: {}", overview.shape.1);
    println!();

    println!("{:<20} {:<12} {:<10} {:<10}", "Column", "Type", "Non-null", "Missing");
    println!("{}", "-".repeat(56));
    for col in &overview.columns {
        println!(
            "{:<20} {:<12} {:<10} {:<10}",
            truncate_str(&col.name, 19),
            col.dtype,
            col.non_null_count,
            col.null_count
        );
    }
    println!();

    println!("Text columns: {}", overview.text_columns.join(", "));
    println!("Numeric columns: {}", overview.numeric_columns.join(", "));
    println!();

    if !overview.numeric_summary.is_empty() {
        println!(
            "{:<14} {:>6} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
            "Describe", "Count", "Mean", "Std", "Min", "Median", "Max", "IQR"
        );
        println!("{}", "-".repeat(86));
        for stats in &overview.numeric_summary {
            println!(
                "{:<14} {:>6} {:>10.3} {:>10.3} {:>10.3} {:>10.3} {:>10.3} {:>10.3}",
                truncate_str(&stats.name, 13),
                stats.count,
                stats.mean,
                stats.std,
                stats.min,
                stats.median,
                stats.max,
                stats.iqr()
            );
        }
        println!();
    }

    println!("Head:");
    for row in &overview.head {
        let cells: Vec<String> = row.iter().map(|cell| truncate_str(cell, 14)).collect();
        println!("  {}", cells.join(" | "));
    }
    println!();
}

fn print_plots(output: &PipelineOutput) {
    let Some(visuals) = &output.visuals else {
        println!("Distribution summaries were disabled in the configuration");
        return;
    };

    for histogram in &visuals.histograms {
        println!("{}", render_histogram(histogram));
    }
    for boxplot in &visuals.boxplots {
        println!("{}", render_boxplot(boxplot));
    }
}

/// Print a human-readable summary of the preprocessing results.
fn print_human_readable_summary(report: &PreprocessingReport) {
    let summary = &report.summary;

    println!("{}", "=".repeat(80));
    println!("PREPROCESSING COMPLETE");
    println!("{}", "=".repeat(80));
    println!();

    println!(
        "Input:  {} ({} rows x {} columns)",
        report.input_file, summary.rows_loaded, summary.columns_loaded
    );
    if let Some(ref output_file) = report.output_file {
        println!(
            "Output: {} ({} rows x {} columns)",
            output_file, summary.rows_cleaned, summary.columns_final
        );
    }
    println!();

    println!("Processing Summary:");
    println!("  Duration: {}ms", summary.duration_ms);
    println!(
        "  Rows: {} -> {} ({} outliers removed)",
        summary.rows_loaded, summary.rows_cleaned, summary.rows_removed
    );
    println!(
        "  Missing cells: {} -> {}",
        summary.missing_before, summary.missing_after
    );
    println!(
        "  Imputed: Age = {:.3}, Embarked = '{}', Cabin = '{}'",
        report.imputation.age_mean, report.imputation.embarked_mode, report.imputation.cabin_fill
    );
    for params in &report.scaling {
        println!(
            "  Standardized {}: mean {:.3}, std {:.3}",
            params.column, params.mean, params.std
        );
    }
    let fences = &report.outlier_fences;
    println!(
        "  {} fences: [{:.3}, {:.3}] (Q1 {:.3}, Q3 {:.3})",
        fences.column, fences.lower, fences.upper, fences.q1, fences.q3
    );
    println!();

    if !report.processing_steps.is_empty() {
        println!("Actions Taken:");
        for step in &report.processing_steps {
            println!("  - {}", step);
        }
        println!();
    }

    if !summary.warnings.is_empty() {
        println!("Warnings:");
        for warning in &summary.warnings {
            println!("  ! {}", warning);
        }
        println!();
    }

    println!("Use --json for machine-readable output");
    println!("Use --emit-report to save detailed JSON report");
    println!("{}", "=".repeat(80));
}
