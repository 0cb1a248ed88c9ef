//! Investment Projection CLI
//!
//! Command-line interface for running a single portfolio projection

use anyhow::{Context, Result};
use clap::Parser;
use investment_projection::{
    format::{dollars, fixed2},
    projection::{EngineConfig, ProjectionEngine, ProjectionRequest},
    reference::{builtin, load_reference_path},
    report::{report_file_name, write_report, ChartData},
    Allocations,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::sync::Arc;

/// Project a portfolio split across the four strategies
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Total investment in dollars
    #[arg(long, default_value_t = 100_000.0)]
    investment: f64,

    /// Projection length in months
    #[arg(long, default_value_t = 12)]
    duration: u32,

    /// Falcon allocation (%)
    #[arg(long, default_value_t = 25.0)]
    falcon: f64,

    /// BS Buy Sell allocation (%)
    #[arg(long, default_value_t = 25.0)]
    bs_buy_sell: f64,

    /// Max Distance + RSI allocation (%)
    #[arg(long, default_value_t = 25.0)]
    max_distance: f64,

    /// UBS WITH ATR allocation (%)
    #[arg(long, default_value_t = 25.0)]
    ubs: f64,

    /// Reference table (.json or .csv); built-in table when omitted
    #[arg(long)]
    reference: Option<PathBuf>,

    /// Engine config file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the CSV report to this path
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write the CSV report under a timestamped file name
    #[arg(long, default_value_t = false)]
    csv_auto: bool,

    /// Write chart datasets (JSON) to this path
    #[arg(long)]
    charts: Option<PathBuf>,

    /// Print the result as JSON instead of a table
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Set the verbosity level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    verbose: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.verbose))
        .init();

    let reference = match &cli.reference {
        Some(path) => Arc::new(
            load_reference_path(path)
                .with_context(|| format!("Failed to load reference data from {}", path.display()))?,
        ),
        None => builtin(),
    };

    let config = match &cli.config {
        Some(path) => EngineConfig::from_json_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => EngineConfig::default(),
    };

    let engine = ProjectionEngine::new(reference, config);
    let request = ProjectionRequest::new(
        cli.investment,
        cli.duration,
        Allocations::new(cli.falcon, cli.bs_buy_sell, cli.max_distance, cli.ubs),
    );

    let input = request
        .validate(&engine.config().bounds)
        .context("Invalid projection input")?;
    let outcome = engine.project_input(&input).context("Projection failed")?;
    let result = &outcome.result;

    for warning in &outcome.warnings {
        log::warn!("{:?}", warning);
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        println!("Investment Projection v{}", env!("CARGO_PKG_VERSION"));
        println!("==========================\n");

        println!("Investment: {} over {} months", dollars(input.total_investment()), input.duration());
        println!();

        println!(
            "{:<20} {:>8} {:>14} {:>10} {:>16} {:>6}",
            "Strategy", "Alloc", "Investment", "Rate %/mo", "Projected", "Pairs"
        );
        println!("{}", "-".repeat(79));
        for s in &result.strategies {
            println!(
                "{:<20} {:>7.1}% {:>14.2} {:>10.4} {:>16.2} {:>6}",
                s.strategy.name(),
                s.allocation * 100.0,
                s.investment,
                s.return_rate,
                s.projected_return,
                s.pairs.len(),
            );
        }

        println!("\n{:>5} {:>16} {:>16}", "Month", "Value", "Profit");
        println!("{}", "-".repeat(39));
        for point in result.monthly_projections.iter().take(25) {
            println!("{:>5} {:>16} {:>16}", point.month, dollars(point.value as f64), dollars(point.profit as f64));
        }
        if result.monthly_projections.len() > 25 {
            println!("... ({} more months)", result.monthly_projections.len() - 25);
        }

        let summary = result.summary();
        println!("\nSummary:");
        println!("  Final Balance: {}", dollars(summary.final_value as f64));
        println!("  Total Profit: {}", dollars(summary.total_profit as f64));
        println!("  Percentage Return: {}%", result.percentage_return);
        println!("  Avg Monthly Return: {}%", summary.avg_monthly_return);
        println!("  Avg Monthly Profit: {}", dollars(result.avg_monthly_profit as f64));
        println!("  Risk: {} ({})", summary.risk_level, result.risk_description);
        if let Some(best) = summary.best_strategy {
            println!("  Best Strategy: {}", best);
        }
        log::debug!("Unrounded portfolio rate: {}", fixed2(result.portfolio_return_rate));
    }

    let csv_path = match (&cli.csv, cli.csv_auto) {
        (Some(path), _) => Some(path.clone()),
        (None, true) => Some(PathBuf::from(report_file_name(chrono::Utc::now()))),
        (None, false) => None,
    };
    if let Some(path) = csv_path {
        let file = File::create(&path)
            .with_context(|| format!("Unable to create {}", path.display()))?;
        write_report(BufWriter::new(file), result, &input, engine.reference())?;
        eprintln!("Report written to: {}", path.display());
    }

    if let Some(path) = &cli.charts {
        let charts = ChartData::from_projection(result, &input);
        let file = File::create(path)
            .with_context(|| format!("Unable to create {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &charts)?;
        eprintln!("Chart data written to: {}", path.display());
    }

    Ok(())
}
