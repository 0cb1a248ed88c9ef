//! Run projections for every scenario in a CSV file
//!
//! Outputs one summary row per scenario, in input order

use anyhow::{Context, Result};
use clap::Parser;
use investment_projection::projection::EngineConfig;
use investment_projection::reference::{builtin, load_reference_path};
use investment_projection::scenario::{load_scenarios, ScenarioRunner, DEFAULT_SCENARIOS_PATH};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Project a batch of scenarios in parallel
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Scenario file (CSV)
    #[arg(long, default_value = DEFAULT_SCENARIOS_PATH)]
    scenarios: PathBuf,

    /// Output file (CSV)
    #[arg(long, default_value = "batch_projection_output.csv")]
    output: PathBuf,

    /// Reference table (.json or .csv); built-in table when omitted
    #[arg(long)]
    reference: Option<PathBuf>,

    /// Engine config file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,
}

/// One output row; projection columns are empty when the scenario failed
#[derive(Debug, Default, Serialize)]
struct BatchRow<'a> {
    scenario_id: &'a str,
    total_return: Option<i64>,
    total_profit: Option<i64>,
    percentage_return: Option<String>,
    avg_monthly_return: Option<String>,
    avg_monthly_profit: Option<i64>,
    risk_level: Option<&'static str>,
    best_strategy: Option<&'static str>,
    warnings: usize,
    error: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let start = Instant::now();

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

    println!("Loading scenarios from {}...", cli.scenarios.display());
    let scenarios = load_scenarios(&cli.scenarios)
        .with_context(|| format!("Failed to load scenarios from {}", cli.scenarios.display()))?;
    println!("Loaded {} scenarios in {:?}", scenarios.len(), start.elapsed());

    let runner = ScenarioRunner::new(config, reference);

    println!("Running projections...");
    let proj_start = Instant::now();
    let results = runner.run_scenarios(&scenarios);
    println!("Projections complete in {:?}", proj_start.elapsed());

    let mut writer = csv::Writer::from_path(&cli.output)
        .with_context(|| format!("Failed to create {}", cli.output.display()))?;

    let mut failed = 0;
    for &(scenario_id, ref outcome) in &results {
        let row = match outcome {
            Ok(outcome) => {
                let result = &outcome.result;
                let summary = result.summary();
                BatchRow {
                    scenario_id,
                    total_return: Some(result.total_return),
                    total_profit: Some(result.total_profit),
                    percentage_return: Some(result.percentage_return.clone()),
                    avg_monthly_return: Some(result.avg_monthly_return.clone()),
                    avg_monthly_profit: Some(result.avg_monthly_profit),
                    risk_level: Some(result.risk_level.as_str()),
                    best_strategy: summary.best_strategy.map(|s| s.name()),
                    warnings: outcome.warnings.len(),
                    error: None,
                }
            }
            Err(e) => {
                failed += 1;
                log::warn!("Scenario {} failed: {}", scenario_id, e);
                BatchRow {
                    scenario_id,
                    error: Some(e.to_string()),
                    ..Default::default()
                }
            }
        };
        writer.serialize(row)?;
    }
    writer.flush()?;

    println!("Output written to {}", cli.output.display());
    println!("\nBatch Summary:");
    println!("  Scenarios: {}", results.len());
    println!("  Succeeded: {}", results.len() - failed);
    println!("  Failed:    {}", failed);
    println!("  Reference version: {}", runner.reference_version());
    println!("\nTotal time: {:?}", start.elapsed());

    Ok(())
}
