//! Load batch scenarios from CSV

use super::Scenario;
use crate::error::ScenarioError;
use crate::projection::ProjectionRequest;
use csv::Reader;
use std::path::Path;

/// Default path to the sample scenario file
pub const DEFAULT_SCENARIOS_PATH: &str = "data/sample_scenarios.csv";

/// Raw CSV row matching the scenario file columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    scenario_id: String,
    total_investment: Option<f64>,
    duration: Option<f64>,
    falcon: Option<f64>,
    bs_buy_sell: Option<f64>,
    max_distance: Option<f64>,
    ubs: Option<f64>,
}

impl CsvRow {
    /// Values are carried unchecked; validation happens when the scenario runs
    fn into_scenario(self) -> Scenario {
        Scenario {
            id: self.scenario_id,
            request: ProjectionRequest {
                total_investment: self.total_investment,
                duration: self.duration,
                falcon_allocation: self.falcon,
                bs_buy_allocation: self.bs_buy_sell,
                max_distance_allocation: self.max_distance,
                ubs_allocation: self.ubs,
            },
        }
    }
}

/// Load all scenarios from a CSV file
pub fn load_scenarios<P: AsRef<Path>>(path: P) -> Result<Vec<Scenario>, ScenarioError> {
    let path = path.as_ref();
    let scenarios = load_scenarios_from_reader(std::fs::File::open(path)?)?;
    log::info!("Loaded {} scenarios from {}", scenarios.len(), path.display());
    Ok(scenarios)
}

/// Load scenarios from any reader (e.g., string buffer, network stream)
pub fn load_scenarios_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<Scenario>, ScenarioError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut scenarios = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        scenarios.push(row.into_scenario());
    }

    Ok(scenarios)
}
