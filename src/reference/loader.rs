//! Reference table loaders (JSON and CSV)
//!
//! JSON keeps the shape of `data/historical_data.json`:
//! `{"strategies": {"<name>": {"description": "...", "pairs": {"<pair>": {...}}}}}`.
//! Object order in the file is preserved into the table.

use super::{HistoricalReferenceData, PairReference, StrategyReference};
use crate::error::ReferenceError;
use csv::Reader;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Default path to the reference table
pub const DEFAULT_REFERENCE_PATH: &str = "data/historical_data.json";

#[derive(Debug, Deserialize)]
struct RawTable {
    strategies: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RawStrategy {
    #[serde(default)]
    description: String,
    pairs: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RawPair {
    avg_monthly_return: f64,
    allocation_ratio: f64,
}

/// Raw CSV row: one pair per line
#[derive(Debug, Deserialize)]
struct CsvRow {
    strategy: String,
    #[serde(default)]
    description: String,
    pair: String,
    avg_monthly_return: f64,
    allocation_ratio: f64,
}

/// Load a JSON reference table from a file
pub fn load_reference_json<P: AsRef<Path>>(path: P) -> Result<HistoricalReferenceData, ReferenceError> {
    let file = File::open(path.as_ref())?;
    let data = load_reference_json_from_reader(BufReader::new(file))?;
    log::info!(
        "Loaded {} strategies from {}",
        data.strategies.len(),
        path.as_ref().display()
    );
    Ok(data)
}

/// Load a JSON reference table from any reader
pub fn load_reference_json_from_reader<R: Read>(reader: R) -> Result<HistoricalReferenceData, ReferenceError> {
    let raw: RawTable = serde_json::from_reader(reader)?;
    let mut strategies = Vec::with_capacity(raw.strategies.len());

    for (name, value) in raw.strategies {
        let raw_strategy: RawStrategy = serde_json::from_value(value)?;
        let mut pairs = Vec::with_capacity(raw_strategy.pairs.len());
        for (pair_name, pair_value) in raw_strategy.pairs {
            let pair: RawPair = serde_json::from_value(pair_value)?;
            pairs.push(PairReference::new(pair_name, pair.avg_monthly_return, pair.allocation_ratio));
        }
        strategies.push(StrategyReference {
            name,
            description: raw_strategy.description,
            pairs,
        });
    }

    let data = HistoricalReferenceData::new(strategies);
    data.validate()?;
    Ok(data)
}

/// Load a CSV reference table from a file
///
/// Columns: `strategy,description,pair,avg_monthly_return,allocation_ratio`
pub fn load_reference_csv<P: AsRef<Path>>(path: P) -> Result<HistoricalReferenceData, ReferenceError> {
    let file = File::open(path.as_ref())?;
    let data = load_reference_csv_from_reader(file)?;
    log::info!(
        "Loaded {} strategies from {}",
        data.strategies.len(),
        path.as_ref().display()
    );
    Ok(data)
}

/// Load a CSV reference table from any reader; strategies keep first-seen order
pub fn load_reference_csv_from_reader<R: Read>(reader: R) -> Result<HistoricalReferenceData, ReferenceError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut strategies: Vec<StrategyReference> = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        let pair = PairReference::new(row.pair, row.avg_monthly_return, row.allocation_ratio);

        match strategies.iter_mut().find(|s| s.name == row.strategy) {
            Some(existing) => {
                if existing.description.is_empty() {
                    existing.description = row.description;
                }
                existing.pairs.push(pair);
            }
            None => strategies.push(StrategyReference {
                name: row.strategy,
                description: row.description,
                pairs: vec![pair],
            }),
        }
    }

    let data = HistoricalReferenceData::new(strategies);
    data.validate()?;
    Ok(data)
}

/// Load the table from `data/historical_data.json`
pub fn load_default_reference() -> Result<HistoricalReferenceData, ReferenceError> {
    load_reference_json(DEFAULT_REFERENCE_PATH)
}

/// Load by file extension: `.csv` as CSV, anything else as JSON
pub fn load_reference_path(path: &Path) -> Result<HistoricalReferenceData, ReferenceError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => load_reference_csv(path),
        _ => load_reference_json(path),
    }
}
