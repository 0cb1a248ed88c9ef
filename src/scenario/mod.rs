//! Scenario runner for efficient batch projections
//!
//! Holds the engine config and a versioned reference table, then runs many
//! projections against a single snapshot without reloading anything.

mod loader;

pub use loader::{load_scenarios, load_scenarios_from_reader, DEFAULT_SCENARIOS_PATH};

use crate::error::{ProjectionError, ReferenceError};
use crate::projection::{EngineConfig, ProjectionEngine, ProjectionOutcome, ProjectionRequest};
use crate::reference::{builtin, HistoricalReferenceData, ReferenceStore};
use rayon::prelude::*;
use std::sync::Arc;

/// A named request from a batch file
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub id: String,
    pub request: ProjectionRequest,
}

/// Pre-loaded scenario runner for batch projections
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(EngineConfig::default(), reference);
///
/// let outcomes = runner.run_batch(&requests);
/// let version = runner.replace_reference(updated_table)?;
/// ```
#[derive(Debug)]
pub struct ScenarioRunner {
    config: EngineConfig,
    store: ReferenceStore,
}

impl ScenarioRunner {
    pub fn new(config: EngineConfig, reference: Arc<HistoricalReferenceData>) -> Self {
        Self {
            config,
            store: ReferenceStore::new(reference),
        }
    }

    /// Runner over the built-in table with default config
    pub fn with_builtin() -> Self {
        Self::new(EngineConfig::default(), builtin())
    }

    /// Engine bound to the current reference snapshot
    pub fn engine(&self) -> ProjectionEngine {
        let snapshot = self.store.snapshot();
        ProjectionEngine::new(snapshot.data.clone(), self.config.clone())
    }

    /// Run a single projection
    pub fn run(&self, request: &ProjectionRequest) -> Result<ProjectionOutcome, ProjectionError> {
        self.engine().project(request)
    }

    /// Run many projections in parallel against one snapshot; output order matches input
    pub fn run_batch(
        &self,
        requests: &[ProjectionRequest],
    ) -> Vec<Result<ProjectionOutcome, ProjectionError>> {
        let engine = self.engine();
        requests.par_iter().map(|r| engine.project(r)).collect()
    }

    /// Run loaded scenarios, pairing each outcome with its scenario id
    pub fn run_scenarios<'a>(
        &self,
        scenarios: &'a [Scenario],
    ) -> Vec<(&'a str, Result<ProjectionOutcome, ProjectionError>)> {
        let engine = self.engine();
        scenarios
            .par_iter()
            .map(|s| (s.id.as_str(), engine.project(&s.request)))
            .collect()
    }

    /// Install a new reference table; in-flight batches keep their snapshot
    pub fn replace_reference(
        &self,
        reference: Arc<HistoricalReferenceData>,
    ) -> Result<u64, ReferenceError> {
        self.store.replace(reference)
    }

    pub fn reference_version(&self) -> u64 {
        self.store.version()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::with_builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::{PairReference, StrategyReference};
    use crate::strategy::Allocations;

    fn request(investment: f64, duration: u32, split: [f64; 4]) -> ProjectionRequest {
        ProjectionRequest::new(
            investment,
            duration,
            Allocations::new(split[0], split[1], split[2], split[3]),
        )
    }

    #[test]
    fn test_batch_preserves_order() {
        let runner = ScenarioRunner::with_builtin();
        let requests: Vec<_> = (1..=40).map(|d| request(100_000.0, d, [25.0; 4])).collect();

        let outcomes = runner.run_batch(&requests);
        assert_eq!(outcomes.len(), 40);
        for (i, outcome) in outcomes.iter().enumerate() {
            assert_eq!(outcome.as_ref().unwrap().result.duration(), i as u32 + 1);
        }
    }

    #[test]
    fn test_batch_matches_single_runs() {
        let runner = ScenarioRunner::with_builtin();
        let requests = vec![
            request(100_000.0, 12, [25.0; 4]),
            request(99_999.0, 12, [25.0; 4]),
            request(300_000.0, 48, [10.0, 40.0, 40.0, 10.0]),
        ];

        let batch = runner.run_batch(&requests);
        assert!(batch[1].is_err());
        for (req, outcome) in requests.iter().zip(&batch) {
            match (runner.run(req), outcome) {
                (Ok(single), Ok(batched)) => assert_eq!(&single, batched),
                (Err(a), Err(b)) => assert_eq!(a.to_string(), b.to_string()),
                _ => panic!("batch and single run disagree"),
            }
        }
    }

    #[test]
    fn test_replace_reference_changes_results() {
        let runner = ScenarioRunner::with_builtin();
        let req = request(100_000.0, 12, [100.0, 0.0, 0.0, 0.0]);
        let before = runner.run(&req).unwrap().result.total_return;
        assert_eq!(runner.reference_version(), 1);

        let flat = HistoricalReferenceData::new(vec![StrategyReference {
            name: "Falcon".to_string(),
            description: String::new(),
            pairs: vec![PairReference::new("GBPUSD", 0.0, 1.0)],
        }]);
        assert_eq!(runner.replace_reference(Arc::new(flat)).unwrap(), 2);

        let after = runner.run(&req).unwrap().result.total_return;
        assert!(before > after);
        assert_eq!(after, 100_000);
    }

    #[test]
    fn test_replace_reference_rejects_out_of_range_ratio() {
        let runner = ScenarioRunner::with_builtin();
        let bad = HistoricalReferenceData::new(vec![StrategyReference {
            name: "Falcon".to_string(),
            description: String::new(),
            pairs: vec![PairReference::new("GBPUSD", 2.0, 1.5)],
        }]);

        assert!(runner.replace_reference(Arc::new(bad)).is_err());
        assert_eq!(runner.reference_version(), 1);
        assert!(runner.run(&request(100_000.0, 12, [25.0; 4])).is_ok());
    }

    #[test]
    fn test_run_scenarios_pairs_ids() {
        let runner = ScenarioRunner::default();
        let scenarios = vec![
            Scenario { id: "a".to_string(), request: request(100_000.0, 6, [25.0; 4]) },
            Scenario { id: "b".to_string(), request: request(100_000.0, 0, [25.0; 4]) },
        ];
        let results = runner.run_scenarios(&scenarios);
        assert_eq!(results[0].0, "a");
        assert!(results[0].1.is_ok());
        assert_eq!(results[1].0, "b");
        assert!(results[1].1.is_err());
    }
}
