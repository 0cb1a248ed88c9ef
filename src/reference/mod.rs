//! Historical strategy/pair returns the projection engine reads from
//!
//! The table is static configuration: built once per process (or loaded from
//! `data/historical_data.json`) and never mutated. A replacement goes through
//! [`ReferenceStore`] as a new versioned snapshot.

pub mod loader;
mod store;

pub use loader::{
    load_default_reference, load_reference_csv, load_reference_csv_from_reader,
    load_reference_json, load_reference_json_from_reader, load_reference_path,
    DEFAULT_REFERENCE_PATH,
};
pub use store::{ReferenceSnapshot, ReferenceStore};

use crate::error::ReferenceError;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};

/// Tolerance used when checking that a strategy's pair ratios sum to 1.0
pub const RATIO_SUM_TOLERANCE: f64 = 1e-3;

/// One currency pair's history within a strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairReference {
    pub name: String,
    /// Average monthly return in percent (3.32 = 3.32%/month)
    pub avg_monthly_return: f64,
    /// Share of the strategy's capital placed on this pair, in [0, 1]
    pub allocation_ratio: f64,
}

impl PairReference {
    pub fn new(name: impl Into<String>, avg_monthly_return: f64, allocation_ratio: f64) -> Self {
        Self {
            name: name.into(),
            avg_monthly_return,
            allocation_ratio,
        }
    }
}

/// A strategy's description and its pairs, in table order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyReference {
    pub name: String,
    pub description: String,
    pub pairs: Vec<PairReference>,
}

impl StrategyReference {
    /// Sum of the pairs' allocation ratios
    pub fn ratio_sum(&self) -> f64 {
        self.pairs.iter().map(|p| p.allocation_ratio).sum()
    }

    /// Ratio-weighted mean monthly return; `None` when the ratios sum to zero
    pub fn weighted_return(&self) -> Option<f64> {
        let total_ratio = self.ratio_sum();
        if total_ratio == 0.0 {
            return None;
        }
        let weighted: f64 = self
            .pairs
            .iter()
            .map(|p| p.avg_monthly_return * p.allocation_ratio)
            .sum();
        Some(weighted / total_ratio)
    }
}

/// Strategy name -> historical pair returns
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HistoricalReferenceData {
    pub strategies: Vec<StrategyReference>,
}

impl HistoricalReferenceData {
    pub fn new(strategies: Vec<StrategyReference>) -> Self {
        Self { strategies }
    }

    /// Find a strategy by exact name
    pub fn strategy(&self, name: &str) -> Option<&StrategyReference> {
        self.strategies.iter().find(|s| s.name == name)
    }

    /// Number of pairs listed under a strategy (0 when absent)
    pub fn pair_count(&self, name: &str) -> usize {
        self.strategy(name).map(|s| s.pairs.len()).unwrap_or(0)
    }

    /// Built-in table, identical to the shipped `data/historical_data.json`
    pub fn default_table() -> Self {
        let falcon = StrategyReference {
            name: "Falcon".to_string(),
            description: "Conservative strategy with 5 GBPUSD pairs".to_string(),
            pairs: vec![
                PairReference::new("GBPUSD V1", 2.6, 0.2),
                PairReference::new("GBPUSD V2", 3.5, 0.2),
                PairReference::new("GBPUSD V3", 4.0, 0.2),
                PairReference::new("GBPUSD V4", 3.3, 0.2),
                PairReference::new("GBPUSD V5", 3.2, 0.2),
            ],
        };

        let bs_buy_sell = StrategyReference {
            name: "BS Buy Sell".to_string(),
            description: "Balanced strategy with 3 currency pairs".to_string(),
            pairs: vec![
                PairReference::new("EURUSD", 2.0, 0.3333),
                PairReference::new("NZDCAD", 1.0, 0.3333),
                PairReference::new("USDCAD", 1.1, 0.3334),
            ],
        };

        let max_distance = StrategyReference {
            name: "Max Distance + RSI".to_string(),
            description: "Aggressive strategy with 10 diverse currency pairs".to_string(),
            pairs: vec![
                PairReference::new("AUDUSD", 1.4, 0.1),
                PairReference::new("EURGBP V1", 1.0, 0.1),
                PairReference::new("EURGBP V2", 1.0, 0.1),
                PairReference::new("EURUSD V1", 1.8, 0.1),
                PairReference::new("EURUSD V2", 4.2, 0.1),
                PairReference::new("NZDCAD", 8.5, 0.1),
                PairReference::new("USDCAD", 1.2, 0.1),
                PairReference::new("USDCHF", 2.0, 0.1),
                PairReference::new("USDJPY V1", 1.3, 0.1),
                PairReference::new("USDJPY V2", 1.3, 0.1),
            ],
        };

        let ubs = StrategyReference {
            name: "UBS WITH ATR".to_string(),
            description: "High return strategy with 4 carefully selected pairs".to_string(),
            pairs: vec![
                PairReference::new("AUDUSD", 3.9, 0.25),
                PairReference::new("EURUSD", 11.0, 0.25),
                PairReference::new("NZDCAD", 7.5, 0.25),
                PairReference::new("USDCAD", 3.9, 0.25),
            ],
        };

        Self::new(vec![falcon, bs_buy_sell, max_distance, ubs])
    }

    /// Check value ranges; ratios that do not sum to 1.0 are only logged
    pub fn validate(&self) -> Result<(), ReferenceError> {
        for strategy in &self.strategies {
            for pair in &strategy.pairs {
                if !pair.avg_monthly_return.is_finite() {
                    return Err(ReferenceError::Invalid(format!(
                        "{} / {}: avg_monthly_return must be finite",
                        strategy.name, pair.name
                    )));
                }
                if !(0.0..=1.0).contains(&pair.allocation_ratio) {
                    return Err(ReferenceError::Invalid(format!(
                        "{} / {}: allocation_ratio {} outside [0, 1]",
                        strategy.name, pair.name, pair.allocation_ratio
                    )));
                }
            }

            let ratio_sum = strategy.ratio_sum();
            if (ratio_sum - 1.0).abs() > RATIO_SUM_TOLERANCE {
                log::warn!(
                    "Strategy '{}' pair ratios sum to {:.4}, expected 1.0",
                    strategy.name,
                    ratio_sum
                );
            }
        }
        Ok(())
    }
}

/// Process-wide built-in table, created on first use
pub fn builtin() -> Arc<HistoricalReferenceData> {
    static BUILTIN: OnceLock<Arc<HistoricalReferenceData>> = OnceLock::new();
    BUILTIN
        .get_or_init(|| Arc::new(HistoricalReferenceData::default_table()))
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::Strategy;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_default_table_covers_all_strategies() {
        let table = HistoricalReferenceData::default_table();
        for strategy in Strategy::ALL {
            assert!(table.strategy(strategy.name()).is_some(), "missing {}", strategy);
        }
        assert_eq!(table.pair_count("Falcon"), 5);
        assert_eq!(table.pair_count("BS Buy Sell"), 3);
        assert_eq!(table.pair_count("Max Distance + RSI"), 10);
        assert_eq!(table.pair_count("UBS WITH ATR"), 4);
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_documented_weighted_returns() {
        let table = HistoricalReferenceData::default_table();
        let rate = |name: &str| table.strategy(name).unwrap().weighted_return().unwrap();

        assert_abs_diff_eq!(rate("Falcon"), 3.32, epsilon = 0.005);
        assert_abs_diff_eq!(rate("BS Buy Sell"), 1.37, epsilon = 0.005);
        assert_abs_diff_eq!(rate("Max Distance + RSI"), 2.37, epsilon = 0.005);
        assert_abs_diff_eq!(rate("UBS WITH ATR"), 6.58, epsilon = 0.006);
    }

    #[test]
    fn test_zero_ratio_sum_has_no_weighted_return() {
        let strategy = StrategyReference {
            name: "Empty".to_string(),
            description: String::new(),
            pairs: vec![PairReference::new("EURUSD", 2.0, 0.0)],
        };
        assert_eq!(strategy.weighted_return(), None);
    }

    #[test]
    fn test_validate_rejects_ratio_out_of_range() {
        let table = HistoricalReferenceData::new(vec![StrategyReference {
            name: "Falcon".to_string(),
            description: String::new(),
            pairs: vec![PairReference::new("GBPUSD", 2.0, 1.5)],
        }]);
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_builtin_is_shared() {
        let a = builtin();
        let b = builtin();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
