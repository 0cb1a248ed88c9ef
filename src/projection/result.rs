//! Projection output structures
//!
//! Serialized field names and number formatting match the calculate endpoint's
//! JSON contract: integral amounts are written without a fractional part.

use super::risk::RiskLevel;
use crate::format::MAX_SAFE_INTEGER;
use crate::strategy::Strategy;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Write a float the way a JavaScript JSON encoder does: `25000`, not `25000.0`
fn js_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if !value.is_finite() {
        serializer.serialize_none()
    } else if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

fn pairs_by_name<S: Serializer>(pairs: &[PairResult], serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(pairs.len()))?;
    for pair in pairs {
        map.serialize_entry(&pair.name, pair)?;
    }
    map.end()
}

fn strategies_by_name<S: Serializer>(
    strategies: &[StrategyResult],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(strategies.len()))?;
    for strategy in strategies {
        map.serialize_entry(strategy.strategy.name(), strategy)?;
    }
    map.end()
}

/// One currency pair's slice of a strategy
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairResult {
    #[serde(skip)]
    pub name: String,
    /// Pair's share of the strategy's capital
    #[serde(serialize_with = "js_number")]
    pub allocation: f64,
    #[serde(serialize_with = "js_number")]
    pub investment: f64,
    /// Average monthly return in percent
    #[serde(serialize_with = "js_number")]
    pub monthly_return: f64,
    /// Pair investment compounded at the pair's own rate over the duration
    #[serde(serialize_with = "js_number")]
    pub projected_return: f64,
}

/// One strategy's slice of the portfolio
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyResult {
    #[serde(skip)]
    pub strategy: Strategy,
    /// Fraction of total capital (percentage / 100)
    #[serde(serialize_with = "js_number")]
    pub allocation: f64,
    #[serde(serialize_with = "js_number")]
    pub investment: f64,
    #[serde(serialize_with = "pairs_by_name")]
    pub pairs: Vec<PairResult>,
    /// Ratio-weighted monthly return in percent
    #[serde(serialize_with = "js_number")]
    pub return_rate: f64,
    #[serde(serialize_with = "js_number")]
    pub projected_return: f64,
}

impl StrategyResult {
    /// Strategy with no pair breakdown and zero return
    pub fn new(strategy: Strategy, allocation: f64, investment: f64) -> Self {
        Self {
            strategy,
            allocation,
            investment,
            pairs: Vec::new(),
            return_rate: 0.0,
            projected_return: 0.0,
        }
    }

    /// Projected gain over the investment (0 for strategies that were skipped)
    pub fn projected_profit(&self) -> f64 {
        if self.projected_return == 0.0 {
            0.0
        } else {
            self.projected_return - self.investment
        }
    }
}

/// Portfolio value at the end of a month (month 0 is the starting point)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthPoint {
    pub month: u32,
    pub value: i64,
    pub profit: i64,
}

/// Complete projection result
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    /// Final balance after `duration` months
    pub total_return: i64,
    pub total_profit: i64,
    /// Total growth in percent, two decimals
    pub percentage_return: String,
    /// Portfolio weighted monthly rate in percent, two decimals
    pub avg_monthly_return: String,
    pub avg_monthly_profit: i64,
    pub risk_level: RiskLevel,
    pub risk_description: String,
    #[serde(serialize_with = "strategies_by_name")]
    pub strategies: Vec<StrategyResult>,
    pub monthly_projections: Vec<MonthPoint>,

    /// Unrounded portfolio weighted monthly rate in percent
    #[serde(skip)]
    pub portfolio_return_rate: f64,
}

impl ProjectionResult {
    pub fn strategy(&self, strategy: Strategy) -> Option<&StrategyResult> {
        self.strategies.iter().find(|s| s.strategy == strategy)
    }

    /// Add a month to the trajectory
    pub fn add_month(&mut self, point: MonthPoint) {
        self.monthly_projections.push(point);
    }

    /// Month count of the projection (trajectory length minus the month-0 point)
    pub fn duration(&self) -> u32 {
        self.monthly_projections.len().saturating_sub(1) as u32
    }

    /// Get summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        let final_value = self.monthly_projections.last().map(|p| p.value).unwrap_or(0);
        let best_strategy = self
            .strategies
            .iter()
            .filter(|s| s.allocation > 0.0)
            .max_by(|a, b| a.return_rate.total_cmp(&b.return_rate))
            .map(|s| s.strategy);

        ProjectionSummary {
            months: self.duration(),
            final_value,
            total_profit: self.total_profit,
            avg_monthly_return: self.avg_monthly_return.clone(),
            risk_level: self.risk_level,
            best_strategy,
        }
    }
}

/// Headline figures for console output and batch rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionSummary {
    pub months: u32,
    pub final_value: i64,
    pub total_profit: i64,
    pub avg_monthly_return: String,
    pub risk_level: RiskLevel,
    /// Highest-returning strategy with a nonzero allocation
    pub best_strategy: Option<Strategy>,
}

/// Inspectable non-fatal outcome of a projection run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProjectionWarning {
    /// Strategy has an allocation but no reference entry; it contributed zero
    UnknownStrategy { strategy: Strategy },
    /// Strategy's pair ratios sum to zero; its return rate was taken as 0
    DegenerateAggregation { strategy: Strategy },
}

impl ProjectionWarning {
    pub fn strategy(&self) -> Strategy {
        match self {
            ProjectionWarning::UnknownStrategy { strategy }
            | ProjectionWarning::DegenerateAggregation { strategy } => *strategy,
        }
    }
}

/// Result plus the warnings raised while computing it
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionOutcome {
    pub result: ProjectionResult,
    pub warnings: Vec<ProjectionWarning>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_number_formatting() {
        let pair = PairResult {
            name: "EURUSD".to_string(),
            allocation: 0.25,
            investment: 25_000.0,
            monthly_return: 11.0,
            projected_return: 34_985.5,
        };
        let json = serde_json::to_string(&pair).unwrap();
        assert_eq!(
            json,
            r#"{"allocation":0.25,"investment":25000,"monthlyReturn":11,"projectedReturn":34985.5}"#
        );
    }

    #[test]
    fn test_strategy_keys_follow_result_order() {
        let result = ProjectionResult {
            total_return: 100_000,
            total_profit: 0,
            percentage_return: "0.00".to_string(),
            avg_monthly_return: "0.00".to_string(),
            avg_monthly_profit: 0,
            risk_level: RiskLevel::Low,
            risk_description: RiskLevel::Low.description().to_string(),
            strategies: Strategy::ALL
                .iter()
                .map(|&s| StrategyResult::new(s, 0.25, 25_000.0))
                .collect(),
            monthly_projections: vec![MonthPoint { month: 0, value: 100_000, profit: 0 }],
            portfolio_return_rate: 0.0,
        };

        let json = serde_json::to_string(&result).unwrap();
        let falcon = json.find("\"Falcon\"").unwrap();
        let bs = json.find("\"BS Buy Sell\"").unwrap();
        let max_distance = json.find("\"Max Distance + RSI\"").unwrap();
        let ubs = json.find("\"UBS WITH ATR\"").unwrap();
        assert!(falcon < bs && bs < max_distance && max_distance < ubs);
        assert!(json.contains(r#""pairs":{}"#));
        assert!(!json.contains("portfolio"));
        assert_eq!(result.duration(), 0);
    }

    #[test]
    fn test_warning_serialization() {
        let warning = ProjectionWarning::DegenerateAggregation { strategy: Strategy::Falcon };
        assert_eq!(
            serde_json::to_string(&warning).unwrap(),
            r#"{"kind":"degenerate_aggregation","strategy":"Falcon"}"#
        );
        assert_eq!(warning.strategy(), Strategy::Falcon);
    }
}
