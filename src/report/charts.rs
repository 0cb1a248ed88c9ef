//! Chart-ready datasets for the results view

use crate::format::round_half_up;
use crate::projection::{MonthPoint, ProjectionInput, ProjectionResult};
use serde::Serialize;

/// One pie slice of the allocation chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationSlice {
    pub strategy: &'static str,
    pub percentage: f64,
    pub color: &'static str,
}

/// Per-pair bar within a strategy
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairBar {
    pub name: String,
    /// Average monthly return in percent
    pub contribution: f64,
}

/// One bar of the strategy comparison chart
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyBar {
    pub name: &'static str,
    pub monthly_return: f64,
    pub projected_profit: i64,
    pub color: &'static str,
    pub pairs: Vec<PairBar>,
}

/// All three datasets for one projection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub allocation: Vec<AllocationSlice>,
    pub strategies: Vec<StrategyBar>,
    pub projection: Vec<MonthPoint>,
}

impl ChartData {
    pub fn from_projection(result: &ProjectionResult, input: &ProjectionInput) -> Self {
        let allocation = input
            .allocations()
            .iter()
            .map(|(strategy, percentage)| AllocationSlice {
                strategy: strategy.name(),
                percentage,
                color: strategy.chart_color(),
            })
            .collect();

        let strategies = result
            .strategies
            .iter()
            .map(|s| StrategyBar {
                name: s.strategy.name(),
                monthly_return: s.return_rate,
                projected_profit: round_half_up(s.projected_profit()),
                color: s.strategy.chart_color(),
                pairs: s
                    .pairs
                    .iter()
                    .map(|p| PairBar {
                        name: p.name.clone(),
                        contribution: p.monthly_return,
                    })
                    .collect(),
            })
            .collect();

        Self {
            allocation,
            strategies,
            projection: result.monthly_projections.clone(),
        }
    }
}
