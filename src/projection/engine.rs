//! Core projection engine: allocation split, weighted returns, monthly compounding

use super::input::{ProjectionInput, ProjectionRequest, ValidationBounds};
use super::result::{
    MonthPoint, PairResult, ProjectionOutcome, ProjectionResult, ProjectionWarning, StrategyResult,
};
use super::risk::RiskLevel;
use crate::error::{ConfigError, ProjectionError};
use crate::format::{fixed2, round_half_up, MAX_SAFE_INTEGER};
use crate::reference::{builtin, HistoricalReferenceData, StrategyReference};
use crate::strategy::Strategy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// What to do when an allocated strategy has no reference entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownStrategyPolicy {
    /// Contribute zero everywhere and report `ProjectionWarning::UnknownStrategy`
    #[default]
    Skip,
    /// Fail the projection with `ProjectionError::UnknownStrategy`
    Reject,
}

/// Configuration for a projection engine
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Input bounds checked before computing
    pub bounds: ValidationBounds,

    /// Handling of strategies missing from the reference table
    pub unknown_strategy: UnknownStrategyPolicy,
}

impl EngineConfig {
    /// Load from a JSON file; omitted fields keep their defaults
    pub fn from_json_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&text)?;
        log::info!("Loaded engine config from {}", path.display());
        Ok(config)
    }
}

/// Grow `principal` at `rate_pct` percent per month for `months` months
pub fn compound(principal: f64, rate_pct: f64, months: u32) -> f64 {
    principal * (1.0 + rate_pct / 100.0).powf(months as f64)
}

/// Main projection engine
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    reference: Arc<HistoricalReferenceData>,
    config: EngineConfig,
}

impl ProjectionEngine {
    /// Create a new projection engine with given reference data and config
    pub fn new(reference: Arc<HistoricalReferenceData>, config: EngineConfig) -> Self {
        Self { reference, config }
    }

    /// Engine over the built-in reference table with default config
    pub fn with_builtin() -> Self {
        Self::new(builtin(), EngineConfig::default())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn reference(&self) -> &HistoricalReferenceData {
        &self.reference
    }

    /// Validate a request against the configured bounds, then project it
    pub fn project(&self, request: &ProjectionRequest) -> Result<ProjectionOutcome, ProjectionError> {
        let input = request.validate(&self.config.bounds)?;
        self.project_input(&input)
    }

    /// Run the projection for validated input
    pub fn project_input(&self, input: &ProjectionInput) -> Result<ProjectionOutcome, ProjectionError> {
        let total_investment = input.total_investment();
        let duration = input.duration();
        let mut warnings = Vec::new();

        // Strategy-level split and pair aggregation
        let mut strategies = Vec::with_capacity(Strategy::ALL.len());
        for (strategy, pct) in input.allocations().iter() {
            let allocation = pct / 100.0;
            let mut strategy_result =
                StrategyResult::new(strategy, allocation, total_investment * allocation);

            if allocation != 0.0 {
                match self.reference.strategy(strategy.name()) {
                    Some(reference) => {
                        if let Some(warning) =
                            self.aggregate_strategy(reference, duration, &mut strategy_result)
                        {
                            warnings.push(warning);
                        }
                    }
                    None => match self.config.unknown_strategy {
                        UnknownStrategyPolicy::Skip => {
                            log::warn!(
                                "No reference data for strategy '{}', contributing zero",
                                strategy
                            );
                            warnings.push(ProjectionWarning::UnknownStrategy { strategy });
                        }
                        UnknownStrategyPolicy::Reject => {
                            return Err(ProjectionError::UnknownStrategy(strategy));
                        }
                    },
                }
            }

            strategies.push(strategy_result);
        }

        // Portfolio weighted monthly rate
        let portfolio_rate: f64 = strategies
            .iter()
            .map(|s| s.return_rate * s.allocation)
            .sum();

        let total_return = compound(total_investment, portfolio_rate, duration);
        let total_profit = total_return - total_investment;
        let percentage_return = (total_return / total_investment - 1.0) * 100.0;
        ensure_finite(portfolio_rate, "portfolio return rate")?;
        ensure_finite(total_return, "total return")?;
        ensure_finite(percentage_return, "percentage return")?;

        let risk_level = RiskLevel::classify(input.allocations().high_volatility());

        let mut result = ProjectionResult {
            total_return: whole_dollars(total_return, "total return")?,
            total_profit: whole_dollars(total_profit, "total profit")?,
            percentage_return: fixed2(percentage_return),
            avg_monthly_return: fixed2(portfolio_rate),
            avg_monthly_profit: whole_dollars(
                total_profit / f64::from(duration),
                "average monthly profit",
            )?,
            risk_level,
            risk_description: risk_level.description().to_string(),
            strategies,
            monthly_projections: Vec::with_capacity(duration as usize + 1),
            portfolio_return_rate: portfolio_rate,
        };

        for month in 0..=duration {
            let value = compound(total_investment, portfolio_rate, month);
            result.add_month(MonthPoint {
                month,
                value: whole_dollars(value, "monthly value")?,
                profit: whole_dollars(value - total_investment, "monthly profit")?,
            });
        }

        log::debug!(
            "Projected {} over {} months at {:.4}%/month: final {}",
            total_investment,
            duration,
            portfolio_rate,
            result.total_return
        );

        Ok(ProjectionOutcome { result, warnings })
    }

    /// Fill in pair breakdown, weighted return rate, and projected return
    fn aggregate_strategy(
        &self,
        reference: &StrategyReference,
        duration: u32,
        result: &mut StrategyResult,
    ) -> Option<ProjectionWarning> {
        let mut total_allocation_ratio = 0.0;
        let mut weighted_return_rate = 0.0;

        for pair in &reference.pairs {
            let pair_investment = result.investment * pair.allocation_ratio;

            // Each pair compounds its own slice at its own rate
            result.pairs.push(PairResult {
                name: pair.name.clone(),
                allocation: pair.allocation_ratio,
                investment: pair_investment,
                monthly_return: pair.avg_monthly_return,
                projected_return: compound(pair_investment, pair.avg_monthly_return, duration),
            });

            total_allocation_ratio += pair.allocation_ratio;
            weighted_return_rate += pair.avg_monthly_return * pair.allocation_ratio;
        }

        let warning = if total_allocation_ratio == 0.0 {
            log::warn!(
                "Strategy '{}' pair ratios sum to zero, using a 0% return rate",
                result.strategy
            );
            result.return_rate = 0.0;
            Some(ProjectionWarning::DegenerateAggregation { strategy: result.strategy })
        } else {
            result.return_rate = weighted_return_rate / total_allocation_ratio;
            None
        };

        result.projected_return = compound(result.investment, result.return_rate, duration);

        log::debug!(
            "{}: {} pairs, {:.4}%/month, projected {:.2}",
            result.strategy,
            result.pairs.len(),
            result.return_rate,
            result.projected_return
        );

        warning
    }
}

fn ensure_finite(value: f64, context: &'static str) -> Result<(), ProjectionError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ProjectionError::NonFinite { context })
    }
}

/// Round to whole dollars, failing rather than saturating past 2^53
fn whole_dollars(value: f64, context: &'static str) -> Result<i64, ProjectionError> {
    ensure_finite(value, context)?;
    if value.abs() > MAX_SAFE_INTEGER {
        return Err(ProjectionError::OutOfRange { context });
    }
    Ok(round_half_up(value))
}
