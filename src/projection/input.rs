//! Caller input: the unchecked request and its validated form

use crate::error::ValidationError;
use crate::strategy::{Allocations, Strategy};
use serde::{Deserialize, Deserializer, Serialize};

/// Input bounds applied before any computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationBounds {
    /// Minimum total investment (inclusive)
    pub min_investment: f64,
    /// Maximum total investment (inclusive), unbounded when None
    pub max_investment: Option<f64>,
    /// Duration range in months (inclusive)
    pub min_duration: u32,
    pub max_duration: u32,
}

impl ValidationBounds {
    /// Bounds of the request-serving path. These are authoritative.
    pub fn server() -> Self {
        Self {
            min_investment: 100_000.0,
            max_investment: None,
            min_duration: 1,
            max_duration: 60,
        }
    }

    /// Bounds the browser input form enforced ($1,000-$10,000,000, 3-60 months)
    ///
    /// Kept so the discrepancy with [`ValidationBounds::server`] stays visible;
    /// nothing uses it unless a caller opts in through config.
    pub fn client_form() -> Self {
        Self {
            min_investment: 1_000.0,
            max_investment: Some(10_000_000.0),
            min_duration: 3,
            max_duration: 60,
        }
    }
}

impl Default for ValidationBounds {
    fn default() -> Self {
        Self::server()
    }
}

/// Accept any JSON value; anything other than a number reads as missing
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_f64()))
}

/// Unchecked request body of the calculate endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionRequest {
    #[serde(default, deserialize_with = "lenient_number")]
    pub total_investment: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub duration: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub falcon_allocation: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub bs_buy_allocation: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub max_distance_allocation: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub ubs_allocation: Option<f64>,
}

impl ProjectionRequest {
    /// Request with every field present
    pub fn new(total_investment: f64, duration: u32, allocations: Allocations) -> Self {
        Self {
            total_investment: Some(total_investment),
            duration: Some(duration as f64),
            falcon_allocation: Some(allocations.falcon),
            bs_buy_allocation: Some(allocations.bs_buy_sell),
            max_distance_allocation: Some(allocations.max_distance),
            ubs_allocation: Some(allocations.ubs),
        }
    }

    /// Check the request against `bounds`
    ///
    /// Order matters: investment, then duration, then the allocation sum, so the
    /// first failing rule decides the message.
    pub fn validate(&self, bounds: &ValidationBounds) -> Result<ProjectionInput, ValidationError> {
        let total_investment = match self.total_investment {
            Some(v) if v.is_finite() && v != 0.0 && v >= bounds.min_investment => v,
            _ => {
                return Err(ValidationError::InvestmentBelowMinimum {
                    minimum: bounds.min_investment,
                })
            }
        };
        if let Some(maximum) = bounds.max_investment {
            if total_investment > maximum {
                return Err(ValidationError::InvestmentAboveMaximum { maximum });
            }
        }

        // A projection needs at least one month, whatever the configured minimum
        let min_duration = bounds.min_duration.max(1);
        let duration = match self.duration {
            Some(d)
                if d.fract() == 0.0
                    && d >= f64::from(min_duration)
                    && d <= f64::from(bounds.max_duration) =>
            {
                d as u32
            }
            _ => {
                return Err(ValidationError::DurationOutOfRange {
                    min: min_duration,
                    max: bounds.max_duration,
                })
            }
        };

        let allocations = match (
            self.falcon_allocation,
            self.bs_buy_allocation,
            self.max_distance_allocation,
            self.ubs_allocation,
        ) {
            (Some(falcon), Some(bs_buy_sell), Some(max_distance), Some(ubs)) => {
                Allocations::new(falcon, bs_buy_sell, max_distance, ubs)
            }
            _ => return Err(ValidationError::AllocationSum),
        };

        // Exact comparison, no tolerance
        if allocations.sum() != 100.0 {
            return Err(ValidationError::AllocationSum);
        }

        if let Some((strategy, _)) = allocations
            .iter()
            .find(|(_, pct)| !(0.0..=100.0).contains(pct))
        {
            return Err(ValidationError::AllocationOutOfRange { strategy });
        }

        Ok(ProjectionInput {
            total_investment,
            duration,
            allocations,
        })
    }
}

/// Validated projection input; only obtainable through [`ProjectionRequest::validate`]
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionInput {
    total_investment: f64,
    duration: u32,
    allocations: Allocations,
}

impl ProjectionInput {
    pub fn total_investment(&self) -> f64 {
        self.total_investment
    }

    /// Duration in months
    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn allocations(&self) -> &Allocations {
        &self.allocations
    }

    /// Allocation percentage for one strategy
    pub fn allocation(&self, strategy: Strategy) -> f64 {
        self.allocations.get(strategy)
    }
}
