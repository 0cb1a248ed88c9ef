//! Qualitative risk label from the high-volatility allocation share

use serde::{Deserialize, Serialize};
use std::fmt;

/// Combined high-volatility percentage above which a portfolio is High risk
pub const HIGH_RISK_THRESHOLD: f64 = 70.0;

/// Combined high-volatility percentage above which a portfolio is Moderate risk
pub const MODERATE_RISK_THRESHOLD: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    /// Classify from the raw percentage (0-100) in BS Buy Sell + Max Distance + RSI
    pub fn classify(high_volatility_pct: f64) -> Self {
        if high_volatility_pct > HIGH_RISK_THRESHOLD {
            RiskLevel::High
        } else if high_volatility_pct > MODERATE_RISK_THRESHOLD {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Conservative portfolio with lower volatility",
            RiskLevel::Moderate => "Balanced portfolio with moderate volatility",
            RiskLevel::High => "Aggressive portfolio with higher volatility",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_scenarios() {
        assert_eq!(RiskLevel::classify(80.0), RiskLevel::High);
        assert_eq!(RiskLevel::classify(50.0), RiskLevel::Moderate);
        assert_eq!(RiskLevel::classify(20.0), RiskLevel::Low);
    }

    #[test]
    fn test_thresholds_are_exclusive() {
        assert_eq!(RiskLevel::classify(70.0), RiskLevel::Moderate);
        assert_eq!(RiskLevel::classify(40.0), RiskLevel::Low);
        assert_eq!(RiskLevel::classify(70.5), RiskLevel::High);
    }

    #[test]
    fn test_serializes_as_label() {
        assert_eq!(serde_json::to_string(&RiskLevel::Moderate).unwrap(), "\"Moderate\"");
        assert_eq!(
            RiskLevel::High.description(),
            "Aggressive portfolio with higher volatility"
        );
    }
}
