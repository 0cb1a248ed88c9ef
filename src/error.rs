//! Error types for validation, projection, and reference data loading

use crate::format::dollars;
use crate::strategy::Strategy;
use thiserror::Error;

fn amount(value: &f64) -> String {
    dollars(*value)
}

/// Rejected caller input. The display text is sent to the caller verbatim.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Total investment must be at least {}", amount(.minimum))]
    InvestmentBelowMinimum { minimum: f64 },

    #[error("Total investment must be at most {}", amount(.maximum))]
    InvestmentAboveMaximum { maximum: f64 },

    #[error("Duration must be between {min} and {max} months")]
    DurationOutOfRange { min: u32, max: u32 },

    #[error("Strategy allocations must sum to 100%")]
    AllocationSum,

    #[error("Strategy allocations must be between 0% and 100%")]
    AllocationOutOfRange { strategy: Strategy },
}

/// Failure of a projection run
#[derive(Error, Debug)]
pub enum ProjectionError {
    #[error(transparent)]
    InvalidInput(#[from] ValidationError),

    /// Only raised under `UnknownStrategyPolicy::Reject`
    #[error("Strategy '{0}' has no entry in the reference data")]
    UnknownStrategy(Strategy),

    #[error("Non-finite value computed for {context}")]
    NonFinite { context: &'static str },

    /// A whole-dollar figure too large to hold exactly
    #[error("Value computed for {context} exceeds the exactly representable range")]
    OutOfRange { context: &'static str },
}

impl ProjectionError {
    /// Whether the caller is at fault (client error) rather than the system
    pub fn is_client_error(&self) -> bool {
        matches!(self, ProjectionError::InvalidInput(_))
    }
}

/// Failure loading a historical reference table
#[derive(Error, Debug)]
pub enum ReferenceError {
    #[error("I/O error reading reference data: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error in reference data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error in reference data: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid reference data: {0}")]
    Invalid(String),
}

/// Failure reading an engine config file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error reading config: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error in config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure writing a CSV report
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Report is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Failure loading a scenario file
#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("CSV error in scenario file: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error reading scenario file: {0}")]
    Io(#[from] std::io::Error),
}
