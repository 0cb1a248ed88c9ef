//! Investment Projection - Compounded monthly return projections for forex strategy portfolios
//!
//! This library provides:
//! - Validation of projection requests against configurable bounds
//! - Strategy and currency-pair level return aggregation from historical data
//! - Month-by-month portfolio trajectory and risk classification
//! - JSON request handling, CSV report export and chart datasets
//! - Parallel batch scenario runs over a versioned reference table

pub mod api;
pub mod error;
pub mod format;
pub mod projection;
pub mod reference;
pub mod report;
pub mod scenario;
pub mod strategy;

// Re-export commonly used types
pub use error::{ProjectionError, ReferenceError, ValidationError};
pub use projection::{
    EngineConfig, ProjectionEngine, ProjectionInput, ProjectionOutcome, ProjectionRequest,
    ProjectionResult, RiskLevel, UnknownStrategyPolicy, ValidationBounds,
};
pub use reference::{HistoricalReferenceData, ReferenceStore};
pub use scenario::ScenarioRunner;
pub use strategy::{Allocations, Strategy};
