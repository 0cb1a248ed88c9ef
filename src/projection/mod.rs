//! Projection engine for multi-strategy portfolio return projections

mod engine;
mod input;
mod result;
mod risk;

pub use engine::{compound, EngineConfig, ProjectionEngine, UnknownStrategyPolicy};
pub use input::{ProjectionInput, ProjectionRequest, ValidationBounds};
pub use result::{
    MonthPoint, PairResult, ProjectionOutcome, ProjectionResult, ProjectionSummary,
    ProjectionWarning, StrategyResult,
};
pub use risk::{RiskLevel, HIGH_RISK_THRESHOLD, MODERATE_RISK_THRESHOLD};
