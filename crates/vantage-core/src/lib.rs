//! # vantage-core
//!
//! Foundation crate for the Vantage analytics pipeline.
//! Defines the data model, the error taxonomy, configuration, external
//! interface traits, and constants. Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::VantageConfig;
pub use errors::{VantageError, VantageResult};
pub use models::{
    Alert, FeatureVector, IndicatorSeries, IndicatorSet, Measure, ModelKind, PredictionBundle,
    PredictionResult, ProjectSnapshot, Rule, Severity, UndefinedReason,
};
