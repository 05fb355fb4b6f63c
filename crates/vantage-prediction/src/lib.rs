//! # vantage-prediction
//!
//! [`PredictionOrchestrator`] runs every registered model for a project and
//! collects one outcome per kind into a [`PredictionBundle`](vantage_core::PredictionBundle).
//! A model that cannot predict gets a `Failed` slot; the others still run.

pub mod orchestrator;
pub mod training;

pub use orchestrator::PredictionOrchestrator;
pub use training::TrainingSet;
