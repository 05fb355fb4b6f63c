//! # vantage-observability
//!
//! Structured tracing for the evaluation cycle: subscriber setup driven by
//! `[observability]` config, one span per pipeline step, structured events for the
//! transitions operators care about, and lock-free counters for the pipeline.

pub mod metrics;
pub mod tracing_setup;

pub use metrics::{CycleOutcome, MetricsSnapshot, PipelineMetrics};
pub use tracing_setup::init_tracing;
