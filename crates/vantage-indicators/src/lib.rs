//! # vantage-indicators
//!
//! Turns project snapshots into standardized performance indicators.
//!
//! | Indicator | Formula | Guard |
//! |-----------|---------|-------|
//! | SPI | EV / PV | PV = 0 → undefined |
//! | CPI | EV / AC | AC = 0 → undefined |
//! | Budget variance | PV − AC | none (signed) |
//! | Resource utilization | actual / planned hours | planned = 0 → undefined |
//!
//! Every indicator is a pure function of one snapshot. History adds a rolling
//! least-squares trend over the last N points.

pub mod cache;
pub mod engine;
pub mod formula;
pub mod health;
pub mod portfolio;
pub mod quality;
pub mod trend;

pub use cache::IndicatorCache;
pub use engine::IndicatorEngine;
pub use health::HealthAssessor;
pub use portfolio::{summarize_portfolio, PortfolioEntry};
pub use quality::assess_quality;
