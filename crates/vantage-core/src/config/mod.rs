//! Configuration for every Vantage subsystem.
//!
//! Every section is `#[serde(default)]`, so an empty TOML document yields a fully
//! populated config.

mod alert_config;
pub mod defaults;
mod indicator_config;
mod model_config;
mod pipeline_config;

pub use alert_config::AlertConfig;
pub use indicator_config::{FeatureConfig, HealthThresholds, IndicatorConfig};
pub use model_config::{
    BudgetConfig, ModelConfig, ResourceConfig, RiskBands, RiskConfig, TimelineConfig,
};
pub use pipeline_config::{ObservabilityConfig, PipelineConfig};

use serde::{Deserialize, Serialize};

use crate::errors::{VantageError, VantageResult};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VantageConfig {
    pub indicators: IndicatorConfig,
    pub features: FeatureConfig,
    pub models: ModelConfig,
    pub alerts: AlertConfig,
    pub pipeline: PipelineConfig,
    pub observability: ObservabilityConfig,
}

impl VantageConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(input: &str) -> VantageResult<Self> {
        let config: Self =
            toml::from_str(input).map_err(|e| VantageError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that would make the pipeline misbehave.
    pub fn validate(&self) -> VantageResult<()> {
        let mut problems = Vec::new();

        if self.indicators.trend_window < 2 {
            problems.push("indicators.trend_window must be at least 2".to_string());
        }
        let bands = &self.models.risk.bands;
        if !(0.0..=100.0).contains(&bands.low_max)
            || !(0.0..=100.0).contains(&bands.medium_max)
            || bands.low_max >= bands.medium_max
        {
            problems.push(format!(
                "models.risk.bands must satisfy 0 <= low_max < medium_max <= 100, got {} / {}",
                bands.low_max, bands.medium_max
            ));
        }
        let budget = &self.models.budget;
        if !(0.0..=1.0).contains(&budget.trend_weight) {
            problems.push("models.budget.trend_weight must be within [0, 1]".to_string());
        }
        if budget.bootstrap_samples == 0 {
            problems.push("models.budget.bootstrap_samples must be positive".to_string());
        }
        if budget.lower_percentile >= budget.upper_percentile {
            problems.push(
                "models.budget.lower_percentile must be below upper_percentile".to_string(),
            );
        }
        let health = &self.indicators.health;
        if health.schedule_red > health.schedule_yellow || health.cost_red > health.cost_yellow {
            problems.push("indicators.health red thresholds must not exceed yellow".to_string());
        }
        if self.alerts.severity_order.is_empty() {
            problems.push("alerts.severity_order must not be empty".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(VantageError::ConfigError(problems.join("; ")))
        }
    }
}
