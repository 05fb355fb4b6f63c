use serde::{Deserialize, Serialize};

use super::defaults;
use crate::models::RiskCategory;

/// Configuration for the built-in predictive models.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub timeline: TimelineConfig,
    pub budget: BudgetConfig,
    pub risk: RiskConfig,
    pub resource: ResourceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// z-score for the residual interval. Default: 1.96 (95%).
    pub interval_z: f64,
    /// Ridge term added to the normal equations.
    pub ridge_lambda: f64,
    /// Residual standard deviation assumed before any fit.
    pub prior_residual_std_days: f64,
    /// Confidence reported by the untrained prior.
    pub prior_confidence: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            interval_z: defaults::DEFAULT_INTERVAL_Z,
            ridge_lambda: defaults::DEFAULT_RIDGE_LAMBDA,
            prior_residual_std_days: defaults::DEFAULT_PRIOR_RESIDUAL_STD_DAYS,
            prior_confidence: defaults::DEFAULT_PRIOR_CONFIDENCE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetConfig {
    /// Number of bootstrap resamples for the overrun probability.
    pub bootstrap_samples: usize,
    /// Weight of the burn-rate trend component; the series component gets the rest.
    pub trend_weight: f64,
    /// Holt level smoothing factor.
    pub smoothing_alpha: f64,
    /// Holt trend smoothing factor.
    pub smoothing_beta: f64,
    pub lower_percentile: f64,
    pub upper_percentile: f64,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            bootstrap_samples: defaults::DEFAULT_BOOTSTRAP_SAMPLES,
            trend_weight: defaults::DEFAULT_TREND_WEIGHT,
            smoothing_alpha: defaults::DEFAULT_SMOOTHING_ALPHA,
            smoothing_beta: defaults::DEFAULT_SMOOTHING_BETA,
            lower_percentile: defaults::DEFAULT_LOWER_PERCENTILE,
            upper_percentile: defaults::DEFAULT_UPPER_PERCENTILE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    pub bands: RiskBands,
    pub learning_rate: f64,
    pub iterations: usize,
    /// Half-width of the interval in logit space.
    pub interval_margin: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            bands: RiskBands::default(),
            learning_rate: defaults::DEFAULT_RISK_LEARNING_RATE,
            iterations: defaults::DEFAULT_RISK_ITERATIONS,
            interval_margin: defaults::DEFAULT_RISK_INTERVAL_MARGIN,
        }
    }
}

/// Score boundaries for risk categories.
///
/// `score <= low_max` is low, `score <= medium_max` is medium, anything above is high.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskBands {
    pub low_max: f64,
    pub medium_max: f64,
}

impl RiskBands {
    pub fn categorize(&self, score: f64) -> RiskCategory {
        if score <= self.low_max {
            RiskCategory::Low
        } else if score <= self.medium_max {
            RiskCategory::Medium
        } else {
            RiskCategory::High
        }
    }
}

impl Default for RiskBands {
    fn default() -> Self {
        Self {
            low_max: defaults::DEFAULT_RISK_LOW_MAX,
            medium_max: defaults::DEFAULT_RISK_MEDIUM_MAX,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    /// Workloads with at most this many tasks are solved exactly.
    pub exact_search_limit: usize,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            exact_search_limit: defaults::DEFAULT_EXACT_SEARCH_LIMIT,
        }
    }
}
