use serde::{Deserialize, Serialize};

use super::defaults;

/// Indicator engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    /// Number of trailing points used for rolling trend slopes.
    pub trend_window: usize,
    /// Maximum cached indicator sets.
    pub cache_capacity: u64,
    pub health: HealthThresholds,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            trend_window: defaults::DEFAULT_TREND_WINDOW,
            cache_capacity: defaults::DEFAULT_INDICATOR_CACHE_CAPACITY,
            health: HealthThresholds::default(),
        }
    }
}

/// Index thresholds and score cut-offs for the traffic-light health status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthThresholds {
    pub schedule_yellow: f64,
    pub schedule_red: f64,
    pub cost_yellow: f64,
    pub cost_red: f64,
    pub green_min_score: f64,
    pub yellow_min_score: f64,
}

impl Default for HealthThresholds {
    fn default() -> Self {
        Self {
            schedule_yellow: defaults::DEFAULT_SCHEDULE_YELLOW,
            schedule_red: defaults::DEFAULT_SCHEDULE_RED,
            cost_yellow: defaults::DEFAULT_COST_YELLOW,
            cost_red: defaults::DEFAULT_COST_RED,
            green_min_score: defaults::DEFAULT_GREEN_MIN_SCORE,
            yellow_min_score: defaults::DEFAULT_YELLOW_MIN_SCORE,
        }
    }
}

/// Feature builder configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Maximum cached feature vectors.
    pub cache_capacity: u64,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            cache_capacity: defaults::DEFAULT_FEATURE_CACHE_CAPACITY,
        }
    }
}
