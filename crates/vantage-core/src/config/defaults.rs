//! Default values for every configuration section.

// Indicators
pub const DEFAULT_TREND_WINDOW: usize = 3;
pub const DEFAULT_INDICATOR_CACHE_CAPACITY: u64 = 10_000;
pub const DEFAULT_SCHEDULE_YELLOW: f64 = 0.95;
pub const DEFAULT_SCHEDULE_RED: f64 = 0.85;
pub const DEFAULT_COST_YELLOW: f64 = 0.90;
pub const DEFAULT_COST_RED: f64 = 0.75;
pub const DEFAULT_GREEN_MIN_SCORE: f64 = 75.0;
pub const DEFAULT_YELLOW_MIN_SCORE: f64 = 50.0;

// Features
pub const DEFAULT_FEATURE_CACHE_CAPACITY: u64 = 10_000;

// Timeline model
pub const DEFAULT_INTERVAL_Z: f64 = 1.96;
pub const DEFAULT_RIDGE_LAMBDA: f64 = 1e-6;
pub const DEFAULT_PRIOR_RESIDUAL_STD_DAYS: f64 = 14.0;
pub const DEFAULT_PRIOR_CONFIDENCE: f64 = 0.5;

// Budget model
pub const DEFAULT_BOOTSTRAP_SAMPLES: usize = 500;
pub const DEFAULT_TREND_WEIGHT: f64 = 0.5;
pub const DEFAULT_SMOOTHING_ALPHA: f64 = 0.5;
pub const DEFAULT_SMOOTHING_BETA: f64 = 0.3;
pub const DEFAULT_LOWER_PERCENTILE: f64 = 0.05;
pub const DEFAULT_UPPER_PERCENTILE: f64 = 0.95;

// Risk model
pub const DEFAULT_RISK_LOW_MAX: f64 = 33.0;
pub const DEFAULT_RISK_MEDIUM_MAX: f64 = 66.0;
pub const DEFAULT_RISK_LEARNING_RATE: f64 = 0.1;
pub const DEFAULT_RISK_ITERATIONS: usize = 500;
pub const DEFAULT_RISK_INTERVAL_MARGIN: f64 = 0.5;

// Resource model
pub const DEFAULT_EXACT_SEARCH_LIMIT: usize = 12;

// Pipeline
pub const DEFAULT_HISTORY_LOOKBACK_DAYS: u32 = 365;
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_DISPATCH_TIMEOUT_MS: u64 = 5_000;
