/// Vantage system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Seconds in one day, used for per-day slopes and rates.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Tolerance for equality comparisons between indicator values and thresholds.
pub const COMPARISON_EPSILON: f64 = 1e-9;

/// Upper bound of the risk score scale.
pub const MAX_RISK_SCORE: f64 = 100.0;

/// Maximum number of rules accepted in one configuration set.
pub const MAX_RULES_PER_SET: usize = 1000;

/// Cooldown windows longer than this are capped (ten years).
pub const MAX_COOLDOWN_SECS: u64 = 10 * 365 * 86_400;
