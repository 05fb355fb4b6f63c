use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Evaluation cycle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// How far back from `as_of` history is fetched.
    pub history_lookback_days: u32,
    /// Timeout handed to the record store.
    pub fetch_timeout_ms: u64,
    /// Timeout handed to the notification dispatcher.
    pub dispatch_timeout_ms: u64,
}

impl PipelineConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn dispatch_timeout(&self) -> Duration {
        Duration::from_millis(self.dispatch_timeout_ms)
    }

    pub fn lookback(&self) -> chrono::Duration {
        chrono::Duration::days(i64::from(self.history_lookback_days))
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            history_lookback_days: defaults::DEFAULT_HISTORY_LOOKBACK_DAYS,
            fetch_timeout_ms: defaults::DEFAULT_FETCH_TIMEOUT_MS,
            dispatch_timeout_ms: defaults::DEFAULT_DISPATCH_TIMEOUT_MS,
        }
    }
}

/// Logging and tracing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    pub log_level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
        }
    }
}
