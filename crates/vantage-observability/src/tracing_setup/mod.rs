//! Tracing setup: subscriber installation, span definitions and event helpers.

pub mod events;
pub mod spans;

use tracing_subscriber::EnvFilter;
use vantage_core::config::ObservabilityConfig;
use vantage_core::errors::{VantageError, VantageResult};

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `config.log_level` when set. Returns `Ok(false)` when a
/// global subscriber is already installed; an unparsable `log_level` is a
/// [`VantageError::ConfigError`].
pub fn init_tracing(config: &ObservabilityConfig) -> VantageResult<bool> {
    let configured = EnvFilter::try_new(&config.log_level).map_err(|e| {
        VantageError::ConfigError(format!(
            "observability.log_level '{}': {e}",
            config.log_level
        ))
    })?;
    let filter = EnvFilter::try_from_default_env().unwrap_or(configured);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = if config.json {
        builder
            .json()
            .with_thread_ids(true)
            .with_line_number(true)
            .try_init()
            .is_ok()
    } else {
        builder.try_init().is_ok()
    };
    Ok(installed)
}
