use vantage_core::config::*;
use vantage_core::models::{RiskCategory, Severity};

#[test]
fn config_loads_from_empty_toml_with_all_defaults() {
    let config = VantageConfig::from_toml("").unwrap();

    // Indicator defaults
    assert_eq!(config.indicators.trend_window, 3);
    assert_eq!(config.indicators.health.schedule_yellow, 0.95);
    assert_eq!(config.indicators.health.cost_red, 0.75);

    // Model defaults
    assert_eq!(config.models.timeline.interval_z, 1.96);
    assert_eq!(config.models.budget.bootstrap_samples, 500);
    assert_eq!(config.models.risk.bands.low_max, 33.0);
    assert_eq!(config.models.risk.bands.medium_max, 66.0);
    assert_eq!(config.models.resource.exact_search_limit, 12);

    // Alert defaults
    assert_eq!(
        config.alerts.severity_order,
        vec![
            Severity::Critical,
            Severity::High,
            Severity::Medium,
            Severity::Low
        ]
    );

    // Pipeline defaults
    assert_eq!(config.pipeline.history_lookback_days, 365);
    assert_eq!(config.observability.log_level, "info");
    assert!(!config.observability.json);
}

#[test]
fn config_loads_partial_toml_with_overrides() {
    let toml = r#"
[indicators]
trend_window = 5

[models.risk.bands]
low_max = 20.0
medium_max = 50.0
"#;
    let config = VantageConfig::from_toml(toml).unwrap();
    assert_eq!(config.indicators.trend_window, 5);
    assert_eq!(config.models.risk.bands.low_max, 20.0);
    // Non-overridden fields keep defaults
    assert_eq!(config.models.risk.iterations, 500);
    assert_eq!(config.indicators.cache_capacity, 10_000);
}

#[test]
fn overridden_risk_bands_change_categories() {
    let bands = RiskBands {
        low_max: 20.0,
        medium_max: 50.0,
    };
    assert_eq!(bands.categorize(25.0), RiskCategory::Medium);
    assert_eq!(RiskBands::default().categorize(25.0), RiskCategory::Low);
    assert_eq!(RiskBands::default().categorize(66.0), RiskCategory::Medium);
    assert_eq!(RiskBands::default().categorize(67.0), RiskCategory::High);
}

#[test]
fn inverted_risk_bands_are_rejected() {
    let toml = r#"
[models.risk.bands]
low_max = 70.0
medium_max = 40.0
"#;
    let err = VantageConfig::from_toml(toml).unwrap_err();
    assert!(err.to_string().contains("low_max"));
}

#[test]
fn malformed_toml_is_a_config_error() {
    let err = VantageConfig::from_toml("[indicators\ntrend_window = ").unwrap_err();
    assert!(matches!(
        err,
        vantage_core::VantageError::ConfigError(_)
    ));
}

#[test]
fn severity_rank_follows_configured_order() {
    let config = AlertConfig {
        severity_order: vec![Severity::Low, Severity::Critical],
    };
    assert_eq!(config.rank(Severity::Low), 0);
    assert_eq!(config.rank(Severity::Critical), 1);
    assert_eq!(config.rank(Severity::Medium), 2);
}

#[test]
fn config_serde_roundtrip() {
    let config = VantageConfig::default();
    let toml_str = toml::to_string(&config).unwrap();
    let roundtripped = VantageConfig::from_toml(&toml_str).unwrap();
    assert_eq!(
        roundtripped.indicators.trend_window,
        config.indicators.trend_window
    );
    assert_eq!(
        roundtripped.models.budget.trend_weight,
        config.models.budget.trend_weight
    );
}
