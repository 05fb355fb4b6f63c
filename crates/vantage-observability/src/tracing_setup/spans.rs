//! Span definitions per pipeline step: cycle, indicators, features, prediction,
//! alerts, dispatch.

/// Span for one whole evaluation cycle.
#[macro_export]
macro_rules! cycle_span {
    ($project_id:expr, $cycle_id:expr) => {
        tracing::info_span!("vantage.cycle", project_id = %$project_id, cycle_id = %$cycle_id)
    };
}

/// Span for indicator computation over a fetched history.
#[macro_export]
macro_rules! indicators_span {
    ($project_id:expr, $snapshots:expr) => {
        tracing::info_span!("vantage.indicators", project_id = %$project_id, snapshots = $snapshots)
    };
}

#[macro_export]
macro_rules! features_span {
    ($project_id:expr, $schema:expr) => {
        tracing::debug_span!("vantage.features", project_id = %$project_id, schema = %$schema)
    };
}

/// Span for running every registered model.
#[macro_export]
macro_rules! prediction_span {
    ($project_id:expr, $models:expr) => {
        tracing::info_span!("vantage.prediction", project_id = %$project_id, models = $models)
    };
}

#[macro_export]
macro_rules! alerts_span {
    ($project_id:expr, $rules:expr) => {
        tracing::info_span!("vantage.alerts", project_id = %$project_id, rules = $rules)
    };
}

#[macro_export]
macro_rules! dispatch_span {
    ($project_id:expr, $alerts:expr) => {
        tracing::info_span!("vantage.dispatch", project_id = %$project_id, alerts = $alerts)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const CYCLE: &str = "vantage.cycle";
    pub const INDICATORS: &str = "vantage.indicators";
    pub const FEATURES: &str = "vantage.features";
    pub const PREDICTION: &str = "vantage.prediction";
    pub const ALERTS: &str = "vantage.alerts";
    pub const DISPATCH: &str = "vantage.dispatch";
}
