//! [`Pipeline`]: the per-project evaluation cycle.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;
use vantage_alerts::{AlertEngine, RuleSet};
use vantage_core::config::{PipelineConfig, VantageConfig};
use vantage_core::errors::{VantageError, VantageResult};
use vantage_core::models::{
    Alert, DeliveryOutcome, DeliveryRecord, HealthAssessment, ModelKind, ProjectSnapshot,
};
use vantage_core::traits::{INotificationDispatcher, IProjectRecordStore};
use vantage_indicators::{assess_quality, HealthAssessor, IndicatorEngine};
use vantage_models::ModelRegistry;
use vantage_observability::tracing_setup::events;
use vantage_observability::{
    alerts_span, cycle_span, dispatch_span, indicators_span, prediction_span, CycleOutcome,
    PipelineMetrics,
};
use vantage_prediction::PredictionOrchestrator;

use crate::cancellation::CancellationFlag;
use crate::dashboard::{Dashboard, ProjectView};

/// What one completed cycle did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleReport {
    pub cycle_id: String,
    pub project_id: String,
    pub as_of: DateTime<Utc>,
    pub raised: Vec<Alert>,
    pub resolved: Vec<String>,
    pub deliveries: Vec<DeliveryRecord>,
    pub model_failures: usize,
    pub health: HealthAssessment,
}

impl CycleReport {
    pub fn failed_deliveries(&self) -> usize {
        self.deliveries
            .iter()
            .filter(|d| matches!(d.outcome, DeliveryOutcome::Failed { .. }))
            .count()
    }
}

/// Wires store, indicators, models, alerts and dispatchers into one cycle.
pub struct Pipeline {
    store: Arc<dyn IProjectRecordStore>,
    indicators: Arc<IndicatorEngine>,
    orchestrator: PredictionOrchestrator,
    alerts: AlertEngine,
    health: HealthAssessor,
    dispatchers: Vec<Arc<dyn INotificationDispatcher>>,
    dashboard: Arc<Dashboard>,
    metrics: Arc<PipelineMetrics>,
    config: PipelineConfig,
}

impl Pipeline {
    /// `rules` must already be validated against `registry`'s kinds.
    pub fn new(
        config: &VantageConfig,
        store: Arc<dyn IProjectRecordStore>,
        registry: ModelRegistry,
        rules: RuleSet,
    ) -> Self {
        let indicators = Arc::new(IndicatorEngine::new(&config.indicators));
        let orchestrator = PredictionOrchestrator::new(
            Arc::clone(&store),
            registry,
            Arc::clone(&indicators),
            &config.features,
            config.pipeline.clone(),
        );
        Self {
            store,
            indicators,
            orchestrator,
            alerts: AlertEngine::new(rules, config.alerts.clone()),
            health: HealthAssessor::new(config.indicators.health.clone()),
            dispatchers: Vec::new(),
            dashboard: Arc::new(Dashboard::new()),
            metrics: Arc::new(PipelineMetrics::new()),
            config: config.pipeline.clone(),
        }
    }

    /// Built-in models plus rules parsed from a TOML document.
    pub fn from_toml_rules(
        config: &VantageConfig,
        store: Arc<dyn IProjectRecordStore>,
        rules_toml: &str,
    ) -> VantageResult<Self> {
        let registry = ModelRegistry::with_defaults(&config.models);
        let rules = RuleSet::from_toml(rules_toml, &registry.kinds())?;
        Ok(Self::new(config, store, registry, rules))
    }

    pub fn with_dispatcher(mut self, dispatcher: Arc<dyn INotificationDispatcher>) -> Self {
        self.dispatchers.push(dispatcher);
        self
    }

    pub fn orchestrator(&self) -> &PredictionOrchestrator {
        &self.orchestrator
    }

    pub fn alert_engine(&self) -> &AlertEngine {
        &self.alerts
    }

    pub fn dashboard(&self) -> Arc<Dashboard> {
        Arc::clone(&self.dashboard)
    }

    pub fn metrics(&self) -> Arc<PipelineMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Run one cycle for `project_id` at `as_of` and publish it.
    ///
    /// `cancel` is checked before every step up to alert evaluation. Once alert
    /// state has been committed the cycle runs to publication. A cancelled or
    /// failed cycle publishes nothing.
    pub fn run_cycle(
        &self,
        project_id: &str,
        as_of: DateTime<Utc>,
        cancel: &CancellationFlag,
    ) -> VantageResult<CycleReport> {
        let cycle_id = Uuid::new_v4().to_string();
        let span = cycle_span!(project_id, cycle_id);
        let _guard = span.enter();

        self.metrics.record_cycle_started();
        let started = Instant::now();
        let result = self.cycle(&cycle_id, project_id, as_of, cancel);
        let elapsed = started.elapsed();

        match &result {
            Ok(report) => {
                self.metrics
                    .record_cycle_finished(CycleOutcome::Completed, elapsed);
                self.metrics
                    .record_alerts(report.raised.len(), report.resolved.len());
                self.metrics.record_model_failures(report.model_failures);
                events::cycle_completed(
                    project_id,
                    &cycle_id,
                    report.raised.len(),
                    report.resolved.len(),
                    report.model_failures,
                    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
                );
            }
            Err(VantageError::Cancelled { step, .. }) => {
                self.metrics
                    .record_cycle_finished(CycleOutcome::Cancelled, elapsed);
                events::cycle_cancelled(project_id, &cycle_id, step);
            }
            Err(err) => {
                self.metrics
                    .record_cycle_finished(CycleOutcome::Failed, elapsed);
                events::cycle_failed(project_id, &cycle_id, &err.to_string());
            }
        }
        result
    }

    /// [`Self::run_cycle`] for many projects in parallel. Results keep input order.
    pub fn run_many(
        &self,
        project_ids: &[String],
        as_of: DateTime<Utc>,
        cancel: &CancellationFlag,
    ) -> Vec<(String, VantageResult<CycleReport>)> {
        project_ids
            .par_iter()
            .map(|id| (id.clone(), self.run_cycle(id, as_of, cancel)))
            .collect()
    }

    fn cycle(
        &self,
        cycle_id: &str,
        project_id: &str,
        as_of: DateTime<Utc>,
        cancel: &CancellationFlag,
    ) -> VantageResult<CycleReport> {
        cancel.checkpoint(project_id, "fetch")?;
        let snapshots = self.fetch(project_id, as_of)?;

        cancel.checkpoint(project_id, "indicators")?;
        let series = {
            let span = indicators_span!(project_id, snapshots.len());
            let _guard = span.enter();
            self.indicators.compute_history(project_id, &snapshots)?
        };
        let latest = series.latest().cloned().ok_or_else(|| {
            VantageError::insufficient(
                project_id,
                format!("no snapshots within {} days of {as_of}", self.config.history_lookback_days),
            )
        })?;
        let quality = assess_quality(&snapshots);

        cancel.checkpoint(project_id, "prediction")?;
        let bundle = {
            let span = prediction_span!(project_id, self.orchestrator.registry().len());
            let _guard = span.enter();
            let workload = self.orchestrator.fetch_workload(project_id, as_of);
            self.orchestrator
                .evaluate_series(&series, as_of, workload.as_ref())
        };
        let model_failures = bundle.failures().count();

        cancel.checkpoint(project_id, "health")?;
        let risk_score = bundle
            .prediction(&ModelKind::RISK)
            .map(|p| p.point_estimate);
        let health = self.health.assess(&latest, risk_score, as_of);

        cancel.checkpoint(project_id, "alerts")?;
        let evaluation = {
            let span = alerts_span!(project_id, self.alerts.rules().len());
            let _guard = span.enter();
            self.alerts.evaluate(project_id, &latest, Some(&bundle), as_of)
        };

        let deliveries = self.dispatch(project_id, &evaluation.raised);

        self.dashboard.publish(ProjectView {
            project_id: project_id.to_string(),
            cycle_id: cycle_id.to_string(),
            as_of,
            series,
            indicators: latest,
            prediction: bundle,
            health: health.clone(),
            quality,
            active_alerts: self.alerts.active_alerts(project_id),
            deliveries: deliveries.clone(),
        });

        Ok(CycleReport {
            cycle_id: cycle_id.to_string(),
            project_id: project_id.to_string(),
            as_of,
            raised: evaluation.raised,
            resolved: evaluation.resolved,
            deliveries,
            model_failures,
            health,
        })
    }

    fn fetch(&self, project_id: &str, as_of: DateTime<Utc>) -> VantageResult<Vec<ProjectSnapshot>> {
        let from = as_of - self.config.lookback();
        let snapshots =
            self.store
                .fetch_history(project_id, from, as_of, self.config.fetch_timeout())?;
        debug!(project_id, snapshots = snapshots.len(), "fetched history");
        Ok(snapshots)
    }

    /// Send every raised alert through every dispatcher once. Failures are recorded,
    /// never retried.
    fn dispatch(&self, project_id: &str, alerts: &[Alert]) -> Vec<DeliveryRecord> {
        let span = dispatch_span!(project_id, alerts.len());
        let _guard = span.enter();
        let timeout = self.config.dispatch_timeout();

        let mut records = Vec::with_capacity(alerts.len() * self.dispatchers.len());
        for alert in alerts {
            for dispatcher in &self.dispatchers {
                let outcome = match dispatcher.send(alert, timeout) {
                    Ok(()) => DeliveryOutcome::Delivered,
                    Err(err) => {
                        let reason = err.to_string();
                        events::delivery_failed(&alert.alert_id, &reason);
                        DeliveryOutcome::Failed { reason }
                    }
                };
                self.metrics
                    .record_delivery(outcome == DeliveryOutcome::Delivered);
                records.push(DeliveryRecord {
                    alert_id: alert.alert_id.clone(),
                    attempted_at: Utc::now(),
                    outcome,
                });
            }
        }
        records
    }
}
