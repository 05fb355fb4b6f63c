use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use test_fixtures::Scenario;
use vantage_core::config::VantageConfig;
use vantage_core::errors::{VantageError, VantageResult};
use vantage_core::models::{
    DeliveryOutcome, HealthStatus, ModelKind, ProjectSnapshot, Resolution, Severity, Workload,
};
use vantage_core::traits::{IDashboardReader, IProjectRecordStore};
use vantage_pipeline::{
    CancellationFlag, InMemoryRecordStore, Pipeline, RecordingDispatcher, TracingDispatcher,
};

fn make_store(scenario: &Scenario) -> Arc<InMemoryRecordStore> {
    let store = Arc::new(InMemoryRecordStore::new());
    for project in &scenario.projects {
        store.extend(project.snapshots.iter().cloned());
        if let Some(workload) = &project.workload {
            store.set_workload(project.project_id.clone(), workload.clone());
        }
    }
    store
}

fn make_pipeline(scenario: &Scenario, store: Arc<dyn IProjectRecordStore>) -> Pipeline {
    Pipeline::from_toml_rules(&VantageConfig::default(), store, &scenario.rules_toml()).unwrap()
}

// ── End to end ───────────────────────────────────────────────────────────

#[test]
fn p1_end_to_end() {
    let scenario = Scenario::load("p1_overrun");
    let dispatcher = Arc::new(RecordingDispatcher::new());
    let pipeline = make_pipeline(&scenario, make_store(&scenario)).with_dispatcher(dispatcher.clone());

    let report = pipeline
        .run_cycle("P1", scenario.as_of, &CancellationFlag::new())
        .unwrap();

    let dashboard = pipeline.dashboard();
    let indicators = dashboard.latest_indicators("P1").unwrap();
    let expected = &scenario.expected;
    assert_eq!(
        indicators.schedule_performance_index.value(),
        expected["spi"].as_f64()
    );
    assert_eq!(
        indicators.cost_performance_index.value(),
        expected["cpi"].as_f64()
    );
    assert_eq!(
        indicators.budget_variance.value(),
        expected["budget_variance"].as_f64()
    );

    assert_eq!(report.raised.len(), 1);
    assert_eq!(report.raised[0].severity, Severity::Medium);
    assert_eq!(report.raised[0].rule_id, "cpi-below-tolerance");
    assert_eq!(dispatcher.sent().len(), 1);
    assert_eq!(report.failed_deliveries(), 0);

    assert_eq!(dashboard.active_alerts("P1").len(), 1);
    assert_eq!(
        dashboard.latest_health("P1").map(|h| h.status),
        Some(HealthStatus::Red)
    );

    // One snapshot is not enough history for the timeline model.
    let bundle = dashboard.latest_prediction("P1").unwrap();
    assert_eq!(bundle.outcomes.len(), 4);
    assert!(bundle.timeline().and_then(|o| o.failure()).is_some());
    assert!(report.model_failures >= 1);
}

#[test]
fn weekly_cooldown_over_daily_cycles() {
    let scenario = Scenario::load("p1_daily");
    let pipeline = make_pipeline(&scenario, make_store(&scenario));
    let cancel = CancellationFlag::new();
    let snapshots = &scenario.project("P1").unwrap().snapshots;

    let mut alert_days = Vec::new();
    for (day, snapshot) in snapshots.iter().enumerate() {
        let report = pipeline.run_cycle("P1", snapshot.timestamp, &cancel).unwrap();
        if !report.raised.is_empty() {
            alert_days.push(day as u64);
        }
    }
    let expected: Vec<u64> = serde_json::from_value(scenario.expected["alert_days"].clone()).unwrap();
    assert_eq!(alert_days, expected);

    let history = pipeline.alert_engine().history("P1");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].resolution, Some(Resolution::Superseded));
    assert_eq!(pipeline.metrics().snapshot().cycles_completed, 10);
}

#[test]
fn portfolio_run_many() {
    let scenario = Scenario::load("portfolio");
    let pipeline = make_pipeline(&scenario, make_store(&scenario))
        .with_dispatcher(Arc::new(TracingDispatcher));
    let ids: Vec<String> = scenario.projects.iter().map(|p| p.project_id.clone()).collect();

    let results = pipeline.run_many(&ids, scenario.as_of, &CancellationFlag::new());
    assert_eq!(results.iter().map(|(id, _)| id.clone()).collect::<Vec<_>>(), ids);

    for (id, result) in &results {
        let report = result.as_ref().unwrap();
        let raised: Vec<&str> = report.raised.iter().map(|a| a.rule_id.as_str()).collect();
        let expected: Vec<String> =
            serde_json::from_value(scenario.expected["raised"][id].clone()).unwrap();
        assert_eq!(raised, expected, "{id}");
    }

    let dashboard = pipeline.dashboard();
    assert_eq!(dashboard.projects(), vec!["ALPHA", "BRAVO", "CHARLIE"]);
    let summary = dashboard.portfolio_summary();
    assert_eq!(
        summary.total_projects as u64,
        scenario.expected["total_projects"].as_u64().unwrap()
    );
    assert!(summary.average_spi.is_some());
    assert!(summary.average_risk_score.is_some());

    let charlie = dashboard.latest_prediction("CHARLIE").unwrap();
    let resource = charlie.prediction(&ModelKind::RESOURCE).unwrap();
    assert!(resource.point_estimate < 1.0);
    assert_eq!(dashboard.data_quality("ALPHA").map(|q| q.score_pct), Some(100.0));
}

// ── Failure handling ─────────────────────────────────────────────────────

#[test]
fn dispatcher_failure_is_recorded_not_fatal() {
    let scenario = Scenario::load("p1_overrun");
    let pipeline = make_pipeline(&scenario, make_store(&scenario))
        .with_dispatcher(Arc::new(RecordingDispatcher::failing()));

    let report = pipeline
        .run_cycle("P1", scenario.as_of, &CancellationFlag::new())
        .unwrap();
    assert_eq!(report.raised.len(), 1);
    assert_eq!(report.deliveries.len(), 1);
    assert!(matches!(
        report.deliveries[0].outcome,
        DeliveryOutcome::Failed { .. }
    ));

    let view = pipeline.dashboard().view("P1").unwrap();
    assert_eq!(view.deliveries, report.deliveries);
    assert_eq!(view.active_alerts.len(), 1);
    assert_eq!(pipeline.metrics().snapshot().deliveries_failed, 1);
}

#[test]
fn unknown_project_fails_without_publishing() {
    let scenario = Scenario::load("p1_overrun");
    let pipeline = make_pipeline(&scenario, make_store(&scenario));
    let err = pipeline
        .run_cycle("NOPE", scenario.as_of, &CancellationFlag::new())
        .unwrap_err();
    assert!(matches!(err, VantageError::StoreError(_)));
    assert!(pipeline.dashboard().view("NOPE").is_none());
    assert_eq!(pipeline.metrics().snapshot().cycles_failed, 1);
}

#[test]
fn empty_window_is_data_insufficiency() {
    let scenario = Scenario::load("p1_overrun");
    let pipeline = make_pipeline(&scenario, make_store(&scenario));
    let err = pipeline
        .run_cycle("P1", scenario.as_of - Duration::days(1), &CancellationFlag::new())
        .unwrap_err();
    assert!(matches!(err, VantageError::DataInsufficiency { .. }));
}

#[test]
fn invalid_rules_reject_the_pipeline() {
    let store = Arc::new(InMemoryRecordStore::new());
    let toml = r#"
[[rules]]
rule_id = "x"
applies_to = "velocity"
comparator = "<"
threshold = 1.0
severity = "low"
cooldown_window_secs = 0
"#;
    let result = Pipeline::from_toml_rules(&VantageConfig::default(), store, toml);
    assert!(matches!(
        result,
        Err(VantageError::InvalidRuleConfiguration { .. })
    ));
}

// ── Cancellation and publication ─────────────────────────────────────────

/// Store that raises the cancellation flag while serving a read.
struct CancellingStore {
    inner: InMemoryRecordStore,
    flag: CancellationFlag,
}

impl IProjectRecordStore for CancellingStore {
    fn fetch_history(
        &self,
        project_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        timeout: StdDuration,
    ) -> VantageResult<Vec<ProjectSnapshot>> {
        self.flag.cancel();
        self.inner.fetch_history(project_id, from, to, timeout)
    }

    fn fetch_workload(
        &self,
        project_id: &str,
        as_of: DateTime<Utc>,
        timeout: StdDuration,
    ) -> VantageResult<Option<Workload>> {
        self.inner.fetch_workload(project_id, as_of, timeout)
    }
}

#[test]
fn cancellation_mid_cycle_publishes_nothing() {
    let scenario = Scenario::load("p1_overrun");
    let flag = CancellationFlag::new();
    let inner = InMemoryRecordStore::new();
    inner.extend(scenario.projects[0].snapshots.iter().cloned());
    let store = Arc::new(CancellingStore {
        inner,
        flag: flag.clone(),
    });
    let pipeline = make_pipeline(&scenario, store);

    let err = pipeline.run_cycle("P1", scenario.as_of, &flag).unwrap_err();
    assert!(matches!(
        err,
        VantageError::Cancelled { ref step, .. } if step == "indicators"
    ));
    assert!(pipeline.dashboard().view("P1").is_none());
    assert!(pipeline.alert_engine().history("P1").is_empty());
    assert_eq!(pipeline.metrics().snapshot().cycles_cancelled, 1);
}

#[test]
fn pre_cancelled_flag_stops_before_fetch() {
    let scenario = Scenario::load("p1_overrun");
    let pipeline = make_pipeline(&scenario, make_store(&scenario));
    let flag = CancellationFlag::new();
    flag.cancel();
    let err = pipeline.run_cycle("P1", scenario.as_of, &flag).unwrap_err();
    assert!(matches!(err, VantageError::Cancelled { ref step, .. } if step == "fetch"));
}

#[test]
fn republishing_swaps_whole_views() {
    let scenario = Scenario::load("p1_daily");
    let pipeline = make_pipeline(&scenario, make_store(&scenario));
    let cancel = CancellationFlag::new();
    let snapshots = &scenario.project("P1").unwrap().snapshots;

    let first = pipeline.run_cycle("P1", snapshots[0].timestamp, &cancel).unwrap();
    let held = pipeline.dashboard().view("P1").unwrap();
    let second = pipeline.run_cycle("P1", snapshots[1].timestamp, &cancel).unwrap();
    let current = pipeline.dashboard().view("P1").unwrap();

    assert_ne!(first.cycle_id, second.cycle_id);
    assert_eq!(held.cycle_id, first.cycle_id);
    assert_eq!(held.series.len(), 1);
    assert_eq!(current.cycle_id, second.cycle_id);
    assert_eq!(current.series.len(), 2);
    assert_eq!(current.indicators.timestamp, snapshots[1].timestamp);
}

#[test]
fn revised_snapshot_is_picked_up_next_cycle() {
    let scenario = Scenario::load("p1_overrun");
    let store = make_store(&scenario);
    let pipeline = make_pipeline(&scenario, store.clone());
    let cancel = CancellationFlag::new();

    let first = pipeline.run_cycle("P1", scenario.as_of, &cancel).unwrap();
    assert_eq!(first.raised.len(), 1);

    let mut revised = scenario.projects[0].snapshots[0].clone();
    revised.actual_cost = 40_000.0;
    store.insert(revised);
    assert_eq!(store.snapshot_count("P1"), 1);

    let second = pipeline
        .run_cycle("P1", scenario.as_of + Duration::hours(1), &cancel)
        .unwrap();
    assert_eq!(second.resolved, vec![first.raised[0].alert_id.clone()]);
    let indicators = pipeline.dashboard().latest_indicators("P1").unwrap();
    assert_eq!(indicators.cost_performance_index.value(), Some(1.0));
    assert!(pipeline.dashboard().active_alerts("P1").is_empty());
}
