use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use rayon::prelude::*;
use vantage_core::errors::VantageError;
use vantage_core::models::{IndicatorField, IndicatorSet, Measure, ProjectSnapshot, UndefinedReason};
use vantage_features::{Extractor, FeatureBuilder, FeatureSchema};
use vantage_indicators::formula;

fn day(n: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap() + Duration::days(n)
}

/// One set per entry: (day, earned value, completed tasks). PV = AC = 100.
fn make_history(points: &[(i64, f64, u32)]) -> Vec<IndicatorSet> {
    points
        .iter()
        .map(|&(n, ev, done)| {
            formula::compute(&ProjectSnapshot {
                project_id: "P1".into(),
                timestamp: day(n),
                planned_value: 100.0,
                earned_value: ev,
                actual_cost: 100.0,
                planned_hours: 10.0,
                actual_hours: 10.0,
                open_tasks: 10 - done,
                completed_tasks: done,
                team_size: 2,
                budget_at_completion: 1_000.0,
            })
        })
        .collect()
}

fn make_schema() -> FeatureSchema {
    FeatureSchema::new("test", 1)
        .with(Extractor::Latest(IndicatorField::SchedulePerformanceIndex))
        .with(Extractor::Trend {
            field: IndicatorField::SchedulePerformanceIndex,
            window: 3,
        })
        .with(Extractor::Volatility {
            field: IndicatorField::CostPerformanceIndex,
            window: 2,
        })
        .with(Extractor::Latest(IndicatorField::StaffingRatio))
}

// ── Shape and naming ─────────────────────────────────────────────────────

#[test]
fn vector_follows_declared_order_and_names() {
    let history = make_history(&[(0, 80.0, 1), (1, 90.0, 2), (2, 100.0, 3)]);
    let vector = FeatureBuilder::default()
        .build("P1", &history, day(2), &make_schema())
        .unwrap();
    let names: Vec<_> = vector.names().collect();
    assert_eq!(
        names,
        vec!["spi", "spi_trend_3", "cpi_volatility_2", "staffing_ratio"]
    );
    assert_eq!(vector.schema_version, 1);
    assert!(vector.is_complete());
    assert!((vector.value("spi_trend_3").unwrap() - 0.1).abs() < 1e-9);
    // CPI 0.9 and 1.0 over the last two points.
    assert!((vector.value("cpi_volatility_2").unwrap() - 0.005f64.sqrt()).abs() < 1e-9);
}

#[test]
fn short_history_gets_markers_not_zeros() {
    let history = make_history(&[(0, 80.0, 1), (1, 90.0, 2)]);
    let vector = FeatureBuilder::default()
        .build("P1", &history, day(1), &make_schema())
        .unwrap();
    assert_eq!(vector.len(), 4);
    assert_eq!(
        vector.get("spi_trend_3"),
        Some(&Measure::insufficient_history(3, 2))
    );
    assert_eq!(vector.missing(), vec!["spi_trend_3"]);
    assert!(matches!(
        vector.value("spi_trend_3"),
        Err(VantageError::DataInsufficiency { .. })
    ));
    assert!(vector.dense().is_err());
}

#[test]
fn history_after_as_of_is_ignored() {
    let history = make_history(&[(0, 80.0, 1), (1, 90.0, 2), (2, 100.0, 3)]);
    let vector = FeatureBuilder::default()
        .build("P1", &history, day(1), &make_schema())
        .unwrap();
    assert_eq!(vector.value("spi").unwrap(), 0.9);
    assert!(!vector.get("spi_trend_3").unwrap().is_defined());
}

#[test]
fn undefined_inputs_propagate_their_reason() {
    let mut history = make_history(&[(0, 80.0, 1)]);
    history[0].schedule_performance_index = Measure::undefined(UndefinedReason::DivisionGuard {
        denominator: "planned_value".into(),
    });
    let vector = FeatureBuilder::default()
        .build("P1", &history, day(0), &make_schema())
        .unwrap();
    assert!(matches!(
        vector.get("spi").unwrap().reason(),
        Some(UndefinedReason::DivisionGuard { .. })
    ));
}

// ── Extractors ───────────────────────────────────────────────────────────

#[test]
fn rate_uses_elapsed_days() {
    // Completion goes 10% → 40% over 6 days.
    let history = make_history(&[(0, 80.0, 1), (2, 85.0, 2), (6, 90.0, 4)]);
    let rate = Extractor::Rate {
        field: IndicatorField::CompletionPercentage,
        window: 3,
    };
    assert_eq!(rate.default_name().as_deref(), Some("completion_rate_3"));
    assert!((rate.extract(&history).value().unwrap() - 5.0).abs() < 1e-9);
}

#[test]
fn change_mean_and_smoothed() {
    let history = make_history(&[(0, 70.0, 1), (1, 80.0, 1), (2, 90.0, 1), (3, 100.0, 1)]);
    let field = IndicatorField::SchedulePerformanceIndex;

    let change = Extractor::Change { field, window: 3 }.extract(&history);
    assert!((change.value().unwrap() - 0.2).abs() < 1e-12);

    let mean = Extractor::Mean { field, window: 4 }.extract(&history);
    assert!((mean.value().unwrap() - 0.85).abs() < 1e-12);

    let smoothed = Extractor::Smoothed {
        field,
        window: 4,
        alpha: 0.5,
        beta: 0.3,
    }
    .extract(&history);
    assert!((smoothed.value().unwrap() - 1.1).abs() < 1e-9);
}

#[test]
fn custom_extractor_sees_only_its_window() {
    let custom = Extractor::custom(2, |sets| Measure::from_f64(sets.len() as f64));
    let history = make_history(&[(0, 70.0, 1), (1, 80.0, 1), (2, 90.0, 1)]);
    assert_eq!(custom.extract(&history).value(), Some(2.0));
    assert_eq!(custom.extract(&history[..1]), Measure::insufficient_history(2, 1));
}

// ── Validation ───────────────────────────────────────────────────────────

#[test]
fn foreign_history_is_rejected() {
    let mut history = make_history(&[(0, 80.0, 1)]);
    history[0].project_id = "P2".into();
    let err = FeatureBuilder::default()
        .build("P1", &history, day(0), &make_schema())
        .unwrap_err();
    assert!(matches!(err, VantageError::ProjectMismatch { .. }));
}

#[test]
fn duplicate_feature_names_fail_validation() {
    let schema = FeatureSchema::new("dup", 1)
        .with(Extractor::Latest(IndicatorField::CostPerformanceIndex))
        .with(Extractor::Latest(IndicatorField::CostPerformanceIndex));
    assert!(matches!(schema.validate(), Err(VantageError::ConfigError(_))));
    assert!(make_schema().validate().is_ok());
    assert_eq!(make_schema().max_window(), 3);
}

// ── Cache and concurrency ────────────────────────────────────────────────

#[test]
fn concurrent_builds_are_deterministic_and_cached_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let schema = make_schema().with_named(
        "counted",
        Extractor::custom(1, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Measure::from_f64(1.0)
        }),
    );
    let history = make_history(&[(0, 80.0, 1), (1, 90.0, 2), (2, 100.0, 3)]);
    let builder = FeatureBuilder::default();

    let vectors: Vec<_> = (0..32)
        .into_par_iter()
        .map(|_| builder.build("P1", &history, day(2), &schema).unwrap())
        .collect();

    assert!(vectors.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn schema_version_and_revised_history_miss_the_cache() {
    let builder = FeatureBuilder::default();
    let history = make_history(&[(0, 80.0, 1), (1, 90.0, 2)]);
    builder.build("P1", &history, day(1), &make_schema()).unwrap();

    let mut v2 = make_schema();
    v2.version = 2;
    builder.build("P1", &history, day(1), &v2).unwrap();

    let revised = make_history(&[(0, 80.0, 1), (1, 95.0, 2)]);
    let vector = builder.build("P1", &revised, day(1), &make_schema()).unwrap();

    assert_eq!(vector.value("spi").unwrap(), 0.95);
    assert_eq!(builder.cache().len(), 3);
}
