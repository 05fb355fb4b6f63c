use std::collections::BTreeMap;

use chrono::{DateTime, Duration, TimeZone, Utc};
use rayon::prelude::*;
use vantage_alerts::{AlertEngine, RuleSet};
use vantage_core::config::AlertConfig;
use vantage_core::models::{
    Comparator, IndicatorSet, ModelKind, ModelOutcome, PredictionBundle, PredictionDetails,
    PredictionResult, ProjectSnapshot, Resolution, RiskCategory, Rule, Severity,
};
use vantage_indicators::formula;

fn day(n: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap() + Duration::days(n)
}

fn make_indicators(project_id: &str, n: i64, ev: f64, ac: f64) -> IndicatorSet {
    formula::compute(&ProjectSnapshot {
        project_id: project_id.into(),
        timestamp: day(n),
        planned_value: 100_000.0,
        earned_value: ev,
        actual_cost: ac,
        planned_hours: 100.0,
        actual_hours: 100.0,
        open_tasks: 5,
        completed_tasks: 5,
        team_size: 2,
        budget_at_completion: 200_000.0,
    })
}

fn make_rule(id: &str, applies_to: &str, cmp: Comparator, threshold: f64, severity: Severity, cooldown_days: u64) -> Rule {
    Rule {
        rule_id: id.into(),
        applies_to: applies_to.into(),
        comparator: cmp,
        threshold,
        severity,
        cooldown_window_secs: cooldown_days * 86_400,
        description: None,
    }
}

fn make_engine(rules: Vec<Rule>) -> AlertEngine {
    let kinds = vec![ModelKind::BUDGET, ModelKind::RISK];
    AlertEngine::new(RuleSet::new(rules, &kinds).unwrap(), AlertConfig::default())
}

fn cpi_rule() -> Rule {
    make_rule("cpi-low", "cost_performance_index", Comparator::Lt, 0.85, Severity::Medium, 7)
}

fn risk_bundle(project_id: &str, score: f64, at: DateTime<Utc>) -> PredictionBundle {
    let mut bundle = PredictionBundle::new(project_id, at);
    bundle.outcomes.insert(
        ModelKind::RISK,
        ModelOutcome::Predicted {
            result: PredictionResult {
                model_kind: ModelKind::RISK,
                project_id: project_id.into(),
                point_estimate: score,
                lower_bound: score - 5.0,
                upper_bound: score + 5.0,
                confidence: 0.8,
                generated_at: at,
                details: PredictionDetails::Risk {
                    category: RiskCategory::High,
                },
            },
        },
    );
    bundle
}

// ── Triggering ───────────────────────────────────────────────────────────

#[test]
fn p1_cpi_below_threshold_raises_one_medium_alert() {
    let engine = make_engine(vec![cpi_rule()]);
    let indicators = make_indicators("P1", 0, 40_000.0, 50_000.0);
    let evaluation = engine.evaluate("P1", &indicators, None, day(0));

    assert_eq!(evaluation.raised.len(), 1);
    let alert = &evaluation.raised[0];
    assert_eq!(alert.severity, Severity::Medium);
    assert_eq!(alert.rule_id, "cpi-low");
    assert!((alert.payload.observed_value - 0.8).abs() < 1e-12);
    assert_eq!(alert.payload.indicators, indicators);
    assert!(alert.is_active());
    assert_eq!(engine.active_alerts("P1").len(), 1);
}

#[test]
fn evaluation_is_idempotent() {
    let engine = make_engine(vec![
        cpi_rule(),
        make_rule("instant", "schedule_performance_index", Comparator::Lt, 0.5, Severity::High, 0),
    ]);
    let indicators = make_indicators("P1", 0, 40_000.0, 50_000.0);
    let first = engine.evaluate("P1", &indicators, None, day(0));
    let second = engine.evaluate("P1", &indicators, None, day(0));
    assert_eq!(first.raised.len(), 2);
    assert!(second.is_empty());
    assert_eq!(engine.ledger().len(), 2);
}

#[test]
fn seven_day_cooldown_over_ten_daily_cycles() {
    let engine = make_engine(vec![cpi_rule()]);
    let mut raised_on = Vec::new();
    for n in 0..10 {
        let indicators = make_indicators("P1", n, 40_000.0, 50_000.0);
        let evaluation = engine.evaluate("P1", &indicators, None, day(n));
        if !evaluation.raised.is_empty() {
            raised_on.push(n);
        }
    }
    assert_eq!(raised_on, vec![0, 7]);

    let history = engine.history("P1");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].resolution, Some(Resolution::Superseded));
    assert!(history[1].is_active());
    assert_ne!(history[0].alert_id, history[1].alert_id);
}

#[test]
fn simultaneous_alerts_sort_by_severity() {
    let engine = make_engine(vec![
        make_rule("a-low", "schedule_performance_index", Comparator::Lt, 1.0, Severity::Low, 1),
        make_rule("b-crit", "cost_performance_index", Comparator::Lt, 1.0, Severity::Critical, 1),
        make_rule("c-med", "budget_variance", Comparator::Gt, 0.0, Severity::Medium, 1),
    ]);
    let indicators = make_indicators("P1", 0, 40_000.0, 50_000.0);
    let evaluation = engine.evaluate("P1", &indicators, None, day(0));
    let order: Vec<_> = evaluation.raised.iter().map(|a| a.severity).collect();
    assert_eq!(order, vec![Severity::Critical, Severity::Medium, Severity::Low]);
}

#[test]
fn custom_severity_order_is_respected() {
    let rules = vec![
        make_rule("crit", "cost_performance_index", Comparator::Lt, 1.0, Severity::Critical, 1),
        make_rule("low", "schedule_performance_index", Comparator::Lt, 1.0, Severity::Low, 1),
    ];
    let engine = AlertEngine::new(
        RuleSet::new(rules, &[]).unwrap(),
        AlertConfig {
            severity_order: vec![Severity::Low, Severity::Critical],
        },
    );
    let evaluation = engine.evaluate("P1", &make_indicators("P1", 0, 40_000.0, 50_000.0), None, day(0));
    assert_eq!(evaluation.raised[0].severity, Severity::Low);
}

// ── Resolution ───────────────────────────────────────────────────────────

#[test]
fn clearing_condition_resolves_alert() {
    let engine = make_engine(vec![cpi_rule()]);
    let raised = engine.evaluate("P1", &make_indicators("P1", 0, 40_000.0, 50_000.0), None, day(0));
    let id = raised.raised[0].alert_id.clone();

    let cleared = engine.evaluate("P1", &make_indicators("P1", 1, 50_000.0, 50_000.0), None, day(1));
    assert_eq!(cleared.resolved, vec![id.clone()]);
    let alert = engine.ledger().get(&id).unwrap();
    assert!(alert.resolved);
    assert_eq!(alert.resolved_at, Some(day(1)));
    assert_eq!(alert.resolution, Some(Resolution::ConditionCleared));
    assert!(engine.active_alerts("P1").is_empty());

    // Still inside the cooldown: a relapse stays quiet.
    let relapse = engine.evaluate("P1", &make_indicators("P1", 2, 40_000.0, 50_000.0), None, day(2));
    assert!(relapse.raised.is_empty());
}

#[test]
fn undefined_input_is_indeterminate() {
    let engine = make_engine(vec![cpi_rule()]);
    engine.evaluate("P1", &make_indicators("P1", 0, 40_000.0, 50_000.0), None, day(0));

    // AC = 0 → CPI undefined: the active alert stays active.
    let undefined = engine.evaluate("P1", &make_indicators("P1", 1, 40_000.0, 0.0), None, day(1));
    assert!(undefined.is_empty());
    assert_eq!(engine.active_alerts("P1").len(), 1);
}

// ── Prediction targets ───────────────────────────────────────────────────

#[test]
fn prediction_rules_read_the_bundle() {
    let engine = make_engine(vec![make_rule(
        "risk-high",
        "risk.point_estimate",
        Comparator::Ge,
        67.0,
        Severity::High,
        1,
    )]);
    let indicators = make_indicators("P1", 0, 100_000.0, 100_000.0);

    let none = engine.evaluate("P1", &indicators, None, day(0));
    assert!(none.is_empty());

    let bundle = risk_bundle("P1", 80.0, day(0));
    let evaluation = engine.evaluate("P1", &indicators, Some(&bundle), day(0));
    assert_eq!(evaluation.raised.len(), 1);
    assert_eq!(
        evaluation.raised[0].payload.prediction.as_ref().map(|p| p.point_estimate),
        Some(80.0)
    );
}

#[test]
fn failed_prediction_is_indeterminate() {
    let engine = make_engine(vec![make_rule(
        "overrun",
        "budget.overrun_probability",
        Comparator::Gt,
        0.5,
        Severity::Critical,
        0,
    )]);
    let mut bundle = PredictionBundle::new("P1", day(0));
    bundle.outcomes.insert(
        ModelKind::BUDGET,
        ModelOutcome::Failed {
            reason: vantage_core::models::FailureReason {
                kind: vantage_core::models::FailureKind::DataInsufficiency,
                message: "budget_at_completion is zero".into(),
            },
        },
    );
    let indicators = make_indicators("P1", 0, 100_000.0, 100_000.0);
    assert!(engine.evaluate("P1", &indicators, Some(&bundle), day(0)).is_empty());
}

// ── Concurrency ──────────────────────────────────────────────────────────

#[test]
fn projects_are_independent_under_parallel_evaluation() {
    let engine = make_engine(vec![cpi_rule()]);
    let projects: Vec<String> = (0..16).map(|i| format!("P{i}")).collect();
    let raised: BTreeMap<String, usize> = projects
        .par_iter()
        .map(|id| {
            let indicators = make_indicators(id, 0, 40_000.0, 50_000.0);
            let first = engine.evaluate(id, &indicators, None, day(0));
            let again = engine.evaluate(id, &indicators, None, day(0));
            (id.clone(), first.raised.len() + again.raised.len())
        })
        .collect();
    assert!(raised.values().all(|&n| n == 1));
    assert_eq!(engine.ledger().len(), 16);
}

// ── Properties ───────────────────────────────────────────────────────────

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn at_most_one_active_alert_per_rule(
            costs in proptest::collection::vec(10_000.0f64..90_000.0, 1..30),
            cooldown in 0u64..4,
        ) {
            let mut rule = cpi_rule();
            rule.cooldown_window_secs = cooldown * 86_400;
            let engine = make_engine(vec![rule]);
            for (n, ac) in costs.iter().enumerate() {
                let indicators = make_indicators("P1", n as i64, 40_000.0, *ac);
                engine.evaluate("P1", &indicators, None, day(n as i64));
                prop_assert!(engine.active_alerts("P1").len() <= 1);
            }
            let history = engine.history("P1");
            for pair in history.windows(2) {
                prop_assert!(pair[0].resolved);
                prop_assert!(pair[0].triggered_at <= pair[1].triggered_at);
            }
        }
    }
}
