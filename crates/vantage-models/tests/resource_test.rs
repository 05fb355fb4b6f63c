use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use vantage_core::config::ResourceConfig;
use vantage_core::errors::VantageError;
use vantage_core::models::{
    FeatureVector, PredictionDetails, ResourceAvailability, TaskDemand, UnmetReason, Workload,
};
use vantage_models::{IPredictiveModel, ModelInput, ResourceOptimizer};

fn task(id: &str, skill: &str, hours: f64) -> TaskDemand {
    TaskDemand {
        task_id: id.into(),
        skill: skill.into(),
        hours,
        priority: 1.0,
    }
}

fn resource(id: &str, skills: &[&str], hours: f64) -> ResourceAvailability {
    ResourceAvailability {
        resource_id: id.into(),
        skills: skills.iter().map(|s| s.to_string()).collect(),
        available_hours: hours,
    }
}

fn empty_features(model: &ResourceOptimizer) -> FeatureVector {
    FeatureVector {
        project_id: "P1".into(),
        as_of: Utc.with_ymd_and_hms(2026, 4, 1, 0, 0, 0).unwrap(),
        schema_name: model.schema().name.clone(),
        schema_version: model.schema().version,
        features: Vec::new(),
    }
}

fn assert_respects_constraints(workload: &Workload, allocation: &vantage_models::Allocation) {
    for r in &workload.resources {
        assert!(allocation.load(&r.resource_id) <= r.available_hours + 1e-9);
    }
    for a in &allocation.assignments {
        let t = workload.tasks.iter().find(|t| t.task_id == a.task_id).unwrap();
        let r = workload
            .resources
            .iter()
            .find(|r| r.resource_id == a.resource_id)
            .unwrap();
        assert!(r.has_skill(&t.skill));
    }
    assert_eq!(
        allocation.assignments.len() + allocation.unmet.len(),
        workload.tasks.len()
    );
}

// ── Feasibility ──────────────────────────────────────────────────────────

#[test]
fn three_task_workload_is_fully_covered() {
    let workload = Workload {
        tasks: vec![
            task("A", "rust", 10.0),
            task("B", "sql", 5.0),
            task("C", "rust", 8.0),
        ],
        resources: vec![
            resource("R1", &["rust", "sql"], 15.0),
            resource("R2", &["rust"], 10.0),
        ],
    };
    let allocation = ResourceOptimizer::default().optimize(&workload);
    assert!(allocation.is_feasible());
    assert_eq!(allocation.penalty, 0.0);
    assert_eq!(allocation.coverage(&workload), 1.0);
    assert_respects_constraints(&workload, &allocation);
    assert_eq!(allocation.into_feasible().unwrap().len(), 3);
}

#[test]
fn no_resources_leaves_every_task_unmet() {
    let workload = Workload {
        tasks: vec![
            task("A", "rust", 10.0),
            task("B", "sql", 5.0),
            task("C", "rust", 8.0),
        ],
        resources: Vec::new(),
    };
    let allocation = ResourceOptimizer::default().optimize(&workload);
    assert_eq!(allocation.unmet.len(), 3);
    assert!(allocation
        .unmet
        .iter()
        .all(|u| u.reason == UnmetReason::NoSkilledResource));
    assert_eq!(allocation.coverage(&workload), 0.0);
    assert!(matches!(
        allocation.into_feasible(),
        Err(VantageError::OptimizationInfeasible { unmet: 3 })
    ));
}

#[test]
fn full_resource_reports_insufficient_capacity() {
    let workload = Workload {
        tasks: vec![task("A", "design", 6.0), task("B", "design", 6.0)],
        resources: vec![resource("R1", &["design"], 8.0)],
    };
    let allocation = ResourceOptimizer::default().optimize(&workload);
    assert_eq!(allocation.assignments.len(), 1);
    assert_eq!(allocation.unmet[0].reason, UnmetReason::InsufficientCapacity);
}

#[test]
fn higher_priority_task_wins_scarce_capacity() {
    let mut urgent = task("urgent", "ops", 5.0);
    urgent.priority = 10.0;
    let workload = Workload {
        tasks: vec![task("routine", "ops", 6.0), urgent],
        resources: vec![resource("R1", &["ops"], 6.0)],
    };
    let allocation = ResourceOptimizer::default().optimize(&workload);
    assert_eq!(allocation.assignments[0].task_id, "urgent");
    assert_eq!(allocation.penalty, 6.0);
}

#[test]
fn exact_search_finds_packing_greedy_misses() {
    // Best-fit decreasing puts the 5 on the 8-hour resource and strands one 4.
    let workload = Workload {
        tasks: vec![
            task("a", "x", 5.0),
            task("b", "x", 4.0),
            task("c", "x", 4.0),
            task("d", "x", 4.0),
        ],
        resources: vec![resource("big", &["x"], 8.0), resource("small", &["x"], 9.0)],
    };
    let exact = ResourceOptimizer::default().optimize(&workload);
    assert!(exact.is_feasible(), "{exact:?}");
    assert_respects_constraints(&workload, &exact);
}

#[test]
fn large_workload_uses_greedy_and_stays_valid() {
    let tasks: Vec<_> = (0..40)
        .map(|i| task(&format!("t{i:02}"), ["a", "b", "c"][i % 3], (i % 7 + 1) as f64))
        .collect();
    let resources = vec![
        resource("r1", &["a", "b"], 40.0),
        resource("r2", &["b", "c"], 40.0),
        resource("r3", &["a", "c"], 30.0),
    ];
    let workload = Workload { tasks, resources };
    let allocation = ResourceOptimizer::new(ResourceConfig {
        exact_search_limit: 12,
    })
    .optimize(&workload);
    assert_respects_constraints(&workload, &allocation);
}

// ── Model adapter ────────────────────────────────────────────────────────

#[test]
fn predict_reports_coverage_and_allocation() {
    let model = ResourceOptimizer::default();
    let workload = Workload {
        tasks: vec![task("A", "rust", 10.0), task("B", "go", 5.0)],
        resources: vec![resource("R1", &["rust"], 20.0)],
    };
    let features = empty_features(&model);
    let input = ModelInput::new(&features).with_workload(Some(&workload));
    let result = model.predict(&input, &model.prior()).unwrap();

    assert!((result.point_estimate - 10.0 / 15.0).abs() < 1e-12);
    assert_eq!(result.confidence, 1.0);
    let PredictionDetails::Resource { allocation, unmet } = result.details else {
        panic!("expected resource details");
    };
    assert_eq!(allocation.len(), 1);
    assert_eq!(unmet[0].task_id, "B");
}

#[test]
fn predict_without_workload_is_insufficient() {
    let model = ResourceOptimizer::default();
    let features = empty_features(&model);
    let err = model
        .predict(&ModelInput::new(&features), &model.prior())
        .unwrap_err();
    assert!(matches!(err, VantageError::DataInsufficiency { .. }));
}

#[test]
fn negative_hours_are_rejected() {
    let model = ResourceOptimizer::default();
    let workload = Workload {
        tasks: vec![task("A", "rust", -1.0)],
        resources: vec![resource("R1", &["rust"], 20.0)],
    };
    let features = empty_features(&model);
    let input = ModelInput::new(&features).with_workload(Some(&workload));
    assert!(model.predict(&input, &model.prior()).is_err());
}

// ── Properties ───────────────────────────────────────────────────────────

fn arb_workload() -> impl Strategy<Value = Workload> {
    let skills = ["a", "b", "c"];
    (
        prop::collection::vec((0usize..3, 1u32..10, 1u32..4), 0..9),
        prop::collection::vec((0usize..3, 0usize..3, 0u32..20), 0..4),
    )
        .prop_map(move |(tasks, resources)| Workload {
            tasks: tasks
                .into_iter()
                .enumerate()
                .map(|(i, (s, h, p))| TaskDemand {
                    task_id: format!("t{i}"),
                    skill: skills[s].into(),
                    hours: f64::from(h),
                    priority: f64::from(p),
                })
                .collect(),
            resources: resources
                .into_iter()
                .enumerate()
                .map(|(i, (s1, s2, h))| ResourceAvailability {
                    resource_id: format!("r{i}"),
                    skills: vec![skills[s1].into(), skills[s2].into()],
                    available_hours: f64::from(h),
                })
                .collect(),
        })
}

proptest! {
    #[test]
    fn exact_is_never_worse_than_greedy(workload in arb_workload()) {
        let exact = ResourceOptimizer::new(ResourceConfig { exact_search_limit: 12 }).optimize(&workload);
        let greedy = ResourceOptimizer::new(ResourceConfig { exact_search_limit: 0 }).optimize(&workload);
        prop_assert!(exact.penalty <= greedy.penalty + 1e-9);
        assert_respects_constraints(&workload, &exact);
        assert_respects_constraints(&workload, &greedy);
    }

    #[test]
    fn optimization_is_deterministic(workload in arb_workload()) {
        let model = ResourceOptimizer::default();
        prop_assert_eq!(model.optimize(&workload), model.optimize(&workload));
    }
}
