use vantage_core::models::{IndicatorSet, Measure, ProjectSnapshot};

/// Compute every indicator for one snapshot.
///
/// Pure: the same snapshot always yields a bit-identical [`IndicatorSet`].
pub fn compute(snapshot: &ProjectSnapshot) -> IndicatorSet {
    let pv = snapshot.planned_value;
    let ev = snapshot.earned_value;
    let ac = snapshot.actual_cost;

    IndicatorSet {
        project_id: snapshot.project_id.clone(),
        timestamp: snapshot.timestamp,
        schedule_performance_index: Measure::ratio(ev, pv, "planned_value"),
        cost_performance_index: Measure::ratio(ev, ac, "actual_cost"),
        budget_variance: Measure::from_f64(pv - ac),
        resource_utilization: Measure::ratio(
            snapshot.actual_hours,
            snapshot.planned_hours,
            "planned_hours",
        ),
        schedule_variance: Measure::from_f64(ev - pv),
        cost_variance: Measure::from_f64(ev - ac),
        completion_percentage: Measure::ratio(
            f64::from(snapshot.completed_tasks),
            f64::from(snapshot.total_tasks()),
            "total_tasks",
        )
        .map(|r| r * 100.0),
        staffing_ratio: Measure::ratio(
            f64::from(snapshot.open_tasks),
            f64::from(snapshot.team_size),
            "team_size",
        ),
        planned_value: pv,
        earned_value: ev,
        actual_cost: ac,
        budget_at_completion: snapshot.budget_at_completion,
        snapshot_fingerprint: snapshot.fingerprint(),
    }
}
