use vantage_core::models::{DataQualityReport, ProjectSnapshot};

const NUMERIC_FIELDS: usize = 6;

/// Percentage of numeric snapshot fields that are finite and non-negative.
///
/// An empty batch scores 100 with no issues.
pub fn assess_quality(snapshots: &[ProjectSnapshot]) -> DataQualityReport {
    let mut issues = Vec::new();
    let mut bad = 0usize;

    for s in snapshots {
        let fields = [
            ("planned_value", s.planned_value),
            ("earned_value", s.earned_value),
            ("actual_cost", s.actual_cost),
            ("planned_hours", s.planned_hours),
            ("actual_hours", s.actual_hours),
            ("budget_at_completion", s.budget_at_completion),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                bad += 1;
                issues.push(format!(
                    "{} @ {}: {name} = {value}",
                    s.project_id,
                    s.timestamp.to_rfc3339()
                ));
            }
        }
    }

    let total = snapshots.len() * NUMERIC_FIELDS;
    let score_pct = if total == 0 {
        100.0
    } else {
        (total - bad) as f64 / total as f64 * 100.0
    };

    DataQualityReport {
        records: snapshots.len(),
        score_pct,
        issues,
    }
}
