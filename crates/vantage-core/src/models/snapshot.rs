use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One time-stamped operational record for a project.
///
/// Produced by the external record store. The pipeline never mutates a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    pub project_id: String,
    pub timestamp: DateTime<Utc>,
    /// Budgeted cost of work scheduled to date.
    pub planned_value: f64,
    /// Budgeted cost of work actually performed to date.
    pub earned_value: f64,
    /// Actual cost spent to date.
    pub actual_cost: f64,
    pub planned_hours: f64,
    pub actual_hours: f64,
    pub open_tasks: u32,
    pub completed_tasks: u32,
    pub team_size: u32,
    /// Total planned budget for the whole project. Zero when unknown.
    #[serde(default)]
    pub budget_at_completion: f64,
}

impl ProjectSnapshot {
    /// blake3 fingerprint over the exact bit patterns of every field.
    ///
    /// Two snapshots with the same fingerprint yield bit-identical indicators. A
    /// retroactively corrected snapshot for the same timestamp gets a new fingerprint.
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.project_id.as_bytes());
        hasher.update(&self.timestamp.timestamp_micros().to_le_bytes());
        for value in [
            self.planned_value,
            self.earned_value,
            self.actual_cost,
            self.planned_hours,
            self.actual_hours,
            self.budget_at_completion,
        ] {
            hasher.update(&value.to_bits().to_le_bytes());
        }
        for count in [self.open_tasks, self.completed_tasks, self.team_size] {
            hasher.update(&count.to_le_bytes());
        }
        hasher.finalize().to_hex().to_string()
    }

    /// Total number of tasks known at this point in time.
    pub fn total_tasks(&self) -> u32 {
        self.open_tasks.saturating_add(self.completed_tasks)
    }
}
