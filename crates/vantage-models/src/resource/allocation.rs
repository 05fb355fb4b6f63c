use serde::{Deserialize, Serialize};
use vantage_core::errors::{VantageError, VantageResult};
use vantage_core::models::{Assignment, UnmetRequirement, Workload};

/// Result of one optimization: placed tasks, tasks left over, and their penalty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub assignments: Vec<Assignment>,
    pub unmet: Vec<UnmetRequirement>,
    /// `Σ hours × priority` over unmet tasks.
    pub penalty: f64,
}

impl Allocation {
    pub fn is_feasible(&self) -> bool {
        self.unmet.is_empty()
    }

    /// Assigned hours over required hours. 1.0 for a workload with no hours.
    pub fn coverage(&self, workload: &Workload) -> f64 {
        let required: f64 = workload.tasks.iter().map(|t| t.hours).sum();
        if required <= 0.0 {
            return 1.0;
        }
        let assigned: f64 = self.assignments.iter().map(|a| a.hours).sum();
        assigned / required
    }

    /// Hours placed on `resource_id`.
    pub fn load(&self, resource_id: &str) -> f64 {
        self.assignments
            .iter()
            .filter(|a| a.resource_id == resource_id)
            .map(|a| a.hours)
            .sum()
    }

    /// The assignments, or `OptimizationInfeasible` if anything is unmet.
    pub fn into_feasible(self) -> VantageResult<Vec<Assignment>> {
        if self.unmet.is_empty() {
            Ok(self.assignments)
        } else {
            Err(VantageError::OptimizationInfeasible {
                unmet: self.unmet.len(),
            })
        }
    }
}
