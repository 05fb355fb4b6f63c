//! Skill- and capacity-constrained task assignment.
//!
//! Each task goes whole to one resource that has its skill and enough remaining
//! hours. The objective is the smallest unmet penalty, `Σ hours × priority` over
//! unassigned tasks. Small workloads are solved exactly by branch and bound,
//! larger ones by best-fit decreasing plus a one-move repair pass.

mod allocation;
mod exact;
mod greedy;

pub use allocation::Allocation;

use tracing::debug;
use vantage_core::config::ResourceConfig;
use vantage_core::errors::{VantageError, VantageResult};
use vantage_core::models::{
    Assignment, ModelKind, PredictionDetails, PredictionResult, TaskDemand, UnmetReason,
    UnmetRequirement, Workload,
};
use vantage_features::FeatureSchema;

use crate::state::FittedState;
use crate::traits::{expect_schema, IPredictiveModel, ModelInput, TrainingExample};

pub const SCHEMA_NAME: &str = "resource";
pub const SCHEMA_VERSION: u32 = 1;

pub struct ResourceOptimizer {
    config: ResourceConfig,
    schema: FeatureSchema,
}

impl ResourceOptimizer {
    pub fn new(config: ResourceConfig) -> Self {
        Self {
            config,
            schema: FeatureSchema::new(SCHEMA_NAME, SCHEMA_VERSION),
        }
    }

    /// Best allocation of `workload`. Never fails; unplaceable tasks come back as
    /// unmet requirements.
    pub fn optimize(&self, workload: &Workload) -> Allocation {
        let placement = if workload.tasks.len() <= self.config.exact_search_limit {
            exact::solve(workload)
        } else {
            greedy::solve(workload)
        };
        let allocation = build_allocation(workload, &placement);
        debug!(
            tasks = workload.tasks.len(),
            resources = workload.resources.len(),
            unmet = allocation.unmet.len(),
            exact = workload.tasks.len() <= self.config.exact_search_limit,
            "optimized allocation"
        );
        allocation
    }
}

impl Default for ResourceOptimizer {
    fn default() -> Self {
        Self::new(ResourceConfig::default())
    }
}

impl IPredictiveModel for ResourceOptimizer {
    fn kind(&self) -> ModelKind {
        ModelKind::RESOURCE
    }

    fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    fn prior(&self) -> FittedState {
        FittedState::new(ModelKind::RESOURCE)
    }

    /// Nothing to learn; records how many examples were seen.
    fn fit(&self, examples: &[TrainingExample]) -> VantageResult<FittedState> {
        for example in examples {
            expect_schema(&self.kind(), &self.schema, &example.features)?;
        }
        let mut state = self.prior();
        state.sample_count = examples.len();
        Ok(state)
    }

    fn predict(
        &self,
        input: &ModelInput<'_>,
        _state: &FittedState,
    ) -> VantageResult<PredictionResult> {
        let features = input.features;
        expect_schema(&self.kind(), &self.schema, features)?;
        let workload = input.workload.ok_or_else(|| {
            VantageError::insufficient(
                format!("resource allocation for {}", features.project_id),
                "no workload supplied",
            )
        })?;
        validate(workload)?;

        let allocation = self.optimize(workload);
        let coverage = allocation.coverage(workload);
        Ok(PredictionResult {
            model_kind: self.kind(),
            project_id: features.project_id.clone(),
            point_estimate: coverage,
            lower_bound: coverage,
            upper_bound: coverage,
            confidence: 1.0,
            generated_at: features.as_of,
            details: PredictionDetails::Resource {
                allocation: allocation.assignments,
                unmet: allocation.unmet,
            },
        })
    }
}

fn validate(workload: &Workload) -> VantageResult<()> {
    let bad_task = workload
        .tasks
        .iter()
        .find(|t| !t.hours.is_finite() || t.hours < 0.0 || !t.priority.is_finite());
    if let Some(task) = bad_task {
        return Err(VantageError::insufficient(
            format!("task {}", task.task_id),
            "hours and priority must be finite and non-negative",
        ));
    }
    let bad_resource = workload
        .resources
        .iter()
        .find(|r| !r.available_hours.is_finite() || r.available_hours < 0.0);
    if let Some(resource) = bad_resource {
        return Err(VantageError::insufficient(
            format!("resource {}", resource.resource_id),
            "available_hours must be finite and non-negative",
        ));
    }
    Ok(())
}

/// `placement[i]` is the resource index for task `i`, if any.
fn build_allocation(workload: &Workload, placement: &[Option<usize>]) -> Allocation {
    let mut allocation = Allocation::default();
    for (task, slot) in workload.tasks.iter().zip(placement) {
        match slot {
            Some(r) => allocation.assignments.push(Assignment {
                task_id: task.task_id.clone(),
                resource_id: workload.resources[*r].resource_id.clone(),
                hours: task.hours,
            }),
            None => {
                let reason = if workload.resources.iter().any(|r| r.has_skill(&task.skill)) {
                    UnmetReason::InsufficientCapacity
                } else {
                    UnmetReason::NoSkilledResource
                };
                allocation.penalty += penalty(task);
                allocation.unmet.push(UnmetRequirement {
                    task_id: task.task_id.clone(),
                    skill: task.skill.clone(),
                    hours: task.hours,
                    reason,
                });
            }
        }
    }
    allocation
}

const CAPACITY_EPSILON: f64 = 1e-9;

fn penalty(task: &TaskDemand) -> f64 {
    task.hours * task.priority
}

fn fits(remaining: f64, hours: f64) -> bool {
    remaining + CAPACITY_EPSILON >= hours
}

/// Resource indices that hold `skill`, in input order.
fn skilled(workload: &Workload, skill: &str) -> Vec<usize> {
    workload
        .resources
        .iter()
        .enumerate()
        .filter(|(_, r)| r.has_skill(skill))
        .map(|(i, _)| i)
        .collect()
}
