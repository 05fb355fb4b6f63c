use serde::{Deserialize, Serialize};

/// A unit of work that needs one skill for a number of hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDemand {
    pub task_id: String,
    pub skill: String,
    pub hours: f64,
    /// Penalty multiplier when the task stays unassigned. Default: 1.0.
    #[serde(default = "default_priority")]
    pub priority: f64,
}

fn default_priority() -> f64 {
    1.0
}

/// A person or team with a set of skills and remaining capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceAvailability {
    pub resource_id: String,
    pub skills: Vec<String>,
    pub available_hours: f64,
}

impl ResourceAvailability {
    pub fn has_skill(&self, skill: &str) -> bool {
        self.skills.iter().any(|s| s == skill)
    }
}

/// Open tasks and available resources for one project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workload {
    pub tasks: Vec<TaskDemand>,
    pub resources: Vec<ResourceAvailability>,
}

/// One task placed on one resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub task_id: String,
    pub resource_id: String,
    pub hours: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmetReason {
    /// Nobody has the required skill.
    NoSkilledResource,
    /// Skilled resources exist but lack the hours.
    InsufficientCapacity,
}

/// A task the optimizer could not place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnmetRequirement {
    pub task_id: String,
    pub skill: String,
    pub hours: f64,
    pub reason: UnmetReason,
}
