use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ModelKind, PredictionResult};
use crate::errors::VantageError;

/// Category of a per-model failure inside a bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    DataInsufficiency,
    DivisionGuard,
    UnknownModelKind,
    Model,
    Other,
}

/// Why one model in a bundle produced no prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureReason {
    pub kind: FailureKind,
    pub message: String,
}

impl From<&VantageError> for FailureReason {
    fn from(err: &VantageError) -> Self {
        let kind = match err {
            VantageError::DataInsufficiency { .. } => FailureKind::DataInsufficiency,
            VantageError::DivisionGuard { .. } => FailureKind::DivisionGuard,
            VantageError::UnknownModelKind { .. } => FailureKind::UnknownModelKind,
            VantageError::ModelError(_) => FailureKind::Model,
            _ => FailureKind::Other,
        };
        Self {
            kind,
            message: err.to_string(),
        }
    }
}

/// Result slot for one model kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ModelOutcome {
    Predicted { result: PredictionResult },
    Failed { reason: FailureReason },
}

impl ModelOutcome {
    pub fn prediction(&self) -> Option<&PredictionResult> {
        match self {
            Self::Predicted { result } => Some(result),
            Self::Failed { .. } => None,
        }
    }

    pub fn failure(&self) -> Option<&FailureReason> {
        match self {
            Self::Predicted { .. } => None,
            Self::Failed { reason } => Some(reason),
        }
    }
}

/// Every model's outcome for one project at one `as_of`.
///
/// A failing model never hides the others: each kind gets its own slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionBundle {
    pub project_id: String,
    pub as_of: DateTime<Utc>,
    pub outcomes: BTreeMap<ModelKind, ModelOutcome>,
}

impl PredictionBundle {
    pub fn new(project_id: impl Into<String>, as_of: DateTime<Utc>) -> Self {
        Self {
            project_id: project_id.into(),
            as_of,
            outcomes: BTreeMap::new(),
        }
    }

    pub fn get(&self, kind: &ModelKind) -> Option<&ModelOutcome> {
        self.outcomes.get(kind)
    }

    pub fn prediction(&self, kind: &ModelKind) -> Option<&PredictionResult> {
        self.get(kind).and_then(ModelOutcome::prediction)
    }

    pub fn timeline(&self) -> Option<&ModelOutcome> {
        self.get(&ModelKind::TIMELINE)
    }

    pub fn budget(&self) -> Option<&ModelOutcome> {
        self.get(&ModelKind::BUDGET)
    }

    pub fn risk(&self) -> Option<&ModelOutcome> {
        self.get(&ModelKind::RISK)
    }

    pub fn resource(&self) -> Option<&ModelOutcome> {
        self.get(&ModelKind::RESOURCE)
    }

    /// Kinds whose prediction failed, with the reason.
    pub fn failures(&self) -> impl Iterator<Item = (&ModelKind, &FailureReason)> {
        self.outcomes
            .iter()
            .filter_map(|(kind, outcome)| outcome.failure().map(|r| (kind, r)))
    }
}
