use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Assignment, Measure, UndefinedReason, UnmetRequirement};

/// Registry key of a predictive model.
///
/// The set is open: the four built-in kinds are constants, new kinds are any other
/// string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelKind(Cow<'static, str>);

impl ModelKind {
    pub const TIMELINE: ModelKind = ModelKind(Cow::Borrowed("timeline"));
    pub const BUDGET: ModelKind = ModelKind(Cow::Borrowed("budget"));
    pub const RISK: ModelKind = ModelKind(Cow::Borrowed("risk"));
    pub const RESOURCE: ModelKind = ModelKind(Cow::Borrowed("resource"));

    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModelKind {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Discrete risk band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskCategory {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        };
        f.write_str(s)
    }
}

/// Kind-specific payload attached to a [`PredictionResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PredictionDetails {
    Timeline {
        /// Days to completion at the current completion velocity.
        velocity_days: f64,
    },
    Budget {
        trend_component: f64,
        series_component: f64,
        overrun_probability: f64,
        planned_budget: f64,
        samples: usize,
    },
    Risk {
        category: RiskCategory,
    },
    Resource {
        allocation: Vec<Assignment>,
        unmet: Vec<UnmetRequirement>,
    },
    Generic {
        values: BTreeMap<String, f64>,
    },
}

/// Output of one model for one project at one point in time. Immutable once returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub model_kind: ModelKind,
    pub project_id: String,
    pub point_estimate: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    /// Confidence in [0, 1].
    pub confidence: f64,
    pub generated_at: DateTime<Utc>,
    pub details: PredictionDetails,
}

impl PredictionResult {
    /// Look up a prediction field for rule evaluation.
    pub fn field(&self, field: PredictionField) -> Measure {
        match field {
            PredictionField::PointEstimate => Measure::from_f64(self.point_estimate),
            PredictionField::LowerBound => Measure::from_f64(self.lower_bound),
            PredictionField::UpperBound => Measure::from_f64(self.upper_bound),
            PredictionField::Confidence => Measure::from_f64(self.confidence),
            PredictionField::OverrunProbability => match &self.details {
                PredictionDetails::Budget {
                    overrun_probability,
                    ..
                } => Measure::from_f64(*overrun_probability),
                _ => Measure::undefined(UndefinedReason::NotApplicable),
            },
            PredictionField::UnmetRequirements => match &self.details {
                PredictionDetails::Resource { unmet, .. } => Measure::from_f64(unmet.len() as f64),
                _ => Measure::undefined(UndefinedReason::NotApplicable),
            },
        }
    }

    pub fn interval(&self) -> ConfidenceInterval {
        ConfidenceInterval {
            lower: self.lower_bound,
            upper: self.upper_bound,
            confidence: self.confidence,
        }
    }
}

/// Prediction fields addressable from rules as `<model_kind>.<field>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionField {
    PointEstimate,
    LowerBound,
    UpperBound,
    Confidence,
    OverrunProbability,
    UnmetRequirements,
}

impl PredictionField {
    pub const ALL: [PredictionField; 6] = [
        Self::PointEstimate,
        Self::LowerBound,
        Self::UpperBound,
        Self::Confidence,
        Self::OverrunProbability,
        Self::UnmetRequirements,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::PointEstimate => "point_estimate",
            Self::LowerBound => "lower_bound",
            Self::UpperBound => "upper_bound",
            Self::Confidence => "confidence",
            Self::OverrunProbability => "overrun_probability",
            Self::UnmetRequirements => "unmet_requirements",
        }
    }
}

impl fmt::Display for PredictionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PredictionField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| format!("unknown prediction field '{s}'"))
    }
}

/// Interval around a point estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
    /// Confidence in [0, 1].
    pub confidence: f64,
}

impl ConfidenceInterval {
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}
