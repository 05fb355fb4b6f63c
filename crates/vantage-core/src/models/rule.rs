use std::fmt;

use serde::{Deserialize, Serialize};

use super::{IndicatorField, ModelKind, PredictionField, Severity};
use crate::constants::{COMPARISON_EPSILON, MAX_COOLDOWN_SECS};

/// Threshold comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparator {
    #[serde(rename = "<", alias = "lt")]
    Lt,
    #[serde(rename = "<=", alias = "le")]
    Le,
    #[serde(rename = ">", alias = "gt")]
    Gt,
    #[serde(rename = ">=", alias = "ge")]
    Ge,
    #[serde(rename = "==", alias = "eq")]
    Eq,
    #[serde(rename = "!=", alias = "ne")]
    Ne,
}

impl Comparator {
    /// Whether `value <op> threshold` holds. Equality uses [`COMPARISON_EPSILON`].
    pub fn holds(self, value: f64, threshold: f64) -> bool {
        let equal = (value - threshold).abs() <= COMPARISON_EPSILON;
        match self {
            Self::Lt => value < threshold && !equal,
            Self::Le => value < threshold || equal,
            Self::Gt => value > threshold && !equal,
            Self::Ge => value > threshold || equal,
            Self::Eq => equal,
            Self::Ne => !equal,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Eq => "==",
            Self::Ne => "!=",
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Declarative threshold rule. Immutable after load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub rule_id: String,
    /// An indicator field name or `<model_kind>.<prediction_field>`.
    pub applies_to: String,
    pub comparator: Comparator,
    pub threshold: f64,
    pub severity: Severity,
    /// Minimum time between two alerts for the same (project, rule).
    pub cooldown_window_secs: u64,
    #[serde(default)]
    pub description: Option<String>,
}

impl Rule {
    pub fn cooldown_window(&self) -> chrono::Duration {
        let secs = self.cooldown_window_secs.min(MAX_COOLDOWN_SECS);
        chrono::Duration::seconds(secs as i64)
    }
}

/// What a rule's `applies_to` resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RuleTarget {
    Indicator(IndicatorField),
    Prediction {
        kind: ModelKind,
        field: PredictionField,
    },
}

impl RuleTarget {
    /// Parse `applies_to`. Indicator fields must use their full [`IndicatorSet`](super::IndicatorSet)
    /// name; prediction fields use `<model_kind>.<field>`.
    pub fn parse(applies_to: &str) -> Result<Self, String> {
        if let Some((kind, field)) = applies_to.split_once('.') {
            if kind.is_empty() {
                return Err(format!("'{applies_to}' has an empty model kind"));
            }
            let field = field.parse::<PredictionField>()?;
            return Ok(Self::Prediction {
                kind: ModelKind::new(kind),
                field,
            });
        }
        IndicatorField::ALL
            .into_iter()
            .find(|f| f.name() == applies_to)
            .map(Self::Indicator)
            .ok_or_else(|| format!("'{applies_to}' is not an indicator or prediction field"))
    }
}

impl fmt::Display for RuleTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Indicator(field) => write!(f, "{field}"),
            Self::Prediction { kind, field } => write!(f, "{kind}.{field}"),
        }
    }
}
