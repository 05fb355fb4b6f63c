//! [`Measure`]: a numeric value that is either defined or carries an explicit
//! reason for being undefined.
//!
//! Ratios with a zero denominator, features without enough history and non-finite
//! inputs all become `Undefined`. A `Measure` never holds NaN or infinity, so an
//! undefined value can never slip into a threshold comparison.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Why a [`Measure`] has no value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum UndefinedReason {
    /// The denominator of a ratio was zero.
    DivisionGuard { denominator: String },
    /// The extractor needs more history points than are available.
    InsufficientHistory { required: usize, available: usize },
    /// An input or intermediate result was NaN or infinite.
    NonFinite,
    /// The field does not exist for this kind of value.
    NotApplicable,
}

impl fmt::Display for UndefinedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DivisionGuard { denominator } => write!(f, "{denominator} is zero"),
            Self::InsufficientHistory {
                required,
                available,
            } => write!(
                f,
                "insufficient history: need {required} point(s), have {available}"
            ),
            Self::NonFinite => f.write_str("non-finite input"),
            Self::NotApplicable => f.write_str("not applicable"),
        }
    }
}

/// A defined value or an explicit undefined marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Measure {
    Defined { value: f64 },
    Undefined { reason: UndefinedReason },
}

impl Measure {
    /// Wrap a value, turning NaN and infinities into `Undefined(NonFinite)`.
    pub fn from_f64(value: f64) -> Self {
        if value.is_finite() {
            Self::Defined { value }
        } else {
            Self::undefined(UndefinedReason::NonFinite)
        }
    }

    /// `numerator / denominator`, guarded against a zero denominator.
    pub fn ratio(numerator: f64, denominator: f64, denominator_name: &str) -> Self {
        if !numerator.is_finite() || !denominator.is_finite() {
            return Self::undefined(UndefinedReason::NonFinite);
        }
        if denominator == 0.0 {
            return Self::undefined(UndefinedReason::DivisionGuard {
                denominator: denominator_name.to_string(),
            });
        }
        Self::from_f64(numerator / denominator)
    }

    pub fn undefined(reason: UndefinedReason) -> Self {
        Self::Undefined { reason }
    }

    /// Marker for an extractor whose window exceeds the available history.
    pub fn insufficient_history(required: usize, available: usize) -> Self {
        Self::undefined(UndefinedReason::InsufficientHistory {
            required,
            available,
        })
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Defined { value } => Some(*value),
            Self::Undefined { .. } => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, Self::Defined { .. })
    }

    pub fn reason(&self) -> Option<&UndefinedReason> {
        match self {
            Self::Defined { .. } => None,
            Self::Undefined { reason } => Some(reason),
        }
    }

    /// Apply `f` to a defined value. The result is re-checked for finiteness.
    pub fn map(&self, f: impl FnOnce(f64) -> f64) -> Self {
        match self {
            Self::Defined { value } => Self::from_f64(f(*value)),
            Self::Undefined { .. } => self.clone(),
        }
    }

    /// Combine two measures; the first undefined operand wins.
    pub fn zip_with(&self, other: &Self, f: impl FnOnce(f64, f64) -> f64) -> Self {
        match (self, other) {
            (Self::Defined { value: a }, Self::Defined { value: b }) => Self::from_f64(f(*a, *b)),
            (Self::Undefined { .. }, _) => self.clone(),
            (_, Self::Undefined { .. }) => other.clone(),
        }
    }
}

impl From<f64> for Measure {
    fn from(value: f64) -> Self {
        Self::from_f64(value)
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Defined { value } => write!(f, "{value:.3}"),
            Self::Undefined { reason } => write!(f, "undefined ({reason})"),
        }
    }
}
