use super::{ModelError, StoreError};

/// Top-level error for every Vantage operation.
///
/// `DataInsufficiency`, `DivisionGuard` and `OptimizationInfeasible` are recovered
/// locally by the pipeline. `UnknownModelKind`, `InvalidRuleConfiguration` and
/// `ConfigError` are fatal at load time.
#[derive(Debug, thiserror::Error)]
pub enum VantageError {
    #[error("insufficient data for {subject}: {detail}")]
    DataInsufficiency { subject: String, detail: String },

    #[error("division guard on {indicator}: {denominator} is zero")]
    DivisionGuard {
        indicator: String,
        denominator: String,
    },

    #[error("unknown model kind: {kind}")]
    UnknownModelKind { kind: String },

    #[error("invalid rule configuration: {}", problems.join("; "))]
    InvalidRuleConfiguration { problems: Vec<String> },

    #[error("optimization infeasible: {unmet} unmet requirement(s)")]
    OptimizationInfeasible { unmet: usize },

    #[error("delivery of alert {alert_id} failed: {reason}")]
    DeliveryFailure { alert_id: String, reason: String },

    #[error("snapshot for project {actual} passed to history of {expected}")]
    ProjectMismatch { expected: String, actual: String },

    #[error("evaluation of {project_id} cancelled before {step}")]
    Cancelled { project_id: String, step: String },

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("store error: {0}")]
    StoreError(#[from] StoreError),

    #[error("model error: {0}")]
    ModelError(#[from] ModelError),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl VantageError {
    /// Shorthand for a [`VantageError::DataInsufficiency`].
    pub fn insufficient(subject: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::DataInsufficiency {
            subject: subject.into(),
            detail: detail.into(),
        }
    }

    /// Whether the pipeline recovers from this error locally instead of aborting.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::DataInsufficiency { .. }
                | Self::DivisionGuard { .. }
                | Self::OptimizationInfeasible { .. }
                | Self::DeliveryFailure { .. }
                | Self::ModelError(_)
        )
    }
}

/// Convenience alias.
pub type VantageResult<T> = Result<T, VantageError>;
