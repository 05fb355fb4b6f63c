pub mod alert;
pub mod bundle;
pub mod feature;
pub mod health;
pub mod indicator;
pub mod measure;
pub mod prediction;
pub mod rule;
pub mod snapshot;
pub mod workload;

pub use alert::{Alert, AlertPayload, DeliveryOutcome, DeliveryRecord, Resolution, Severity};
pub use bundle::{FailureKind, FailureReason, ModelOutcome, PredictionBundle};
pub use feature::{Feature, FeatureVector};
pub use health::{DataQualityReport, HealthAssessment, HealthStatus, PortfolioSummary};
pub use indicator::{IndicatorField, IndicatorSeries, IndicatorSet, IndicatorTrend};
pub use measure::{Measure, UndefinedReason};
pub use prediction::{
    ConfidenceInterval, ModelKind, PredictionDetails, PredictionField, PredictionResult,
    RiskCategory,
};
pub use rule::{Comparator, Rule, RuleTarget};
pub use snapshot::ProjectSnapshot;
pub use workload::{
    Assignment, ResourceAvailability, TaskDemand, UnmetReason, UnmetRequirement, Workload,
};
