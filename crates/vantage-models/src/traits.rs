use vantage_core::errors::VantageResult;
use vantage_core::models::{ConfidenceInterval, FeatureVector, ModelKind, PredictionResult, Workload};
use vantage_features::FeatureSchema;

use crate::state::FittedState;

/// What a model sees for one prediction.
#[derive(Debug, Clone, Copy)]
pub struct ModelInput<'a> {
    pub features: &'a FeatureVector,
    /// Open tasks and resources. Only the resource optimizer reads it.
    pub workload: Option<&'a Workload>,
}

impl<'a> ModelInput<'a> {
    pub fn new(features: &'a FeatureVector) -> Self {
        Self {
            features,
            workload: None,
        }
    }

    pub fn with_workload(mut self, workload: Option<&'a Workload>) -> Self {
        self.workload = workload;
        self
    }

    pub fn project_id(&self) -> &str {
        &self.features.project_id
    }
}

/// A feature vector labelled with the observed outcome.
#[derive(Debug, Clone)]
pub struct TrainingExample {
    pub features: FeatureVector,
    pub target: f64,
}

/// Capability every predictive model exposes to the registry.
///
/// Implementations hold configuration only. Anything learned from data goes into
/// the returned [`FittedState`].
pub trait IPredictiveModel: Send + Sync {
    fn kind(&self) -> ModelKind;

    /// Features the model consumes, in the order it consumes them.
    fn schema(&self) -> &FeatureSchema;

    /// Untrained default parameters.
    fn prior(&self) -> FittedState;

    fn fit(&self, examples: &[TrainingExample]) -> VantageResult<FittedState>;

    fn predict(&self, input: &ModelInput<'_>, state: &FittedState)
        -> VantageResult<PredictionResult>;

    fn confidence(
        &self,
        input: &ModelInput<'_>,
        state: &FittedState,
    ) -> VantageResult<ConfidenceInterval> {
        self.predict(input, state).map(|p| p.interval())
    }
}

/// Fail with `SchemaMismatch` unless `features` was built from `schema`.
pub(crate) fn expect_schema(
    kind: &ModelKind,
    schema: &FeatureSchema,
    features: &FeatureVector,
) -> VantageResult<()> {
    if features.schema_name == schema.name && features.schema_version == schema.version {
        return Ok(());
    }
    Err(vantage_core::errors::ModelError::SchemaMismatch {
        kind: kind.to_string(),
        expected: format!("{} v{}", schema.name, schema.version),
        actual: format!("{} v{}", features.schema_name, features.schema_version),
    }
    .into())
}
