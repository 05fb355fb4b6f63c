//! Labelled examples grouped by model kind.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use vantage_core::errors::VantageResult;
use vantage_core::models::{IndicatorSet, ModelKind};
use vantage_models::TrainingExample;

use crate::PredictionOrchestrator;

#[derive(Debug, Clone, Default)]
pub struct TrainingSet {
    examples: BTreeMap<ModelKind, Vec<TrainingExample>>,
}

impl TrainingSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: ModelKind, example: TrainingExample) {
        self.examples.entry(kind).or_default().push(example);
    }

    pub fn kinds(&self) -> impl Iterator<Item = &ModelKind> {
        self.examples.keys()
    }

    pub fn examples(&self, kind: &ModelKind) -> &[TrainingExample] {
        self.examples.get(kind).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.examples.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Label the history of one project as of `as_of` with an observed outcome,
    /// using `kind`'s feature schema.
    pub fn record(
        &mut self,
        orchestrator: &PredictionOrchestrator,
        kind: &ModelKind,
        history: &[IndicatorSet],
        as_of: DateTime<Utc>,
        target: f64,
    ) -> VantageResult<()> {
        let model = orchestrator.registry().get(kind)?;
        let project_id = history
            .first()
            .map(|s| s.project_id.as_str())
            .unwrap_or_default();
        let features = orchestrator
            .feature_builder()
            .build(project_id, history, as_of, model.schema())?;
        self.push(kind.clone(), TrainingExample { features, target });
        Ok(())
    }
}
