//! [`ModelRegistry`]: model kind → adapter.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;
use vantage_core::config::ModelConfig;
use vantage_core::errors::{VantageError, VantageResult};
use vantage_core::models::ModelKind;

use crate::budget::BudgetForecaster;
use crate::resource::ResourceOptimizer;
use crate::risk::RiskScorer;
use crate::timeline::TimelinePredictor;
use crate::traits::IPredictiveModel;

/// Registered adapters, iterated in kind order.
#[derive(Clone, Default)]
pub struct ModelRegistry {
    models: BTreeMap<ModelKind, Arc<dyn IPredictiveModel>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the four built-in adapters.
    pub fn with_defaults(config: &ModelConfig) -> Self {
        let mut registry = Self::new();
        registry.register(
            ModelKind::TIMELINE,
            Arc::new(TimelinePredictor::new(config.timeline.clone())),
        );
        registry.register(
            ModelKind::BUDGET,
            Arc::new(BudgetForecaster::new(config.budget.clone())),
        );
        registry.register(ModelKind::RISK, Arc::new(RiskScorer::new(config.risk.clone())));
        registry.register(
            ModelKind::RESOURCE,
            Arc::new(ResourceOptimizer::new(config.resource.clone())),
        );
        registry
    }

    /// Register `model` under `kind`, returning the adapter it replaces.
    pub fn register(
        &mut self,
        kind: ModelKind,
        model: Arc<dyn IPredictiveModel>,
    ) -> Option<Arc<dyn IPredictiveModel>> {
        info!(kind = %kind, schema = %model.schema().name, "registered model");
        self.models.insert(kind, model)
    }

    pub fn get(&self, kind: &ModelKind) -> VantageResult<Arc<dyn IPredictiveModel>> {
        self.models
            .get(kind)
            .cloned()
            .ok_or_else(|| VantageError::UnknownModelKind {
                kind: kind.to_string(),
            })
    }

    pub fn contains(&self, kind: &ModelKind) -> bool {
        self.models.contains_key(kind)
    }

    pub fn kinds(&self) -> Vec<ModelKind> {
        self.models.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ModelKind, &Arc<dyn IPredictiveModel>)> {
        self.models.iter()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}
