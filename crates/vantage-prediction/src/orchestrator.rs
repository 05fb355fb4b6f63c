use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};
use vantage_core::config::{FeatureConfig, PipelineConfig};
use vantage_core::errors::VantageResult;
use vantage_core::models::{
    FailureReason, IndicatorSeries, ModelKind, ModelOutcome, PredictionBundle, Workload,
};
use vantage_core::traits::IProjectRecordStore;
use vantage_features::FeatureBuilder;
use vantage_indicators::IndicatorEngine;
use vantage_models::{FittedStates, IPredictiveModel, ModelInput, ModelRegistry};

/// Fetches history, builds features and runs every registered model.
pub struct PredictionOrchestrator {
    store: Arc<dyn IProjectRecordStore>,
    registry: ModelRegistry,
    indicators: Arc<IndicatorEngine>,
    features: FeatureBuilder,
    states: RwLock<Arc<FittedStates>>,
    config: PipelineConfig,
}

impl PredictionOrchestrator {
    pub fn new(
        store: Arc<dyn IProjectRecordStore>,
        registry: ModelRegistry,
        indicators: Arc<IndicatorEngine>,
        feature_config: &FeatureConfig,
        config: PipelineConfig,
    ) -> Self {
        Self {
            store,
            registry,
            indicators,
            features: FeatureBuilder::new(feature_config),
            states: RwLock::new(Arc::new(FittedStates::new())),
            config,
        }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn feature_builder(&self) -> &FeatureBuilder {
        &self.features
    }

    pub fn indicator_engine(&self) -> &Arc<IndicatorEngine> {
        &self.indicators
    }

    /// Fitted states used by subsequent evaluations. Kinds without a state use
    /// their prior.
    pub fn states(&self) -> Arc<FittedStates> {
        let guard = self.states.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    pub fn install_states(&self, states: FittedStates) {
        let mut guard = self.states.write().unwrap_or_else(|e| e.into_inner());
        *guard = Arc::new(states);
        info!(kinds = guard.len(), "installed fitted states");
    }

    /// Indicator history for `project_id` over the lookback window ending at `as_of`.
    #[instrument(skip(self))]
    pub fn fetch_series(
        &self,
        project_id: &str,
        as_of: DateTime<Utc>,
    ) -> VantageResult<IndicatorSeries> {
        let from = as_of - self.config.lookback();
        let snapshots =
            self.store
                .fetch_history(project_id, from, as_of, self.config.fetch_timeout())?;
        debug!(project_id, snapshots = snapshots.len(), "fetched history");
        self.indicators.compute_history(project_id, &snapshots)
    }

    /// Workload for the resource optimizer. A failed read is logged and treated as
    /// absent so it only affects the resource outcome.
    pub fn fetch_workload(&self, project_id: &str, as_of: DateTime<Utc>) -> Option<Workload> {
        match self
            .store
            .fetch_workload(project_id, as_of, self.config.fetch_timeout())
        {
            Ok(workload) => workload,
            Err(err) => {
                warn!(project_id, error = %err, "workload fetch failed");
                None
            }
        }
    }

    /// Fetch, compute and predict for one project. Fails only when the history
    /// read fails.
    #[instrument(skip(self))]
    pub fn evaluate(
        &self,
        project_id: &str,
        as_of: DateTime<Utc>,
    ) -> VantageResult<PredictionBundle> {
        let series = self.fetch_series(project_id, as_of)?;
        let workload = self.fetch_workload(project_id, as_of);
        Ok(self.evaluate_series(&series, as_of, workload.as_ref()))
    }

    /// Predict from an indicator history the caller already holds.
    pub fn evaluate_series(
        &self,
        series: &IndicatorSeries,
        as_of: DateTime<Utc>,
        workload: Option<&Workload>,
    ) -> PredictionBundle {
        let states = self.states();
        let mut bundle = PredictionBundle::new(series.project_id.clone(), as_of);
        for (kind, model) in self.registry.iter() {
            let outcome = self.run_model(model.as_ref(), series, as_of, workload, &states);
            if let ModelOutcome::Failed { reason } = &outcome {
                warn!(
                    project_id = %series.project_id,
                    kind = %kind,
                    reason = %reason.message,
                    "model produced no prediction"
                );
            }
            bundle.outcomes.insert(kind.clone(), outcome);
        }
        debug!(
            project_id = %series.project_id,
            failed = bundle.failures().count(),
            "evaluated models"
        );
        bundle
    }

    /// [`Self::evaluate`] for many projects in parallel. Results keep input order.
    pub fn evaluate_many(
        &self,
        project_ids: &[String],
        as_of: DateTime<Utc>,
    ) -> Vec<(String, VantageResult<PredictionBundle>)> {
        project_ids
            .par_iter()
            .map(|id| (id.clone(), self.evaluate(id, as_of)))
            .collect()
    }

    /// Fit every registered kind that has examples in `training`. Kinds without
    /// examples keep their currently installed state. The result is returned, not
    /// installed.
    pub fn train(&self, training: &crate::TrainingSet) -> VantageResult<FittedStates> {
        let current = self.states();
        let mut next = (*current).clone();
        for kind in training.kinds() {
            let model = self.registry.get(kind)?;
            let examples = training.examples(kind);
            let state = model.fit(examples)?;
            info!(kind = %kind, samples = state.sample_count, "trained model");
            next.insert(state);
        }
        Ok(next)
    }

    fn run_model(
        &self,
        model: &dyn IPredictiveModel,
        series: &IndicatorSeries,
        as_of: DateTime<Utc>,
        workload: Option<&Workload>,
        states: &FittedStates,
    ) -> ModelOutcome {
        let prediction = self
            .features
            .build(&series.project_id, &series.sets, as_of, model.schema())
            .and_then(|features| {
                let input = ModelInput::new(&features).with_workload(workload);
                model.predict(&input, &states.state_for(model))
            });
        match prediction {
            Ok(result) => ModelOutcome::Predicted { result },
            Err(err) => ModelOutcome::Failed {
                reason: FailureReason::from(&err),
            },
        }
    }

    /// Kinds that will appear in every bundle.
    pub fn kinds(&self) -> Vec<ModelKind> {
        self.registry.kinds()
    }
}
