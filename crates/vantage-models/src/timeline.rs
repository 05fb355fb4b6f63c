//! Days-to-completion regression.
//!
//! Regresses remaining days on `[velocity_days, spi_trend_3, staffing_ratio]`.
//! `velocity_days` is remaining completion divided by the recent completion rate.
//! The untrained prior is that extrapolation alone (`days = velocity_days`).

use tracing::debug;
use vantage_core::config::TimelineConfig;
use vantage_core::errors::{ModelError, VantageResult};
use vantage_core::models::{
    IndicatorField, IndicatorSet, Measure, ModelKind, PredictionDetails, PredictionResult,
    UndefinedReason,
};
use vantage_features::stats;
use vantage_features::{Extractor, FeatureSchema};

use crate::linalg;
use crate::state::FittedState;
use crate::traits::{expect_schema, IPredictiveModel, ModelInput, TrainingExample};

pub const SCHEMA_NAME: &str = "timeline";
pub const SCHEMA_VERSION: u32 = 1;

const VELOCITY_WINDOW: usize = 3;
const COEFFICIENTS: [&str; 4] = ["intercept", "w_velocity_days", "w_spi_trend", "w_staffing_ratio"];

pub struct TimelinePredictor {
    config: TimelineConfig,
    schema: FeatureSchema,
}

impl TimelinePredictor {
    pub fn new(config: TimelineConfig) -> Self {
        let schema = FeatureSchema::new(SCHEMA_NAME, SCHEMA_VERSION)
            .with_named(
                "velocity_days",
                Extractor::custom(VELOCITY_WINDOW, velocity_days),
            )
            .with(Extractor::Trend {
                field: IndicatorField::SchedulePerformanceIndex,
                window: VELOCITY_WINDOW,
            })
            .with(Extractor::Latest(IndicatorField::StaffingRatio));
        Self { config, schema }
    }

    fn coefficients(&self, state: &FittedState) -> VantageResult<Vec<f64>> {
        COEFFICIENTS.iter().map(|name| state.param(name)).collect()
    }

    fn residual_std(&self, state: &FittedState) -> f64 {
        stats::sample_std_dev(&state.residuals).unwrap_or(self.config.prior_residual_std_days)
    }
}

impl Default for TimelinePredictor {
    fn default() -> Self {
        Self::new(TimelineConfig::default())
    }
}

impl IPredictiveModel for TimelinePredictor {
    fn kind(&self) -> ModelKind {
        ModelKind::TIMELINE
    }

    fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    fn prior(&self) -> FittedState {
        FittedState::new(ModelKind::TIMELINE)
            .with_param("intercept", 0.0)
            .with_param("w_velocity_days", 1.0)
            .with_param("w_spi_trend", 0.0)
            .with_param("w_staffing_ratio", 0.0)
            .with_param("r_squared", self.config.prior_confidence)
    }

    fn fit(&self, examples: &[TrainingExample]) -> VantageResult<FittedState> {
        let mut rows = Vec::with_capacity(examples.len());
        let mut targets = Vec::with_capacity(examples.len());
        for example in examples {
            expect_schema(&self.kind(), &self.schema, &example.features)?;
            if let (Ok(row), true) = (example.features.dense(), example.target.is_finite()) {
                rows.push(row);
                targets.push(example.target);
            }
        }

        let required = COEFFICIENTS.len();
        if rows.len() < required {
            return Err(ModelError::NotEnoughExamples {
                kind: self.kind().to_string(),
                required,
                available: rows.len(),
            }
            .into());
        }

        let coefficients = linalg::ridge_fit(&rows, &targets, self.config.ridge_lambda)
            .ok_or_else(|| ModelError::SingularSystem {
                kind: self.kind().to_string(),
            })?;
        let fitted: Vec<f64> = rows
            .iter()
            .map(|row| linalg::predict_linear(&coefficients, row))
            .collect();
        let residuals: Vec<f64> = targets.iter().zip(&fitted).map(|(y, f)| y - f).collect();
        let r_squared = linalg::r_squared(&targets, &fitted);
        debug!(samples = rows.len(), r_squared, "fitted timeline model");

        let mut state = FittedState::new(self.kind());
        for (name, value) in COEFFICIENTS.iter().zip(&coefficients) {
            state = state.with_param(name, *value);
        }
        state.residuals = residuals;
        state.sample_count = rows.len();
        Ok(state.with_param("r_squared", r_squared))
    }

    fn predict(
        &self,
        input: &ModelInput<'_>,
        state: &FittedState,
    ) -> VantageResult<PredictionResult> {
        let features = input.features;
        expect_schema(&self.kind(), &self.schema, features)?;
        let velocity_days = features.value("velocity_days")?;
        let row = features.dense()?;
        let coefficients = self.coefficients(state)?;

        let days = linalg::predict_linear(&coefficients, &row).max(0.0);
        let margin = self.config.interval_z * self.residual_std(state);
        let confidence = state
            .param_or("r_squared", self.config.prior_confidence)
            .clamp(0.0, 1.0);

        Ok(PredictionResult {
            model_kind: self.kind(),
            project_id: features.project_id.clone(),
            point_estimate: days,
            lower_bound: (days - margin).max(0.0),
            upper_bound: days + margin,
            confidence,
            generated_at: features.as_of,
            details: PredictionDetails::Timeline { velocity_days },
        })
    }
}

/// Remaining completion percentage divided by completion points per day.
///
/// A finished project needs zero days. A stalled or regressing one has no
/// meaningful extrapolation and yields a division-guard marker.
fn velocity_days(window: &[IndicatorSet]) -> Measure {
    let rate = Extractor::Rate {
        field: IndicatorField::CompletionPercentage,
        window: window.len(),
    }
    .extract(window);
    let latest = match window.last() {
        Some(set) => set.completion_percentage.clone(),
        None => return Measure::insufficient_history(VELOCITY_WINDOW, 0),
    };

    match (latest, rate) {
        (Measure::Defined { value: done }, _) if done >= 100.0 => Measure::from_f64(0.0),
        (Measure::Defined { value: done }, Measure::Defined { value: rate }) if rate > 0.0 => {
            Measure::from_f64((100.0 - done) / rate)
        }
        (Measure::Defined { .. }, Measure::Defined { .. }) => {
            Measure::undefined(UndefinedReason::DivisionGuard {
                denominator: "completion_velocity".into(),
            })
        }
        (undefined @ Measure::Undefined { .. }, _) | (_, undefined) => undefined,
    }
}
