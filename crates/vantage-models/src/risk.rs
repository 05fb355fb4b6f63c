//! Logistic risk score in [0, 100].
//!
//! Inputs are shortfalls against plan: `1 − SPI`, `1 − CPI` (floored at zero),
//! utilization above 100% and CPI volatility. A project on plan with steady costs
//! sits at `100 · σ(bias)`.

use tracing::debug;
use vantage_core::config::RiskConfig;
use vantage_core::constants::MAX_RISK_SCORE;
use vantage_core::errors::{ModelError, VantageResult};
use vantage_core::models::{
    FeatureVector, IndicatorField, ModelKind, PredictionDetails, PredictionResult,
};
use vantage_features::{Extractor, FeatureSchema};

use crate::state::FittedState;
use crate::traits::{expect_schema, IPredictiveModel, ModelInput, TrainingExample};

pub const SCHEMA_NAME: &str = "risk";
pub const SCHEMA_VERSION: u32 = 1;

const WEIGHTS: [&str; 4] = ["w_schedule_gap", "w_cost_gap", "w_overload", "w_cost_volatility"];
const DEFAULT_WEIGHTS: [f64; 4] = [4.0, 4.0, 2.0, 3.0];
const DEFAULT_BIAS: f64 = -2.0;

pub struct RiskScorer {
    config: RiskConfig,
    schema: FeatureSchema,
}

impl RiskScorer {
    pub fn new(config: RiskConfig) -> Self {
        let schema = FeatureSchema::new(SCHEMA_NAME, SCHEMA_VERSION)
            .with(Extractor::Latest(IndicatorField::SchedulePerformanceIndex))
            .with(Extractor::Latest(IndicatorField::CostPerformanceIndex))
            .with(Extractor::Latest(IndicatorField::ResourceUtilization))
            .with(Extractor::Volatility {
                field: IndicatorField::CostPerformanceIndex,
                window: 2,
            });
        Self { config, schema }
    }

    fn logit(&self, x: &[f64; 4], state: &FittedState) -> VantageResult<f64> {
        let mut z = state.param("bias")?;
        for (name, value) in WEIGHTS.iter().zip(x) {
            z += state.param(name)? * value;
        }
        Ok(z)
    }
}

impl Default for RiskScorer {
    fn default() -> Self {
        Self::new(RiskConfig::default())
    }
}

/// `[schedule gap, cost gap, overload, cost volatility]`.
fn inputs(features: &FeatureVector) -> VantageResult<[f64; 4]> {
    Ok([
        (1.0 - features.value("spi")?).max(0.0),
        (1.0 - features.value("cpi")?).max(0.0),
        (features.value("utilization")? - 1.0).max(0.0),
        features.value("cpi_volatility_2")?,
    ])
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl IPredictiveModel for RiskScorer {
    fn kind(&self) -> ModelKind {
        ModelKind::RISK
    }

    fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    fn prior(&self) -> FittedState {
        WEIGHTS
            .iter()
            .zip(DEFAULT_WEIGHTS)
            .fold(
                FittedState::new(ModelKind::RISK).with_param("bias", DEFAULT_BIAS),
                |state, (name, w)| state.with_param(name, w),
            )
    }

    /// Batch gradient descent on log-loss, starting from the prior. Targets are
    /// outcome probabilities in [0, 1]; values above 1 are read as 0–100 scores.
    fn fit(&self, examples: &[TrainingExample]) -> VantageResult<FittedState> {
        let mut data = Vec::with_capacity(examples.len());
        for example in examples {
            expect_schema(&self.kind(), &self.schema, &example.features)?;
            if let Ok(x) = inputs(&example.features) {
                if example.target.is_finite() {
                    let y = if example.target > 1.0 {
                        example.target / MAX_RISK_SCORE
                    } else {
                        example.target
                    };
                    data.push((x, y.clamp(0.0, 1.0)));
                }
            }
        }
        if data.len() < 2 {
            return Err(ModelError::NotEnoughExamples {
                kind: self.kind().to_string(),
                required: 2,
                available: data.len(),
            }
            .into());
        }

        let mut bias = DEFAULT_BIAS;
        let mut weights = DEFAULT_WEIGHTS;
        let n = data.len() as f64;
        for _ in 0..self.config.iterations {
            let mut grad_bias = 0.0;
            let mut grad = [0.0; 4];
            for (x, y) in &data {
                let z = bias + weights.iter().zip(x).map(|(w, v)| w * v).sum::<f64>();
                let err = sigmoid(z) - y;
                grad_bias += err;
                for (g, v) in grad.iter_mut().zip(x) {
                    *g += err * v;
                }
            }
            bias -= self.config.learning_rate * grad_bias / n;
            for (w, g) in weights.iter_mut().zip(grad) {
                *w -= self.config.learning_rate * g / n;
            }
        }

        let mut state = FittedState::new(self.kind()).with_param("bias", bias);
        for (name, w) in WEIGHTS.iter().zip(weights) {
            state = state.with_param(name, w);
        }
        let residuals: Vec<f64> = data
            .iter()
            .map(|(x, y)| {
                let z = bias + weights.iter().zip(x).map(|(w, v)| w * v).sum::<f64>();
                y - sigmoid(z)
            })
            .collect();
        debug!(samples = data.len(), bias, "fitted risk model");
        state.residuals = residuals;
        state.sample_count = data.len();
        Ok(state)
    }

    fn predict(
        &self,
        input: &ModelInput<'_>,
        state: &FittedState,
    ) -> VantageResult<PredictionResult> {
        let features = input.features;
        expect_schema(&self.kind(), &self.schema, features)?;
        let z = self.logit(&inputs(features)?, state)?;
        let probability = sigmoid(z);
        let score = MAX_RISK_SCORE * probability;
        let margin = self.config.interval_margin;

        Ok(PredictionResult {
            model_kind: self.kind(),
            project_id: features.project_id.clone(),
            point_estimate: score,
            lower_bound: MAX_RISK_SCORE * sigmoid(z - margin),
            upper_bound: MAX_RISK_SCORE * sigmoid(z + margin),
            confidence: ((probability - 0.5).abs() * 2.0).clamp(0.0, 1.0),
            generated_at: features.as_of,
            details: PredictionDetails::Risk {
                category: self.config.bands.categorize(score),
            },
        })
    }
}
