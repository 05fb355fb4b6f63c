//! Estimate-at-completion forecast with a bootstrap overrun probability.
//!
//! Two components are blended:
//! - trend: `AC + (BAC − EV) / CPI` at the latest CPI
//! - series: the same burn-rate formula at the Holt-smoothed next-step CPI
//!
//! The bootstrap RNG is seeded from `(project_id, as_of)`, so a forecast is
//! reproducible for a given feature vector.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;
use vantage_core::config::BudgetConfig;
use vantage_core::errors::{ModelError, VantageError, VantageResult};
use vantage_core::models::{
    FeatureVector, IndicatorField, ModelKind, PredictionDetails, PredictionResult,
};
use vantage_features::{stats, Extractor, FeatureSchema};

use crate::state::FittedState;
use crate::traits::{expect_schema, IPredictiveModel, ModelInput, TrainingExample};

pub const SCHEMA_NAME: &str = "budget";
pub const SCHEMA_VERSION: u32 = 1;

/// Lowest CPI a resample may take.
const CPI_FLOOR: f64 = 0.05;
/// Perturbation scale used when the observed CPI volatility is zero.
const MIN_CPI_VOLATILITY: f64 = 0.01;
const SERIES_WINDOW: usize = 2;

pub struct BudgetForecaster {
    config: BudgetConfig,
    schema: FeatureSchema,
}

/// Inputs and the two point components for one feature vector.
#[derive(Debug, Clone, Copy)]
struct Components {
    actual_cost: f64,
    remaining: f64,
    planned_budget: f64,
    cpi: f64,
    series_cpi: f64,
    volatility: f64,
    trend: f64,
    series: f64,
}

impl Components {
    fn blend(&self, weight: f64) -> f64 {
        weight * self.trend + (1.0 - weight) * self.series
    }

    /// EAC with both CPIs shifted by `shift`.
    fn perturbed(&self, weight: f64, shift: f64) -> f64 {
        let trend = self.actual_cost + self.remaining / (self.cpi + shift).max(CPI_FLOOR);
        let series = self.actual_cost + self.remaining / (self.series_cpi + shift).max(CPI_FLOOR);
        weight * trend + (1.0 - weight) * series
    }
}

impl BudgetForecaster {
    pub fn new(config: BudgetConfig) -> Self {
        let field = IndicatorField::CostPerformanceIndex;
        let schema = FeatureSchema::new(SCHEMA_NAME, SCHEMA_VERSION)
            .with(Extractor::Latest(field))
            .with(Extractor::Volatility {
                field,
                window: SERIES_WINDOW,
            })
            .with(Extractor::Smoothed {
                field,
                window: SERIES_WINDOW,
                alpha: config.smoothing_alpha,
                beta: config.smoothing_beta,
            })
            .with(Extractor::Latest(IndicatorField::ActualCost))
            .with(Extractor::Latest(IndicatorField::EarnedValue))
            .with(Extractor::Latest(IndicatorField::BudgetAtCompletion));
        Self { config, schema }
    }

    fn components(&self, features: &FeatureVector) -> VantageResult<Components> {
        let subject = format!("budget forecast for {}", features.project_id);
        let planned_budget = features.value("budget_at_completion")?;
        if planned_budget <= 0.0 {
            return Err(VantageError::insufficient(subject, "budget_at_completion is zero"));
        }
        let cpi = features.value("cpi")?;
        if cpi <= 0.0 {
            return Err(VantageError::insufficient(
                subject,
                "no value earned yet; cost performance index is zero",
            ));
        }
        let smoothed = features.value("cpi_smoothed_2")?;
        let series_cpi = if smoothed > CPI_FLOOR { smoothed } else { cpi };
        let actual_cost = features.value("actual_cost")?;
        let remaining = (planned_budget - features.value("earned_value")?).max(0.0);

        Ok(Components {
            actual_cost,
            remaining,
            planned_budget,
            cpi,
            series_cpi,
            volatility: features.value("cpi_volatility_2")?,
            trend: actual_cost + remaining / cpi,
            series: actual_cost + remaining / series_cpi,
        })
    }

    fn bootstrap(
        &self,
        features: &FeatureVector,
        parts: &Components,
        weight: f64,
        state: &FittedState,
    ) -> Vec<f64> {
        let mut rng = seeded_rng(&features.project_id, features.as_of.timestamp_micros());
        let point = parts.blend(weight);
        let scale = parts.volatility.max(MIN_CPI_VOLATILITY);
        let n = self.config.bootstrap_samples.max(1);

        let mut samples: Vec<f64> = (0..n)
            .map(|_| {
                if state.residuals.is_empty() {
                    parts.perturbed(weight, scale * standard_normal(&mut rng))
                } else {
                    let r = state.residuals[rng.gen_range(0..state.residuals.len())];
                    point * (1.0 + r)
                }
            })
            .collect();
        samples.sort_by(f64::total_cmp);
        samples
    }
}

impl Default for BudgetForecaster {
    fn default() -> Self {
        Self::new(BudgetConfig::default())
    }
}

impl IPredictiveModel for BudgetForecaster {
    fn kind(&self) -> ModelKind {
        ModelKind::BUDGET
    }

    fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    fn prior(&self) -> FittedState {
        FittedState::new(ModelKind::BUDGET).with_param("trend_weight", self.config.trend_weight)
    }

    /// Learns the blend weight by least squares on final costs and keeps relative
    /// residuals for the bootstrap.
    fn fit(&self, examples: &[TrainingExample]) -> VantageResult<FittedState> {
        let mut usable = Vec::with_capacity(examples.len());
        for example in examples {
            expect_schema(&self.kind(), &self.schema, &example.features)?;
            if let Ok(parts) = self.components(&example.features) {
                if example.target.is_finite() {
                    usable.push((parts, example.target));
                }
            }
        }
        if usable.len() < 2 {
            return Err(ModelError::NotEnoughExamples {
                kind: self.kind().to_string(),
                required: 2,
                available: usable.len(),
            }
            .into());
        }

        let (mut num, mut den) = (0.0, 0.0);
        for (parts, target) in &usable {
            let d = parts.trend - parts.series;
            num += d * (target - parts.series);
            den += d * d;
        }
        let weight = if den > f64::EPSILON {
            (num / den).clamp(0.0, 1.0)
        } else {
            self.config.trend_weight
        };

        let residuals: Vec<f64> = usable
            .iter()
            .filter_map(|(parts, target)| {
                let predicted = parts.blend(weight);
                (predicted > 0.0).then(|| (target - predicted) / predicted)
            })
            .collect();
        debug!(samples = usable.len(), weight, "fitted budget model");

        let mut state = FittedState::new(self.kind()).with_param("trend_weight", weight);
        state.residuals = residuals;
        state.sample_count = usable.len();
        Ok(state)
    }

    fn predict(
        &self,
        input: &ModelInput<'_>,
        state: &FittedState,
    ) -> VantageResult<PredictionResult> {
        let features = input.features;
        expect_schema(&self.kind(), &self.schema, features)?;
        let parts = self.components(features)?;
        let weight = state
            .param_or("trend_weight", self.config.trend_weight)
            .clamp(0.0, 1.0);
        let point = parts.blend(weight);

        let samples = self.bootstrap(features, &parts, weight, state);
        let overrun = samples.iter().filter(|&&s| s > parts.planned_budget).count();
        let overrun_probability = overrun as f64 / samples.len() as f64;
        let lower = stats::percentile(&samples, self.config.lower_percentile)
            .unwrap_or(point)
            .min(point);
        let upper = stats::percentile(&samples, self.config.upper_percentile)
            .unwrap_or(point)
            .max(point);
        let confidence = if point > 0.0 {
            (1.0 - (upper - lower) / point).clamp(0.0, 1.0)
        } else {
            0.0
        };

        Ok(PredictionResult {
            model_kind: self.kind(),
            project_id: features.project_id.clone(),
            point_estimate: point,
            lower_bound: lower,
            upper_bound: upper,
            confidence,
            generated_at: features.as_of,
            details: PredictionDetails::Budget {
                trend_component: parts.trend,
                series_component: parts.series,
                overrun_probability,
                planned_budget: parts.planned_budget,
                samples: samples.len(),
            },
        })
    }
}

fn seeded_rng(project_id: &str, as_of_micros: i64) -> StdRng {
    let mut hasher = blake3::Hasher::new();
    hasher.update(project_id.as_bytes());
    hasher.update(&as_of_micros.to_le_bytes());
    StdRng::from_seed(*hasher.finalize().as_bytes())
}

/// Box-Muller transform.
fn standard_normal(rng: &mut StdRng) -> f64 {
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}
