//! Fitted model parameters as an open, serializable bag.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use vantage_core::errors::{ModelError, VantageResult};
use vantage_core::models::ModelKind;

use crate::traits::IPredictiveModel;

/// Parameters learned by one model kind.
///
/// `sample_count == 0` marks an untrained prior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedState {
    pub kind: ModelKind,
    pub parameters: BTreeMap<String, f64>,
    /// Training residuals, in whatever unit the model defines.
    #[serde(default)]
    pub residuals: Vec<f64>,
    pub sample_count: usize,
}

impl FittedState {
    pub fn new(kind: ModelKind) -> Self {
        Self {
            kind,
            parameters: BTreeMap::new(),
            residuals: Vec::new(),
            sample_count: 0,
        }
    }

    pub fn with_param(mut self, name: &str, value: f64) -> Self {
        self.parameters.insert(name.to_string(), value);
        self
    }

    pub fn is_prior(&self) -> bool {
        self.sample_count == 0
    }

    pub fn param(&self, name: &str) -> VantageResult<f64> {
        self.parameters.get(name).copied().ok_or_else(|| {
            ModelError::MissingParameter {
                kind: self.kind.to_string(),
                parameter: name.to_string(),
            }
            .into()
        })
    }

    pub fn param_or(&self, name: &str, default: f64) -> f64 {
        self.parameters.get(name).copied().unwrap_or(default)
    }
}

/// One fitted state per model kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FittedStates {
    states: BTreeMap<ModelKind, FittedState>,
}

impl FittedStates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, state: FittedState) {
        self.states.insert(state.kind.clone(), state);
    }

    pub fn get(&self, kind: &ModelKind) -> Option<&FittedState> {
        self.states.get(kind)
    }

    /// The fitted state for `model`, or its prior when none was trained.
    pub fn state_for(&self, model: &dyn IPredictiveModel) -> FittedState {
        self.states
            .get(&model.kind())
            .cloned()
            .unwrap_or_else(|| model.prior())
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn to_json(&self) -> VantageResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> VantageResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
