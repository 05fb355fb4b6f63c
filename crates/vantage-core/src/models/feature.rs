use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Measure;
use crate::errors::{VantageError, VantageResult};

/// One named feature value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
    pub value: Measure,
}

/// Fixed-order feature vector built from one project's indicator history.
///
/// Length and ordering always equal the declaring schema. Features without enough
/// history carry an `InsufficientHistory` marker instead of a zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub project_id: String,
    pub as_of: DateTime<Utc>,
    pub schema_name: String,
    pub schema_version: u32,
    pub features: Vec<Feature>,
}

impl FeatureVector {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.features.iter().map(|f| f.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&Measure> {
        self.features
            .iter()
            .find(|f| f.name == name)
            .map(|f| &f.value)
    }

    /// The defined value of `name`, or `DataInsufficiency` naming the marker.
    pub fn value(&self, name: &str) -> VantageResult<f64> {
        match self.get(name) {
            Some(Measure::Defined { value }) => Ok(*value),
            Some(Measure::Undefined { reason }) => Err(VantageError::insufficient(
                format!("feature {name}"),
                reason.to_string(),
            )),
            None => Err(VantageError::insufficient(
                format!("feature {name}"),
                format!("not declared by schema {}", self.schema_name),
            )),
        }
    }

    /// Whether every feature is defined.
    pub fn is_complete(&self) -> bool {
        self.features.iter().all(|f| f.value.is_defined())
    }

    /// Names of features carrying an undefined marker.
    pub fn missing(&self) -> Vec<&str> {
        self.features
            .iter()
            .filter(|f| !f.value.is_defined())
            .map(|f| f.name.as_str())
            .collect()
    }

    /// All values in schema order. Fails if any feature is undefined.
    pub fn dense(&self) -> VantageResult<Vec<f64>> {
        let missing = self.missing();
        if !missing.is_empty() {
            return Err(VantageError::insufficient(
                format!("schema {}", self.schema_name),
                format!("undefined features: {}", missing.join(", ")),
            ));
        }
        Ok(self.features.iter().filter_map(|f| f.value.value()).collect())
    }
}
