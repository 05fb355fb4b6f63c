//! Feature schemas: an ordered, versioned list of named extractors.

use std::collections::BTreeSet;

use vantage_core::errors::{VantageError, VantageResult};

use crate::extractor::Extractor;

/// One declared feature.
#[derive(Debug, Clone)]
pub struct FeatureSpec {
    pub name: String,
    pub extractor: Extractor,
}

/// Ordered feature declarations under a name and version.
///
/// Bump `version` whenever an extractor's behavior changes; cached vectors are
/// keyed by (name, version).
#[derive(Debug, Clone)]
pub struct FeatureSchema {
    pub name: String,
    pub version: u32,
    pub features: Vec<FeatureSpec>,
}

impl FeatureSchema {
    pub fn new(name: impl Into<String>, version: u32) -> Self {
        Self {
            name: name.into(),
            version,
            features: Vec::new(),
        }
    }

    /// Append a built-in extractor under its conventional name.
    pub fn with(mut self, extractor: Extractor) -> Self {
        let name = extractor
            .default_name()
            .unwrap_or_else(|| format!("custom_{}", self.features.len()));
        self.features.push(FeatureSpec { name, extractor });
        self
    }

    /// Append an extractor under an explicit name.
    pub fn with_named(mut self, name: impl Into<String>, extractor: Extractor) -> Self {
        self.features.push(FeatureSpec {
            name: name.into(),
            extractor,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.features.iter().map(|f| f.name.as_str()).collect()
    }

    /// Largest window any extractor needs; 0 for an empty schema.
    pub fn max_window(&self) -> usize {
        self.features
            .iter()
            .map(|f| f.extractor.window())
            .max()
            .unwrap_or(0)
    }

    /// Reject duplicate or empty feature names.
    pub fn validate(&self) -> VantageResult<()> {
        let mut seen = BTreeSet::new();
        for spec in &self.features {
            if spec.name.is_empty() {
                return Err(VantageError::ConfigError(format!(
                    "schema {} v{} declares a feature with an empty name",
                    self.name, self.version
                )));
            }
            if !seen.insert(spec.name.as_str()) {
                return Err(VantageError::ConfigError(format!(
                    "schema {} v{} declares feature '{}' twice",
                    self.name, self.version, spec.name
                )));
            }
        }
        Ok(())
    }
}
