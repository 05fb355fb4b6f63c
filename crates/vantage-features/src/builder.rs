//! [`FeatureBuilder`]: schema-driven, cached feature extraction.

use chrono::{DateTime, Utc};
use tracing::{debug, instrument};
use vantage_core::config::FeatureConfig;
use vantage_core::errors::{VantageError, VantageResult};
use vantage_core::models::{Feature, FeatureVector, IndicatorSet};

use crate::cache::{FeatureCache, FeatureKey};
use crate::schema::FeatureSchema;

/// Builds feature vectors from indicator histories.
///
/// Safe to share across threads; concurrent builds of the same key return equal
/// vectors.
pub struct FeatureBuilder {
    cache: FeatureCache,
}

impl FeatureBuilder {
    pub fn new(config: &FeatureConfig) -> Self {
        Self {
            cache: FeatureCache::new(config.cache_capacity),
        }
    }

    pub fn cache(&self) -> &FeatureCache {
        &self.cache
    }

    /// Build `schema`'s vector from `history` (ascending) as of `as_of`.
    ///
    /// Points after `as_of` are ignored. Fails only when `history` holds another
    /// project's sets.
    #[instrument(skip(self, history, schema), fields(schema = %schema.name, version = schema.version))]
    pub fn build(
        &self,
        project_id: &str,
        history: &[IndicatorSet],
        as_of: DateTime<Utc>,
        schema: &FeatureSchema,
    ) -> VantageResult<FeatureVector> {
        if let Some(foreign) = history.iter().find(|s| s.project_id != project_id) {
            return Err(VantageError::ProjectMismatch {
                expected: project_id.to_string(),
                actual: foreign.project_id.clone(),
            });
        }

        let visible = &history[..history.partition_point(|s| s.timestamp <= as_of)];
        let key = FeatureKey {
            project_id: project_id.to_string(),
            as_of,
            schema_name: schema.name.clone(),
            schema_version: schema.version,
            history_fingerprint: history_fingerprint(visible),
        };

        let vector = self
            .cache
            .get_or_build(key, || extract_all(project_id, visible, as_of, schema));
        debug!(
            project_id,
            points = visible.len(),
            missing = vector.missing().len(),
            "built feature vector"
        );
        Ok(vector)
    }
}

impl Default for FeatureBuilder {
    fn default() -> Self {
        Self::new(&FeatureConfig::default())
    }
}

fn extract_all(
    project_id: &str,
    visible: &[IndicatorSet],
    as_of: DateTime<Utc>,
    schema: &FeatureSchema,
) -> FeatureVector {
    let features = schema
        .features
        .iter()
        .map(|spec| Feature {
            name: spec.name.clone(),
            value: spec.extractor.extract(visible),
        })
        .collect();
    FeatureVector {
        project_id: project_id.to_string(),
        as_of,
        schema_name: schema.name.clone(),
        schema_version: schema.version,
        features,
    }
}

/// blake3 over the snapshot fingerprints of the visible history.
fn history_fingerprint(sets: &[IndicatorSet]) -> String {
    let mut hasher = blake3::Hasher::new();
    for set in sets {
        hasher.update(set.snapshot_fingerprint.as_bytes());
        hasher.update(b"\n");
    }
    hasher.finalize().to_hex().to_string()
}
