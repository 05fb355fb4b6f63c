//! Feature vector cache using moka.

use chrono::{DateTime, Utc};
use moka::sync::Cache;
use vantage_core::models::FeatureVector;

/// (project, as_of, schema name, schema version, history fingerprint).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeatureKey {
    pub project_id: String,
    pub as_of: DateTime<Utc>,
    pub schema_name: String,
    pub schema_version: u32,
    pub history_fingerprint: String,
}

pub struct FeatureCache {
    cache: Cache<FeatureKey, FeatureVector>,
}

impl FeatureCache {
    pub fn new(max_entries: u64) -> Self {
        Self {
            cache: Cache::builder().max_capacity(max_entries).build(),
        }
    }

    pub fn get(&self, key: &FeatureKey) -> Option<FeatureVector> {
        self.cache.get(key)
    }

    pub fn get_or_build(
        &self,
        key: FeatureKey,
        build: impl FnOnce() -> FeatureVector,
    ) -> FeatureVector {
        self.cache.get_with(key, build)
    }

    pub fn len(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}
