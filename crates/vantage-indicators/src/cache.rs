//! Indicator cache using moka.
//!
//! Keyed by (project_id, timestamp, snapshot fingerprint). Values are deterministic,
//! so concurrent writers for one key are idempotent.

use chrono::{DateTime, Utc};
use moka::sync::Cache;
use vantage_core::models::IndicatorSet;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndicatorKey {
    pub project_id: String,
    pub timestamp: DateTime<Utc>,
    pub fingerprint: String,
}

/// Bounded concurrent cache of computed indicator sets.
pub struct IndicatorCache {
    cache: Cache<IndicatorKey, IndicatorSet>,
}

impl IndicatorCache {
    pub fn new(max_entries: u64) -> Self {
        Self {
            cache: Cache::builder().max_capacity(max_entries).build(),
        }
    }

    pub fn get(&self, key: &IndicatorKey) -> Option<IndicatorSet> {
        self.cache.get(key)
    }

    /// Return the cached set for `key`, computing and inserting it at most once.
    pub fn get_or_compute(
        &self,
        key: IndicatorKey,
        compute: impl FnOnce() -> IndicatorSet,
    ) -> IndicatorSet {
        self.cache.get_with(key, compute)
    }

    pub fn len(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry for one project.
    pub fn invalidate_project(&self, project_id: &str) {
        let owned = project_id.to_string();
        // invalidate_entries_if needs support_invalidation_closures; walk instead.
        let keys: Vec<_> = self
            .cache
            .iter()
            .filter(|(k, _)| k.project_id == owned)
            .map(|(k, _)| (*k).clone())
            .collect();
        for key in keys {
            self.cache.invalidate(&key);
        }
    }

    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}
