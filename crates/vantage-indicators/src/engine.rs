//! [`IndicatorEngine`]: point-in-time indicators and ordered histories.

use tracing::{debug, instrument, warn};
use vantage_core::config::IndicatorConfig;
use vantage_core::errors::{VantageError, VantageResult};
use vantage_core::models::{IndicatorSeries, IndicatorSet, ProjectSnapshot};

use crate::cache::{IndicatorCache, IndicatorKey};
use crate::formula;
use crate::trend;

/// Computes indicators from snapshots, caching each set by
/// (project_id, timestamp, fingerprint).
pub struct IndicatorEngine {
    trend_window: usize,
    cache: IndicatorCache,
}

impl IndicatorEngine {
    pub fn new(config: &IndicatorConfig) -> Self {
        Self {
            trend_window: config.trend_window,
            cache: IndicatorCache::new(config.cache_capacity),
        }
    }

    pub fn trend_window(&self) -> usize {
        self.trend_window
    }

    pub fn cache(&self) -> &IndicatorCache {
        &self.cache
    }

    /// Indicators for one snapshot.
    pub fn compute(&self, snapshot: &ProjectSnapshot) -> IndicatorSet {
        let key = IndicatorKey {
            project_id: snapshot.project_id.clone(),
            timestamp: snapshot.timestamp,
            fingerprint: snapshot.fingerprint(),
        };
        let set = self.cache.get_or_compute(key, || formula::compute(snapshot));
        if !set.schedule_performance_index.is_defined() {
            warn!(
                project_id = %set.project_id,
                timestamp = %set.timestamp,
                reason = %set.schedule_performance_index,
                "SPI undefined"
            );
        }
        if !set.cost_performance_index.is_defined() {
            warn!(
                project_id = %set.project_id,
                timestamp = %set.timestamp,
                reason = %set.cost_performance_index,
                "CPI undefined"
            );
        }
        debug!(
            project_id = %set.project_id,
            spi = %set.schedule_performance_index,
            cpi = %set.cost_performance_index,
            "computed indicators"
        );
        set
    }

    /// Indicators for an ordered history plus the rolling trend.
    ///
    /// Input is expected ascending by timestamp; out-of-order input is stably
    /// sorted, and for duplicate timestamps the last snapshot wins.
    #[instrument(skip(self, snapshots), fields(count = snapshots.len()))]
    pub fn compute_history(
        &self,
        project_id: &str,
        snapshots: &[ProjectSnapshot],
    ) -> VantageResult<IndicatorSeries> {
        if let Some(foreign) = snapshots.iter().find(|s| s.project_id != project_id) {
            return Err(VantageError::ProjectMismatch {
                expected: project_id.to_string(),
                actual: foreign.project_id.clone(),
            });
        }

        let ordered = normalize_order(project_id, snapshots);
        let sets: Vec<IndicatorSet> = ordered.iter().map(|s| self.compute(s)).collect();
        let trend = trend::compute_trend(&sets, self.trend_window);

        Ok(IndicatorSeries {
            project_id: project_id.to_string(),
            sets,
            trend,
        })
    }
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        Self::new(&IndicatorConfig::default())
    }
}

/// Sort ascending and keep only the last snapshot per timestamp.
fn normalize_order<'a>(
    project_id: &str,
    snapshots: &'a [ProjectSnapshot],
) -> Vec<&'a ProjectSnapshot> {
    let sorted = snapshots
        .windows(2)
        .all(|w| w[0].timestamp < w[1].timestamp);
    if sorted {
        return snapshots.iter().collect();
    }

    warn!(project_id, "history not strictly ascending; reordering");
    let mut ordered: Vec<&ProjectSnapshot> = snapshots.iter().collect();
    ordered.sort_by_key(|s| s.timestamp);

    let mut deduped: Vec<&ProjectSnapshot> = Vec::with_capacity(ordered.len());
    for snapshot in ordered {
        if deduped
            .last()
            .is_some_and(|last| last.timestamp == snapshot.timestamp)
        {
            deduped.pop();
        }
        deduped.push(snapshot);
    }
    deduped
}
