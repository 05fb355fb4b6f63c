//! [`InMemoryRecordStore`]: a concurrent in-process record store.

use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::debug;
use vantage_core::errors::{StoreError, VantageResult};
use vantage_core::models::{ProjectSnapshot, Workload};
use vantage_core::traits::IProjectRecordStore;

/// Snapshots and workloads held in memory, keyed by project.
///
/// Each project's history is kept ascending by timestamp. Inserting a snapshot for
/// an existing timestamp replaces it, which is how revisions are modelled.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    history: DashMap<String, Vec<ProjectSnapshot>>,
    workloads: DashMap<String, Workload>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, snapshot: ProjectSnapshot) {
        let mut rows = self.history.entry(snapshot.project_id.clone()).or_default();
        match rows.binary_search_by_key(&snapshot.timestamp, |s| s.timestamp) {
            Ok(i) => rows[i] = snapshot,
            Err(i) => rows.insert(i, snapshot),
        }
    }

    pub fn extend(&self, snapshots: impl IntoIterator<Item = ProjectSnapshot>) {
        for snapshot in snapshots {
            self.insert(snapshot);
        }
    }

    pub fn set_workload(&self, project_id: impl Into<String>, workload: Workload) {
        self.workloads.insert(project_id.into(), workload);
    }

    /// Known projects, sorted.
    pub fn project_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.history.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    pub fn snapshot_count(&self, project_id: &str) -> usize {
        self.history.get(project_id).map_or(0, |rows| rows.len())
    }
}

impl IProjectRecordStore for InMemoryRecordStore {
    fn fetch_history(
        &self,
        project_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        _timeout: Duration,
    ) -> VantageResult<Vec<ProjectSnapshot>> {
        let rows = self
            .history
            .get(project_id)
            .ok_or_else(|| StoreError::ProjectNotFound {
                project_id: project_id.to_string(),
            })?;
        let window: Vec<ProjectSnapshot> = rows
            .iter()
            .filter(|s| s.timestamp >= from && s.timestamp <= to)
            .cloned()
            .collect();
        debug!(project_id, rows = window.len(), "served history");
        Ok(window)
    }

    fn fetch_workload(
        &self,
        project_id: &str,
        _as_of: DateTime<Utc>,
        _timeout: Duration,
    ) -> VantageResult<Option<Workload>> {
        Ok(self.workloads.get(project_id).map(|w| w.clone()))
    }
}
