use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::errors::VantageResult;
use crate::models::{ProjectSnapshot, Workload};

/// Read interface of the external project record store.
///
/// Implementations may block; the caller supplies the timeout.
pub trait IProjectRecordStore: Send + Sync {
    /// Snapshots with `from <= timestamp <= to`, ascending by timestamp.
    /// Gaps between snapshots are allowed.
    fn fetch_history(
        &self,
        project_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        timeout: Duration,
    ) -> VantageResult<Vec<ProjectSnapshot>>;

    /// Open tasks and available resources, if the store tracks them.
    fn fetch_workload(
        &self,
        _project_id: &str,
        _as_of: DateTime<Utc>,
        _timeout: Duration,
    ) -> VantageResult<Option<Workload>> {
        Ok(None)
    }
}
