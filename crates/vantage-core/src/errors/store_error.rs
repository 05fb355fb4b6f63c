/// Errors raised by the external project record store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("read for project {project_id} timed out after {timeout_ms}ms")]
    Timeout { project_id: String, timeout_ms: u64 },

    #[error("record store unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("no records for project {project_id}")]
    ProjectNotFound { project_id: String },
}
