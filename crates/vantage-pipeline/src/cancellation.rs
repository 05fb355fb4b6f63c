//! Cooperative cancellation for evaluation cycles.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use vantage_core::errors::{VantageError, VantageResult};

/// Shared flag checked between cycle steps. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Clear the flag for reuse.
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::SeqCst);
    }

    /// `Err(Cancelled)` naming the step that would run next.
    pub fn checkpoint(&self, project_id: &str, step: &str) -> VantageResult<()> {
        if self.is_cancelled() {
            return Err(VantageError::Cancelled {
                project_id: project_id.to_string(),
                step: step.to_string(),
            });
        }
        Ok(())
    }
}
