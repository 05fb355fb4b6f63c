//! Structured log events for cycle-level transitions.

/// A cycle published its results.
pub fn cycle_completed(
    project_id: &str,
    cycle_id: &str,
    raised: usize,
    resolved: usize,
    model_failures: usize,
    elapsed_ms: u64,
) {
    tracing::info!(
        event = "cycle_completed",
        project_id = %project_id,
        cycle_id = %cycle_id,
        raised = raised,
        resolved = resolved,
        model_failures = model_failures,
        elapsed_ms = elapsed_ms,
        "cycle completed"
    );
}

/// A cycle stopped before publishing.
pub fn cycle_cancelled(project_id: &str, cycle_id: &str, step: &str) {
    tracing::info!(
        event = "cycle_cancelled",
        project_id = %project_id,
        cycle_id = %cycle_id,
        step = %step,
        "cycle cancelled"
    );
}

pub fn cycle_failed(project_id: &str, cycle_id: &str, error: &str) {
    tracing::warn!(
        event = "cycle_failed",
        project_id = %project_id,
        cycle_id = %cycle_id,
        error = %error,
        "cycle failed"
    );
}

/// A dispatcher rejected an alert. Never retried.
pub fn delivery_failed(alert_id: &str, reason: &str) {
    tracing::warn!(
        event = "delivery_failed",
        alert_id = %alert_id,
        reason = %reason,
        "alert delivery failed"
    );
}
