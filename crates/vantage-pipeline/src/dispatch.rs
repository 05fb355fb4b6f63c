//! Reference [`INotificationDispatcher`] implementations.

use std::collections::BTreeSet;
use std::sync::Mutex;
use std::time::Duration;

use tracing::info;
use vantage_core::errors::{VantageError, VantageResult};
use vantage_core::models::Alert;
use vantage_core::traits::INotificationDispatcher;

/// Keeps every alert it accepts. Can be told to reject all sends, or sends for
/// particular rules.
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    sent: Mutex<Vec<Alert>>,
    reject_all: bool,
    reject_rules: BTreeSet<String>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A dispatcher whose every send fails.
    pub fn failing() -> Self {
        Self {
            reject_all: true,
            ..Self::default()
        }
    }

    pub fn rejecting_rule(mut self, rule_id: impl Into<String>) -> Self {
        self.reject_rules.insert(rule_id.into());
        self
    }

    /// Alerts accepted so far, in send order.
    pub fn sent(&self) -> Vec<Alert> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl INotificationDispatcher for RecordingDispatcher {
    fn send(&self, alert: &Alert, _timeout: Duration) -> VantageResult<()> {
        if self.reject_all || self.reject_rules.contains(&alert.rule_id) {
            return Err(VantageError::DeliveryFailure {
                alert_id: alert.alert_id.clone(),
                reason: "channel rejected the alert".to_string(),
            });
        }
        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(alert.clone());
        Ok(())
    }
}

/// Writes each alert as a structured `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDispatcher;

impl INotificationDispatcher for TracingDispatcher {
    fn send(&self, alert: &Alert, _timeout: Duration) -> VantageResult<()> {
        info!(
            event = "alert_dispatched",
            alert_id = %alert.alert_id,
            project_id = %alert.project_id,
            rule_id = %alert.rule_id,
            severity = %alert.severity,
            message = %alert.message,
            "alert"
        );
        Ok(())
    }
}
