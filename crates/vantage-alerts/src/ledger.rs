//! Append-only alert store.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use vantage_core::models::{Alert, Resolution};

/// Every alert ever raised, keyed by `alert_id`. Alerts are never removed; only
/// their resolution fields change.
#[derive(Debug, Default)]
pub struct AlertLedger {
    alerts: DashMap<String, Alert>,
}

impl AlertLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `alert` unless its id is already present. Returns whether it was new.
    pub fn insert(&self, alert: Alert) -> bool {
        match self.alerts.entry(alert.alert_id.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => false,
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(alert);
                true
            }
        }
    }

    pub fn contains(&self, alert_id: &str) -> bool {
        self.alerts.contains_key(alert_id)
    }

    pub fn get(&self, alert_id: &str) -> Option<Alert> {
        self.alerts.get(alert_id).map(|a| a.clone())
    }

    /// Mark an active alert resolved. No-op for unknown or already resolved ids.
    pub fn resolve(&self, alert_id: &str, at: DateTime<Utc>, resolution: Resolution) -> bool {
        match self.alerts.get_mut(alert_id) {
            Some(mut alert) if !alert.resolved => {
                alert.resolved = true;
                alert.resolved_at = Some(at);
                alert.resolution = Some(resolution);
                true
            }
            _ => false,
        }
    }

    /// Active alerts for one project, oldest first.
    pub fn active_for(&self, project_id: &str) -> Vec<Alert> {
        self.collect(|a| a.project_id == project_id && a.is_active())
    }

    /// Full history for one project, oldest first.
    pub fn history_for(&self, project_id: &str) -> Vec<Alert> {
        self.collect(|a| a.project_id == project_id)
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    fn collect(&self, keep: impl Fn(&Alert) -> bool) -> Vec<Alert> {
        let mut out: Vec<Alert> = self
            .alerts
            .iter()
            .filter(|entry| keep(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        out.sort_by(|a, b| {
            a.triggered_at
                .cmp(&b.triggered_at)
                .then_with(|| a.rule_id.cmp(&b.rule_id))
        });
        out
    }
}
