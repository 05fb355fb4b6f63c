use serde::{Deserialize, Serialize};

use crate::models::Severity;

/// Alert engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Presentation and delivery order, most urgent first.
    pub severity_order: Vec<Severity>,
}

impl AlertConfig {
    /// Position of `severity` in the configured order. Unlisted severities sort last.
    pub fn rank(&self, severity: Severity) -> usize {
        self.severity_order
            .iter()
            .position(|s| *s == severity)
            .unwrap_or(self.severity_order.len())
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            severity_order: vec![
                Severity::Critical,
                Severity::High,
                Severity::Medium,
                Severity::Low,
            ],
        }
    }
}
