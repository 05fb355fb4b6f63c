use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Comparator, IndicatorSet, PredictionResult};

/// Alert severity. `Ord` follows the default presentation order
/// critical > high > medium > low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        };
        f.write_str(s)
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            other => Err(format!("unknown severity '{other}'")),
        }
    }
}

/// How an alert left the active state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Re-evaluation found the condition no longer holds.
    ConditionCleared,
    /// A newer alert for the same (project, rule) replaced it after the cooldown.
    Superseded,
}

/// Snapshot of what the rule saw when it fired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertPayload {
    pub applies_to: String,
    pub comparator: Comparator,
    pub threshold: f64,
    pub observed_value: f64,
    pub indicators: IndicatorSet,
    pub prediction: Option<PredictionResult>,
}

/// A recorded rule trigger. Never deleted; only marked resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// blake3 of project_id + rule_id + cooldown window.
    pub alert_id: String,
    pub severity: Severity,
    pub rule_id: String,
    pub project_id: String,
    pub triggered_at: DateTime<Utc>,
    pub message: String,
    pub payload: AlertPayload,
    pub resolved: bool,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolution: Option<Resolution>,
}

impl Alert {
    /// Content hash used as the alert id and dedup key.
    pub fn content_id(project_id: &str, rule_id: &str, window: i64) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(project_id.as_bytes());
        hasher.update(&[0]);
        hasher.update(rule_id.as_bytes());
        hasher.update(&[0]);
        hasher.update(&window.to_le_bytes());
        hasher.finalize().to_hex().to_string()
    }

    pub fn is_active(&self) -> bool {
        !self.resolved
    }
}

/// Result of handing an alert to the notification dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeliveryOutcome {
    Delivered,
    Failed { reason: String },
}

/// Audit entry for one delivery attempt. The core never retries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryRecord {
    pub alert_id: String,
    pub attempted_at: DateTime<Utc>,
    pub outcome: DeliveryOutcome,
}
