use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Traffic-light project health.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HealthStatus {
    Green,
    Yellow,
    Red,
}

/// Weighted health score combining schedule, cost and risk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthAssessment {
    pub project_id: String,
    pub status: HealthStatus,
    /// 0–100.
    pub score: f64,
    pub schedule_points: f64,
    pub cost_points: f64,
    pub risk_points: f64,
    pub assessed_at: DateTime<Utc>,
}

/// Aggregate view over every published project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub total_projects: usize,
    /// Projects whose health is `Red`.
    pub at_risk_count: usize,
    pub average_spi: Option<f64>,
    pub average_cpi: Option<f64>,
    pub average_utilization: Option<f64>,
    pub average_risk_score: Option<f64>,
}

/// Completeness of a batch of snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataQualityReport {
    pub records: usize,
    /// Percentage of numeric fields that are finite and non-negative.
    pub score_pct: f64,
    pub issues: Vec<String>,
}
