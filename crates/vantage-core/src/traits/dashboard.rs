use crate::models::{Alert, HealthAssessment, IndicatorSet, PortfolioSummary, PredictionBundle};

/// Read-only view of published core state for presentation layers.
///
/// Every method returns an owned snapshot; nothing handed out can write back into
/// the core.
pub trait IDashboardReader: Send + Sync {
    fn latest_indicators(&self, project_id: &str) -> Option<IndicatorSet>;
    fn latest_prediction(&self, project_id: &str) -> Option<PredictionBundle>;
    fn active_alerts(&self, project_id: &str) -> Vec<Alert>;
    fn latest_health(&self, project_id: &str) -> Option<HealthAssessment>;
    fn portfolio_summary(&self) -> PortfolioSummary;
}
