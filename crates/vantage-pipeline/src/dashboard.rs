//! Published per-project state and the read-only [`Dashboard`] over it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use vantage_core::models::{
    Alert, DataQualityReport, DeliveryRecord, HealthAssessment, IndicatorSeries, IndicatorSet,
    ModelKind, PortfolioSummary, PredictionBundle,
};
use vantage_core::traits::IDashboardReader;
use vantage_indicators::{summarize_portfolio, PortfolioEntry};

/// Everything one completed cycle produced for a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectView {
    pub project_id: String,
    pub cycle_id: String,
    pub as_of: DateTime<Utc>,
    pub series: IndicatorSeries,
    pub indicators: IndicatorSet,
    pub prediction: PredictionBundle,
    pub health: HealthAssessment,
    pub quality: DataQualityReport,
    /// Active alerts at publication, most severe first.
    pub active_alerts: Vec<Alert>,
    pub deliveries: Vec<DeliveryRecord>,
}

/// Latest published [`ProjectView`] per project.
///
/// A view is replaced by one `Arc` swap, so readers see either the previous cycle
/// or the new one in full.
#[derive(Debug, Default)]
pub struct Dashboard {
    views: DashMap<String, Arc<ProjectView>>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn publish(&self, view: ProjectView) {
        self.views.insert(view.project_id.clone(), Arc::new(view));
    }

    pub fn view(&self, project_id: &str) -> Option<Arc<ProjectView>> {
        self.views.get(project_id).map(|v| Arc::clone(v.value()))
    }

    /// Published projects, sorted.
    pub fn projects(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.views.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    pub fn data_quality(&self, project_id: &str) -> Option<DataQualityReport> {
        self.view(project_id).map(|v| v.quality.clone())
    }
}

impl IDashboardReader for Dashboard {
    fn latest_indicators(&self, project_id: &str) -> Option<IndicatorSet> {
        self.view(project_id).map(|v| v.indicators.clone())
    }

    fn latest_prediction(&self, project_id: &str) -> Option<PredictionBundle> {
        self.view(project_id).map(|v| v.prediction.clone())
    }

    fn active_alerts(&self, project_id: &str) -> Vec<Alert> {
        self.view(project_id)
            .map(|v| v.active_alerts.clone())
            .unwrap_or_default()
    }

    fn latest_health(&self, project_id: &str) -> Option<HealthAssessment> {
        self.view(project_id).map(|v| v.health.clone())
    }

    fn portfolio_summary(&self) -> PortfolioSummary {
        let views: Vec<Arc<ProjectView>> =
            self.views.iter().map(|e| Arc::clone(e.value())).collect();
        summarize_portfolio(views.iter().map(|v| PortfolioEntry {
            indicators: &v.indicators,
            health: Some(&v.health),
            risk_score: v
                .prediction
                .prediction(&ModelKind::RISK)
                .map(|p| p.point_estimate),
        }))
    }
}
