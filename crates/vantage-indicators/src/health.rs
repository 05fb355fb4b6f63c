//! Traffic-light health: schedule 40 points, cost 40 points, risk 20 points.

use chrono::{DateTime, Utc};
use vantage_core::config::HealthThresholds;
use vantage_core::constants::MAX_RISK_SCORE;
use vantage_core::models::{HealthAssessment, HealthStatus, IndicatorSet};

const SCHEDULE_WEIGHT: f64 = 40.0;
const COST_WEIGHT: f64 = 40.0;
const RISK_WEIGHT: f64 = 20.0;
const PARTIAL_POINTS: f64 = 25.0;
const MINIMAL_POINTS: f64 = 10.0;

/// Maps indicators and an optional risk score to a [`HealthAssessment`].
#[derive(Debug, Clone, Default)]
pub struct HealthAssessor {
    thresholds: HealthThresholds,
}

impl HealthAssessor {
    pub fn new(thresholds: HealthThresholds) -> Self {
        Self { thresholds }
    }

    /// Undefined indices earn no points. Without a risk score the risk component
    /// earns no points either.
    pub fn assess(
        &self,
        indicators: &IndicatorSet,
        risk_score: Option<f64>,
        assessed_at: DateTime<Utc>,
    ) -> HealthAssessment {
        let t = &self.thresholds;
        let schedule_points = indicators
            .schedule_performance_index
            .value()
            .map(|spi| index_points(spi, SCHEDULE_WEIGHT, t.schedule_yellow, t.schedule_red))
            .unwrap_or(0.0);
        let cost_points = indicators
            .cost_performance_index
            .value()
            .map(|cpi| index_points(cpi, COST_WEIGHT, t.cost_yellow, t.cost_red))
            .unwrap_or(0.0);
        let risk_points = risk_score
            .filter(|r| r.is_finite())
            .map(|r| (RISK_WEIGHT * (1.0 - r / MAX_RISK_SCORE)).max(0.0))
            .unwrap_or(0.0);

        let score = schedule_points + cost_points + risk_points;
        let status = if score >= t.green_min_score {
            HealthStatus::Green
        } else if score >= t.yellow_min_score {
            HealthStatus::Yellow
        } else {
            HealthStatus::Red
        };

        HealthAssessment {
            project_id: indicators.project_id.clone(),
            status,
            score,
            schedule_points,
            cost_points,
            risk_points,
            assessed_at,
        }
    }
}

fn index_points(index: f64, full: f64, yellow: f64, red: f64) -> f64 {
    if index >= 1.0 {
        full
    } else if index >= yellow {
        PARTIAL_POINTS
    } else if index >= red {
        MINIMAL_POINTS
    } else {
        0.0
    }
}
