use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Measure;

/// Performance indicators derived from exactly one [`ProjectSnapshot`](super::ProjectSnapshot).
///
/// Versioned by `timestamp`. Ratio indicators are [`Measure`]s so a zero
/// denominator is an explicit marker instead of a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub project_id: String,
    pub timestamp: DateTime<Utc>,
    /// EV / PV.
    pub schedule_performance_index: Measure,
    /// EV / AC.
    pub cost_performance_index: Measure,
    /// PV − AC. Negative means overrun.
    pub budget_variance: Measure,
    /// Raw actual_hours / planned_hours. Never clamped; see [`Self::reported_utilization`].
    pub resource_utilization: Measure,
    /// EV − PV.
    pub schedule_variance: Measure,
    /// EV − AC.
    pub cost_variance: Measure,
    /// completed / (open + completed) × 100.
    pub completion_percentage: Measure,
    /// open_tasks / team_size.
    pub staffing_ratio: Measure,
    pub planned_value: f64,
    pub earned_value: f64,
    pub actual_cost: f64,
    pub budget_at_completion: f64,
    /// Fingerprint of the snapshot this set was computed from.
    pub snapshot_fingerprint: String,
}

impl IndicatorSet {
    /// Look up one indicator by field.
    pub fn field(&self, field: IndicatorField) -> Measure {
        match field {
            IndicatorField::SchedulePerformanceIndex => self.schedule_performance_index.clone(),
            IndicatorField::CostPerformanceIndex => self.cost_performance_index.clone(),
            IndicatorField::BudgetVariance => self.budget_variance.clone(),
            IndicatorField::ResourceUtilization => self.resource_utilization.clone(),
            IndicatorField::ScheduleVariance => self.schedule_variance.clone(),
            IndicatorField::CostVariance => self.cost_variance.clone(),
            IndicatorField::CompletionPercentage => self.completion_percentage.clone(),
            IndicatorField::StaffingRatio => self.staffing_ratio.clone(),
            IndicatorField::PlannedValue => Measure::from_f64(self.planned_value),
            IndicatorField::EarnedValue => Measure::from_f64(self.earned_value),
            IndicatorField::ActualCost => Measure::from_f64(self.actual_cost),
            IndicatorField::BudgetAtCompletion => Measure::from_f64(self.budget_at_completion),
        }
    }

    /// Utilization clamped to [0, 1] for presentation.
    ///
    /// Alert rules always see the raw [`Self::resource_utilization`].
    pub fn reported_utilization(&self) -> Measure {
        self.resource_utilization.map(|u| u.clamp(0.0, 1.0))
    }
}

/// Every named field of an [`IndicatorSet`] that rules and extractors can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorField {
    SchedulePerformanceIndex,
    CostPerformanceIndex,
    BudgetVariance,
    ResourceUtilization,
    ScheduleVariance,
    CostVariance,
    CompletionPercentage,
    StaffingRatio,
    PlannedValue,
    EarnedValue,
    ActualCost,
    BudgetAtCompletion,
}

impl IndicatorField {
    pub const ALL: [IndicatorField; 12] = [
        Self::SchedulePerformanceIndex,
        Self::CostPerformanceIndex,
        Self::BudgetVariance,
        Self::ResourceUtilization,
        Self::ScheduleVariance,
        Self::CostVariance,
        Self::CompletionPercentage,
        Self::StaffingRatio,
        Self::PlannedValue,
        Self::EarnedValue,
        Self::ActualCost,
        Self::BudgetAtCompletion,
    ];

    /// Field name as it appears on [`IndicatorSet`] and in rule `applies_to`.
    pub fn name(self) -> &'static str {
        match self {
            Self::SchedulePerformanceIndex => "schedule_performance_index",
            Self::CostPerformanceIndex => "cost_performance_index",
            Self::BudgetVariance => "budget_variance",
            Self::ResourceUtilization => "resource_utilization",
            Self::ScheduleVariance => "schedule_variance",
            Self::CostVariance => "cost_variance",
            Self::CompletionPercentage => "completion_percentage",
            Self::StaffingRatio => "staffing_ratio",
            Self::PlannedValue => "planned_value",
            Self::EarnedValue => "earned_value",
            Self::ActualCost => "actual_cost",
            Self::BudgetAtCompletion => "budget_at_completion",
        }
    }

    /// Short prefix used to build feature names (`spi_trend_3`).
    pub fn short_name(self) -> &'static str {
        match self {
            Self::SchedulePerformanceIndex => "spi",
            Self::CostPerformanceIndex => "cpi",
            Self::ResourceUtilization => "utilization",
            Self::CompletionPercentage => "completion",
            other => other.name(),
        }
    }
}

impl fmt::Display for IndicatorField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IndicatorField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.name() == s || f.short_name() == s)
            .ok_or_else(|| format!("unknown indicator field '{s}'"))
    }
}

/// Rolling trend of the headline indices over the last `window` points.
///
/// Slopes are per day, computed by least squares on real timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorTrend {
    pub window: usize,
    pub spi_slope: Measure,
    pub cpi_slope: Measure,
    pub utilization_slope: Measure,
}

/// Ordered indicator history for one project plus its rolling trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSeries {
    pub project_id: String,
    /// Ascending by timestamp.
    pub sets: Vec<IndicatorSet>,
    pub trend: IndicatorTrend,
}

impl IndicatorSeries {
    pub fn latest(&self) -> Option<&IndicatorSet> {
        self.sets.last()
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}
