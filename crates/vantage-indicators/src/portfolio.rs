use vantage_core::models::{HealthAssessment, HealthStatus, IndicatorSet, PortfolioSummary};

/// One project's latest published state, as seen by the portfolio rollup.
pub struct PortfolioEntry<'a> {
    pub indicators: &'a IndicatorSet,
    pub health: Option<&'a HealthAssessment>,
    pub risk_score: Option<f64>,
}

/// Aggregate over projects. Averages skip undefined values and are `None` when no
/// project has a defined value.
pub fn summarize_portfolio<'a>(
    entries: impl IntoIterator<Item = PortfolioEntry<'a>>,
) -> PortfolioSummary {
    let mut summary = PortfolioSummary::default();
    let (mut spi, mut cpi, mut util, mut risk) = (Vec::new(), Vec::new(), Vec::new(), Vec::new());

    for entry in entries {
        summary.total_projects += 1;
        if entry.health.is_some_and(|h| h.status == HealthStatus::Red) {
            summary.at_risk_count += 1;
        }
        spi.extend(entry.indicators.schedule_performance_index.value());
        cpi.extend(entry.indicators.cost_performance_index.value());
        util.extend(entry.indicators.resource_utilization.value());
        risk.extend(entry.risk_score.filter(|r| r.is_finite()));
    }

    summary.average_spi = mean(&spi);
    summary.average_cpi = mean(&cpi);
    summary.average_utilization = mean(&util);
    summary.average_risk_score = mean(&risk);
    summary
}

fn mean(values: &[f64]) -> Option<f64> {
    (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
}
