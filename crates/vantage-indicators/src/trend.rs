//! Least-squares slopes over irregularly spaced points.

use chrono::{DateTime, Utc};
use vantage_core::constants::SECONDS_PER_DAY;
use vantage_core::models::{IndicatorField, IndicatorSet, IndicatorTrend, Measure};

/// Slope per day of `points` using their real timestamps.
///
/// Undefined if any point is undefined, if fewer than two points are given, or if
/// all points share one timestamp.
pub fn slope_per_day(points: &[(DateTime<Utc>, Measure)]) -> Measure {
    if points.len() < 2 {
        return Measure::insufficient_history(2, points.len());
    }
    if let Some((_, undefined)) = points.iter().find(|(_, m)| !m.is_defined()) {
        return undefined.clone();
    }

    let origin = points[0].0;
    let xs: Vec<f64> = points
        .iter()
        .map(|(t, _)| (*t - origin).num_milliseconds() as f64 / 1000.0 / SECONDS_PER_DAY)
        .collect();
    let ys: Vec<f64> = points.iter().filter_map(|(_, m)| m.value()).collect();

    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;
    let (mut sxx, mut sxy) = (0.0, 0.0);
    for (x, y) in xs.iter().zip(&ys) {
        sxx += (x - mean_x) * (x - mean_x);
        sxy += (x - mean_x) * (y - mean_y);
    }
    Measure::ratio(sxy, sxx, "time spread")
}

/// Slope of `field` over the last `window` sets.
pub fn field_slope(sets: &[IndicatorSet], field: IndicatorField, window: usize) -> Measure {
    if sets.len() < window {
        return Measure::insufficient_history(window, sets.len());
    }
    let points: Vec<_> = sets[sets.len() - window..]
        .iter()
        .map(|s| (s.timestamp, s.field(field)))
        .collect();
    slope_per_day(&points)
}

/// Rolling trend of SPI, CPI and utilization.
pub fn compute_trend(sets: &[IndicatorSet], window: usize) -> IndicatorTrend {
    IndicatorTrend {
        window,
        spi_slope: field_slope(sets, IndicatorField::SchedulePerformanceIndex, window),
        cpi_slope: field_slope(sets, IndicatorField::CostPerformanceIndex, window),
        utilization_slope: field_slope(sets, IndicatorField::ResourceUtilization, window),
    }
}
