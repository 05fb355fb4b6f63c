//! Small numeric helpers shared by extractors and models.

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n − 1), `None` below two values.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Holt double exponential smoothing. Returns the one-step-ahead forecast
/// `level + trend` after consuming every value.
pub fn holt_forecast(values: &[f64], alpha: f64, beta: f64) -> Option<f64> {
    let (&first, rest) = values.split_first()?;
    let mut level = first;
    let mut trend = match rest.first() {
        Some(&second) => second - first,
        None => 0.0,
    };
    for &value in rest {
        let previous_level = level;
        level = alpha * value + (1.0 - alpha) * (level + trend);
        trend = beta * (level - previous_level) + (1.0 - beta) * trend;
    }
    Some(level + trend)
}

/// Linear-interpolated percentile of an ascending slice, `p` in [0, 1].
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let rank = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}
