//! Built-in feature extractors.

use std::fmt;
use std::sync::Arc;

use vantage_core::constants::SECONDS_PER_DAY;
use vantage_core::models::{IndicatorField, IndicatorSet, Measure};
use vantage_indicators::trend;

use crate::stats;

/// Signature of a custom extractor. Receives the history at or before `as_of`,
/// ascending, already checked against the declared window.
pub type CustomFn = Arc<dyn Fn(&[IndicatorSet]) -> Measure + Send + Sync>;

/// How one feature is derived from an indicator history.
#[derive(Clone)]
pub enum Extractor {
    /// Value of `field` at the latest point.
    Latest(IndicatorField),
    /// Least-squares slope per day over the last `window` points.
    Trend { field: IndicatorField, window: usize },
    /// Sample standard deviation over the last `window` points.
    Volatility { field: IndicatorField, window: usize },
    /// Mean over the last `window` points.
    Mean { field: IndicatorField, window: usize },
    /// Last minus first over the last `window` points.
    Change { field: IndicatorField, window: usize },
    /// Change per elapsed day over the last `window` points.
    Rate { field: IndicatorField, window: usize },
    /// Holt-smoothed one-step forecast over the last `window` points.
    Smoothed {
        field: IndicatorField,
        window: usize,
        alpha: f64,
        beta: f64,
    },
    /// Arbitrary closure with a declared window.
    Custom { window: usize, func: CustomFn },
}

impl Extractor {
    pub fn custom(
        window: usize,
        func: impl Fn(&[IndicatorSet]) -> Measure + Send + Sync + 'static,
    ) -> Self {
        Self::Custom {
            window,
            func: Arc::new(func),
        }
    }

    /// Number of history points the extractor needs.
    pub fn window(&self) -> usize {
        match self {
            Self::Latest(_) => 1,
            Self::Trend { window, .. }
            | Self::Volatility { window, .. }
            | Self::Change { window, .. }
            | Self::Rate { window, .. } => (*window).max(2),
            Self::Mean { window, .. } | Self::Smoothed { window, .. } => (*window).max(1),
            Self::Custom { window, .. } => *window,
        }
    }

    /// Conventional feature name: `<field>_<stat>_<window>`, or the field's short
    /// name for [`Extractor::Latest`]. `None` for custom extractors.
    pub fn default_name(&self) -> Option<String> {
        let (field, stat) = match self {
            Self::Latest(field) => return Some(field.short_name().to_string()),
            Self::Trend { field, .. } => (field, "trend"),
            Self::Volatility { field, .. } => (field, "volatility"),
            Self::Mean { field, .. } => (field, "mean"),
            Self::Change { field, .. } => (field, "change"),
            Self::Rate { field, .. } => (field, "rate"),
            Self::Smoothed { field, .. } => (field, "smoothed"),
            Self::Custom { .. } => return None,
        };
        Some(format!("{}_{stat}_{}", field.short_name(), self.window()))
    }

    /// Evaluate over `history` (ascending, already cut at `as_of`).
    pub fn extract(&self, history: &[IndicatorSet]) -> Measure {
        let window = self.window();
        if history.len() < window {
            return Measure::insufficient_history(window, history.len());
        }
        let tail = &history[history.len() - window..];

        match self {
            Self::Latest(field) => tail
                .last()
                .map(|s| s.field(*field))
                .unwrap_or_else(|| Measure::insufficient_history(1, 0)),
            Self::Trend { field, .. } => trend::field_slope(tail, *field, window),
            Self::Volatility { field, .. } => with_values(tail, *field, stats::sample_std_dev),
            Self::Mean { field, .. } => with_values(tail, *field, stats::mean),
            Self::Change { field, .. } => {
                with_values(tail, *field, |v| Some(v[v.len() - 1] - v[0]))
            }
            Self::Rate { field, .. } => {
                match with_values(tail, *field, |v| Some(v[v.len() - 1] - v[0])) {
                    Measure::Defined { value } => {
                        Measure::ratio(value, elapsed_days(tail), "elapsed_days")
                    }
                    undefined => undefined,
                }
            }
            Self::Smoothed {
                field, alpha, beta, ..
            } => with_values(tail, *field, |v| stats::holt_forecast(v, *alpha, *beta)),
            Self::Custom { func, .. } => func(tail),
        }
    }
}

impl fmt::Debug for Extractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest(field) => f.debug_tuple("Latest").field(field).finish(),
            Self::Custom { window, .. } => f
                .debug_struct("Custom")
                .field("window", window)
                .finish_non_exhaustive(),
            other => match other.default_name() {
                Some(name) => write!(f, "Extractor({name})"),
                None => f.write_str("Extractor"),
            },
        }
    }
}

/// Collect defined values of `field`; the first undefined one short-circuits.
fn with_values(
    sets: &[IndicatorSet],
    field: IndicatorField,
    f: impl FnOnce(&[f64]) -> Option<f64>,
) -> Measure {
    let mut values = Vec::with_capacity(sets.len());
    for set in sets {
        match set.field(field) {
            Measure::Defined { value } => values.push(value),
            undefined => return undefined,
        }
    }
    match f(&values) {
        Some(value) => Measure::from_f64(value),
        None => Measure::insufficient_history(2, values.len()),
    }
}

fn elapsed_days(sets: &[IndicatorSet]) -> f64 {
    match (sets.first(), sets.last()) {
        (Some(first), Some(last)) => {
            (last.timestamp - first.timestamp).num_milliseconds() as f64 / 1000.0
                / SECONDS_PER_DAY
        }
        _ => 0.0,
    }
}
