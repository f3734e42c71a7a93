//! Value-axis bounds from the combined history and forecast distribution.

use crate::core::{AnomalyFlag, ReconciledCurve, TimeSeries, Viewport};
use crate::error::{ReconcileError, Result};
use crate::utils::stats::{count_distinct, rank_bounds, sorted};
use std::collections::HashSet;
use tracing::debug;

/// Configuration for the viewport optimizer.
#[derive(Debug, Clone)]
pub struct ViewportConfig {
    /// Share of the value pool the bounds must cover, in (0, 1).
    pub confidence: f64,
    /// Padding added to each side as a fraction of the covered range.
    pub padding_fraction: f64,
    /// Leave anomaly-flagged history points out of the pool.
    pub exclude_anomalies: bool,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            confidence: 0.95,
            padding_fraction: 0.05,
            exclude_anomalies: true,
        }
    }
}

impl ViewportConfig {
    /// Set the coverage level.
    pub fn confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Set the padding fraction.
    pub fn padding_fraction(mut self, fraction: f64) -> Self {
        self.padding_fraction = fraction;
        self
    }

    /// Include or exclude anomaly-flagged points.
    pub fn exclude_anomalies(mut self, exclude: bool) -> Self {
        self.exclude_anomalies = exclude;
        self
    }
}

/// Values the viewport is fitted to: history (optionally without flagged
/// points) plus every lower and upper bound of the curve.
pub fn value_pool(
    history: &TimeSeries,
    curve: &ReconciledCurve,
    anomalies: &[AnomalyFlag],
    exclude_anomalies: bool,
) -> Vec<f64> {
    let flagged: HashSet<_> = if exclude_anomalies {
        anomalies.iter().map(|a| a.timestamp).collect()
    } else {
        HashSet::new()
    };

    history
        .points()
        .filter(|p| !flagged.contains(&p.timestamp))
        .map(|p| p.value)
        .chain(
            curve
                .points()
                .iter()
                .flat_map(|p| [p.yhat_lower, p.yhat_upper]),
        )
        .collect()
}

/// Unpadded `(lower, upper)` rank bounds covering `confidence` of `pool`.
pub fn coverage_bounds(pool: &[f64], confidence: f64) -> Result<(f64, f64)> {
    let values = sorted(pool);
    let distinct = count_distinct(&values);
    if distinct < 2 {
        return Err(ReconcileError::InsufficientVariance { distinct });
    }
    rank_bounds(&values, (1.0 - confidence) / 2.0)
        .ok_or(ReconcileError::InsufficientVariance { distinct })
}

/// Compute the display range for history plus reconciled forecast.
///
/// The lower bound never goes below the curve's floor (nor below zero),
/// and padding is applied after the coverage bounds are found.
///
/// # Errors
/// * `InsufficientVariance` if the pool has fewer than two distinct values
///   or the bounds collapse onto the floor
/// * `InvalidParameter` for a confidence outside (0, 1) or negative padding
pub fn optimize_viewport(
    history: &TimeSeries,
    curve: &ReconciledCurve,
    anomalies: &[AnomalyFlag],
    config: &ViewportConfig,
) -> Result<Viewport> {
    if !(config.confidence > 0.0 && config.confidence < 1.0) {
        return Err(ReconcileError::InvalidParameter(format!(
            "viewport confidence must be in (0, 1), got {}",
            config.confidence
        )));
    }
    if !(config.padding_fraction >= 0.0 && config.padding_fraction.is_finite()) {
        return Err(ReconcileError::InvalidParameter(
            "viewport padding fraction must be non-negative".to_string(),
        ));
    }

    let pool = value_pool(history, curve, anomalies, config.exclude_anomalies);
    let (lo, hi) = coverage_bounds(&pool, config.confidence)?;

    let limit = curve.floor().max(0.0);
    let y_min = lo.max(limit);
    let y_max = hi;
    if !(y_max > y_min) {
        return Err(ReconcileError::InsufficientVariance {
            distinct: count_distinct(&sorted(&pool)),
        });
    }

    let pad = config.padding_fraction * (y_max - y_min);
    let viewport = Viewport {
        y_min: (y_min - pad).max(limit),
        y_max: y_max + pad,
    };

    debug!(
        pool = pool.len(),
        y_min = viewport.y_min,
        y_max = viewport.y_max,
        "optimized viewport"
    );

    Ok(viewport)
}
