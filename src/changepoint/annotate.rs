//! Significance filtering of model-reported changepoints.

use crate::core::{Changepoint, RawChangepoint, TimeSeries};
use crate::error::{ReconcileError, Result};
use crate::utils::std_dev;
use chrono::Duration;
use std::cmp::Ordering;
use tracing::debug;

/// Configuration for changepoint annotation.
#[derive(Debug, Clone)]
pub struct ChangepointConfig {
    /// Significance threshold as a multiple of the history's standard deviation.
    pub significance_factor: f64,
    /// Minimum separation between kept changepoints, in periods.
    pub min_separation: usize,
    /// Period length. Inferred from the history when `None`.
    pub period: Option<Duration>,
}

impl Default for ChangepointConfig {
    fn default() -> Self {
        Self {
            significance_factor: 2.0,
            min_separation: 3,
            period: None,
        }
    }
}

impl ChangepointConfig {
    /// Set the significance factor `c` in `tau = c * std(H)`.
    pub fn significance_factor(mut self, factor: f64) -> Self {
        self.significance_factor = factor;
        self
    }

    /// Set the minimum separation in periods.
    pub fn min_separation(mut self, periods: usize) -> Self {
        self.min_separation = periods;
        self
    }

    /// Fix the period length instead of inferring it.
    pub fn period(mut self, period: Duration) -> Self {
        self.period = Some(period);
        self
    }
}

/// Magnitude a changepoint must reach to be kept.
///
/// Sample standard deviation of the history values; a history with fewer
/// than two points has no spread and yields a zero threshold.
pub fn significance_threshold(history: &TimeSeries, factor: f64) -> f64 {
    let sd = std_dev(history.values());
    if sd.is_finite() {
        factor * sd
    } else {
        0.0
    }
}

/// Reduce raw changepoints to significant, well-separated regime shifts.
///
/// Entries with `|magnitude| < tau` are dropped. Among entries closer than
/// `min_separation` periods the one with the larger `|magnitude|` wins
/// (the earlier one on ties). The result is sorted by timestamp and every
/// entry has `is_significant = true`.
pub fn annotate_changepoints(
    history: &TimeSeries,
    raw: &[RawChangepoint],
    config: &ChangepointConfig,
) -> Result<Vec<Changepoint>> {
    if !(config.significance_factor >= 0.0 && config.significance_factor.is_finite()) {
        return Err(ReconcileError::InvalidParameter(
            "changepoint significance factor must be non-negative".to_string(),
        ));
    }
    if raw.is_empty() {
        return Ok(Vec::new());
    }
    if raw.iter().any(|c| !c.magnitude.is_finite()) {
        return Err(ReconcileError::MissingValues);
    }

    let tau = significance_threshold(history, config.significance_factor);
    let period = match config.period {
        Some(p) => p,
        None => history.infer_period().unwrap_or_else(|_| Duration::days(1)),
    };
    let separation = i32::try_from(config.min_separation)
        .ok()
        .and_then(|periods| period.checked_mul(periods))
        .ok_or_else(|| {
            ReconcileError::InvalidParameter(format!(
                "changepoint min separation of {} periods is out of range",
                config.min_separation
            ))
        })?;

    let mut candidates: Vec<&RawChangepoint> =
        raw.iter().filter(|c| c.magnitude.abs() >= tau).collect();
    let significant = candidates.len();

    // Strongest first, earlier timestamp breaks ties.
    candidates.sort_by(|a, b| {
        b.magnitude
            .abs()
            .partial_cmp(&a.magnitude.abs())
            .unwrap_or(Ordering::Equal)
            .then(a.timestamp.cmp(&b.timestamp))
    });

    let mut kept: Vec<Changepoint> = Vec::with_capacity(candidates.len());
    for c in candidates {
        let conflicts = kept
            .iter()
            .any(|k| (k.timestamp - c.timestamp).abs() < separation);
        if !conflicts {
            kept.push(Changepoint {
                timestamp: c.timestamp,
                magnitude: c.magnitude,
                is_significant: true,
            });
        }
    }
    kept.sort_by_key(|c| c.timestamp);

    debug!(
        threshold = tau,
        raw = raw.len(),
        significant,
        kept = kept.len(),
        "annotated changepoints"
    );

    Ok(kept)
}
