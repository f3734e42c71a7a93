//! Rolling-baseline anomaly detection.
//!
//! Each point is compared with the mean and standard deviation of the
//! `W` points before it. The point itself never enters its own baseline.

use crate::core::{AnomalyFlag, TimeSeries};
use crate::error::{ReconcileError, Result};
use crate::transform::preceding_stats;
use statrs::distribution::{ContinuousCDF, Normal};
use tracing::debug;

/// Configuration for residual anomaly detection.
#[derive(Debug, Clone)]
pub struct AnomalyConfig {
    /// Rolling window length in periods.
    pub window: usize,
    /// Absolute z-score at or above which a point is flagged.
    pub z_threshold: f64,
    /// Lower bound on the baseline scale relative to `|mean|`.
    ///
    /// A perfectly flat window has zero spread, which would make any
    /// deviation from it unflaggable; the scale is floored at
    /// `min_relative_scale * |mean|` instead. After a flat non-zero window
    /// a move of `z_threshold * min_relative_scale` of the level is
    /// flagged (3% with the defaults). A window that is flat at zero still
    /// has zero scale and its points score `z = 0`.
    pub min_relative_scale: f64,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            window: 7,
            z_threshold: 3.0,
            min_relative_scale: 1e-2,
        }
    }
}

impl AnomalyConfig {
    /// Set the rolling window length.
    pub fn window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Set the z-score threshold.
    pub fn z_threshold(mut self, threshold: f64) -> Self {
        self.z_threshold = threshold;
        self
    }

    /// Set the relative scale floor.
    pub fn min_relative_scale(mut self, scale: f64) -> Self {
        self.min_relative_scale = scale.max(0.0);
        self
    }

    /// Derive the z threshold from a two-sided normal confidence level,
    /// e.g. `0.99` gives roughly `2.576`.
    pub fn from_confidence(confidence: f64) -> Result<Self> {
        if !(confidence > 0.0 && confidence < 1.0) {
            return Err(ReconcileError::InvalidParameter(format!(
                "confidence must be in (0, 1), got {confidence}"
            )));
        }
        let normal = Normal::new(0.0, 1.0)
            .map_err(|e| ReconcileError::InvalidParameter(e.to_string()))?;
        let z = normal.inverse_cdf(0.5 + confidence / 2.0);
        Ok(Self::default().z_threshold(z))
    }
}

/// Z-score of every point against its preceding window.
///
/// Entries are `None` for the first `window` points, which have no full
/// baseline.
pub fn rolling_z_scores(values: &[f64], config: &AnomalyConfig) -> Vec<Option<f64>> {
    preceding_stats(values, config.window)
        .into_iter()
        .zip(values)
        .map(|(stats, &value)| {
            stats.map(|s| {
                let scale = s.std_dev.max(config.min_relative_scale * s.mean.abs());
                if scale > 0.0 {
                    (value - s.mean) / scale
                } else {
                    0.0
                }
            })
        })
        .collect()
}

/// Flag historical points whose rolling z-score reaches the threshold.
///
/// Histories shorter than the window are not an error; they simply produce
/// no flags.
pub fn detect_anomalies(history: &TimeSeries, config: &AnomalyConfig) -> Result<Vec<AnomalyFlag>> {
    if config.window == 0 {
        return Err(ReconcileError::InvalidParameter(
            "anomaly window must be at least 1".to_string(),
        ));
    }
    if !(config.z_threshold > 0.0 && config.z_threshold.is_finite()) {
        return Err(ReconcileError::InvalidParameter(
            "anomaly z threshold must be positive".to_string(),
        ));
    }

    let scores = rolling_z_scores(history.values(), config);
    let flags: Vec<AnomalyFlag> = history
        .points()
        .zip(scores)
        .filter_map(|(p, z)| match z {
            Some(z) if z.abs() >= config.z_threshold => Some(AnomalyFlag {
                timestamp: p.timestamp,
                value: p.value,
                z_score: z,
            }),
            _ => None,
        })
        .collect();

    debug!(
        window = config.window,
        threshold = config.z_threshold,
        evaluated = history.len().saturating_sub(config.window),
        flagged = flags.len(),
        "detected residual anomalies"
    );

    Ok(flags)
}
