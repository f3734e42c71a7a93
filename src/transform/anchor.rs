//! Anchoring a forecast to the recent historical level.
//!
//! A model fitted on a training window rarely starts its forecast exactly
//! where the history ends. Anchoring shifts the curve by
//! `offset = anchor - f0`, where `anchor` is the mean of the last `w`
//! observations and `f0` the forecast at the history boundary. Overlap
//! points take the full offset; the k-th future point takes
//! `offset * max(0, 1 - k/w)`, so only the near-term forecast is corrected.

use crate::core::{ForecastCurve, TimeSeries};
use crate::error::{ReconcileError, Result};
use tracing::debug;

/// Configuration for anchoring.
#[derive(Debug, Clone)]
pub struct AnchorConfig {
    /// Reconciliation window in periods: both the number of trailing
    /// observations averaged into the anchor and the decay length.
    pub window: usize,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self { window: 7 }
    }
}

impl AnchorConfig {
    /// Set the reconciliation window.
    pub fn window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }
}

/// An anchored forecast along with the quantities used to produce it.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchoredForecast {
    /// Offset-corrected curve with the input timestamps.
    pub curve: ForecastCurve,
    /// Mean of the trailing history window.
    pub anchor: f64,
    /// Forecast value the anchor was matched against.
    pub reference: f64,
    /// `anchor - reference`, before decay.
    pub offset: f64,
}

/// Multiplier applied to the offset at the k-th future period.
pub fn decay_weight(k: usize, window: usize) -> f64 {
    if window == 0 {
        return 0.0;
    }
    (1.0 - k as f64 / window as f64).max(0.0)
}

/// Anchor `forecast` to the mean level of the last `window` points of
/// `history`.
///
/// # Errors
/// * `InsufficientHistory` if `history` is empty
/// * `EmptyForecast` if `forecast` is empty
/// * `InvalidParameter` if the window is zero
pub fn anchor_forecast(
    history: &TimeSeries,
    forecast: &ForecastCurve,
    config: &AnchorConfig,
) -> Result<AnchoredForecast> {
    let last = history
        .last()
        .ok_or(ReconcileError::InsufficientHistory { needed: 1, got: 0 })?;
    if forecast.is_empty() {
        return Err(ReconcileError::EmptyForecast);
    }
    if config.window == 0 {
        return Err(ReconcileError::InvalidParameter(
            "reconciliation window must be at least 1".to_string(),
        ));
    }
    forecast.validate()?;

    let tail = history.tail(config.window);
    let anchor = tail.iter().sum::<f64>() / tail.len() as f64;

    // First point at or after the boundary, else the nearest earlier one.
    let points = forecast.points();
    let reference = points
        .iter()
        .find(|p| p.timestamp >= last.timestamp)
        .or_else(|| points.last())
        .map(|p| p.yhat)
        .ok_or(ReconcileError::EmptyForecast)?;
    let offset = anchor - reference;

    let future_start = forecast.future_start(last.timestamp);
    let curve = forecast.map_points(|(i, p)| {
        let weight = if i < future_start {
            1.0
        } else {
            decay_weight(i - future_start, config.window)
        };
        let shift = offset * weight;
        p.map_values(|v| v + shift)
    });

    debug!(
        anchor,
        reference,
        offset,
        window = config.window,
        future_points = forecast.len() - future_start,
        "anchored forecast to recent history"
    );

    Ok(AnchoredForecast {
        curve,
        anchor,
        reference,
        offset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ForecastPoint;
    use approx::assert_relative_eq;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn day(d: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(d)
    }

    fn history(values: &[f64]) -> TimeSeries {
        TimeSeries::new((0..values.len() as i64).map(day).collect(), values.to_vec()).unwrap()
    }

    /// Flat forecast at `level` from day `from` to day `to` inclusive.
    fn flat_forecast(from: i64, to: i64, level: f64) -> ForecastCurve {
        ForecastCurve::new(
            (from..=to)
                .map(|d| ForecastPoint::new(day(d), level, level - 5.0, level + 5.0))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn decay_weight_is_linear_then_zero() {
        assert_eq!(decay_weight(0, 4), 1.0);
        assert_eq!(decay_weight(1, 4), 0.75);
        assert_eq!(decay_weight(4, 4), 0.0);
        assert_eq!(decay_weight(9, 4), 0.0);
    }

    #[test]
    fn anchor_is_mean_of_trailing_window() {
        let h = history(&[0.0, 0.0, 10.0, 20.0, 30.0]);
        let f = flat_forecast(5, 10, 100.0);
        let result = anchor_forecast(&h, &f, &AnchorConfig::default().window(3)).unwrap();

        assert_relative_eq!(result.anchor, 20.0, epsilon = 1e-12);
        assert_relative_eq!(result.reference, 100.0, epsilon = 1e-12);
        assert_relative_eq!(result.offset, -80.0, epsilon = 1e-12);
    }

    #[test]
    fn short_history_uses_all_points() {
        let h = history(&[10.0, 20.0]);
        let f = flat_forecast(2, 4, 0.0);
        let result = anchor_forecast(&h, &f, &AnchorConfig::default()).unwrap();
        assert_relative_eq!(result.anchor, 15.0, epsilon = 1e-12);
    }

    #[test]
    fn first_future_point_matches_anchor() {
        let h = history(&[50.0; 10]);
        let f = flat_forecast(10, 20, 80.0);
        let result = anchor_forecast(&h, &f, &AnchorConfig::default()).unwrap();

        let first = result.curve.points()[0];
        assert_relative_eq!(first.yhat, 50.0, epsilon = 1e-9);
        assert_relative_eq!(first.yhat_lower, 45.0, epsilon = 1e-9);
        assert_relative_eq!(first.yhat_upper, 55.0, epsilon = 1e-9);
    }

    #[test]
    fn offset_decays_over_future_region() {
        let h = history(&[50.0; 10]);
        let f = flat_forecast(5, 25, 80.0);
        let w = 4;
        let result = anchor_forecast(&h, &f, &AnchorConfig::default().window(w)).unwrap();

        // Boundary point (day 9) sits in the overlap and is the reference.
        assert_relative_eq!(result.reference, 80.0, epsilon = 1e-12);
        let boundary = day(9);
        for (p, orig) in result.curve.points().iter().zip(f.points()) {
            let applied = p.yhat - orig.yhat;
            if p.timestamp <= boundary {
                assert_relative_eq!(applied, -30.0, epsilon = 1e-12);
            } else {
                let k = (p.timestamp - boundary).num_days() as usize - 1;
                assert_relative_eq!(applied, -30.0 * decay_weight(k, w), epsilon = 1e-12);
            }
        }
        // Long-run forecast is undistorted.
        assert_relative_eq!(result.curve.last().unwrap().yhat, 80.0, epsilon = 1e-12);
    }

    #[test]
    fn forecast_entirely_in_past_uses_last_point() {
        let h = history(&[10.0; 10]);
        let f = flat_forecast(0, 5, 30.0);
        let result = anchor_forecast(&h, &f, &AnchorConfig::default()).unwrap();
        assert_relative_eq!(result.reference, 30.0, epsilon = 1e-12);
        assert!(result
            .curve
            .points()
            .iter()
            .all(|p| (p.yhat - 10.0).abs() < 1e-12));
    }

    #[test]
    fn preserves_timestamps_and_ordering() {
        let h = history(&[5.0, 7.0, 6.0]);
        let f = flat_forecast(1, 8, 40.0);
        let result = anchor_forecast(&h, &f, &AnchorConfig::default()).unwrap();
        assert_eq!(result.curve.len(), f.len());
        for (a, b) in result.curve.points().iter().zip(f.points()) {
            assert_eq!(a.timestamp, b.timestamp);
            assert!(a.yhat_lower <= a.yhat && a.yhat <= a.yhat_upper);
        }
    }

    #[test]
    fn empty_history_is_an_error() {
        let f = flat_forecast(0, 3, 1.0);
        let result = anchor_forecast(&TimeSeries::default(), &f, &AnchorConfig::default());
        assert_eq!(
            result,
            Err(ReconcileError::InsufficientHistory { needed: 1, got: 0 })
        );
    }

    #[test]
    fn empty_forecast_is_an_error() {
        let h = history(&[1.0, 2.0]);
        let result = anchor_forecast(&h, &ForecastCurve::default(), &AnchorConfig::default());
        assert_eq!(result, Err(ReconcileError::EmptyForecast));
    }

    #[test]
    fn zero_window_is_rejected() {
        let h = history(&[1.0, 2.0]);
        let f = flat_forecast(2, 3, 1.0);
        let result = anchor_forecast(&h, &f, &AnchorConfig::default().window(0));
        assert!(matches!(result, Err(ReconcileError::InvalidParameter(_))));
    }
}
