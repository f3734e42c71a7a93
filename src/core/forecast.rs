//! Forecast curves produced by the external model and their reconciled form.

use crate::error::{ReconcileError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One step of a forecast curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub timestamp: DateTime<Utc>,
    pub yhat: f64,
    pub yhat_lower: f64,
    pub yhat_upper: f64,
}

impl ForecastPoint {
    pub fn new(timestamp: DateTime<Utc>, yhat: f64, yhat_lower: f64, yhat_upper: f64) -> Self {
        Self {
            timestamp,
            yhat,
            yhat_lower,
            yhat_upper,
        }
    }

    /// Apply the same transform to all three values.
    pub fn map_values(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            timestamp: self.timestamp,
            yhat: f(self.yhat),
            yhat_lower: f(self.yhat_lower),
            yhat_upper: f(self.yhat_upper),
        }
    }
}

/// A forecast curve: trend plus uncertainty bounds over strictly increasing
/// timestamps, with `yhat_lower <= yhat <= yhat_upper` at every point.
///
/// Timestamps that also appear in history form the overlap region; those
/// after the last historical timestamp form the future region.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct ForecastCurve {
    points: Vec<ForecastPoint>,
}

impl ForecastCurve {
    /// Create a curve, validating ordering and bounds.
    pub fn new(points: Vec<ForecastPoint>) -> Result<Self> {
        let curve = Self { points };
        curve.validate()?;
        Ok(curve)
    }

    /// Create a curve from parallel columns.
    pub fn from_columns(
        timestamps: Vec<DateTime<Utc>>,
        yhat: Vec<f64>,
        yhat_lower: Vec<f64>,
        yhat_upper: Vec<f64>,
    ) -> Result<Self> {
        let n = timestamps.len();
        if yhat.len() != n || yhat_lower.len() != n || yhat_upper.len() != n {
            return Err(ReconcileError::MalformedCurve(format!(
                "column lengths differ: {} timestamps, {} yhat, {} lower, {} upper",
                n,
                yhat.len(),
                yhat_lower.len(),
                yhat_upper.len()
            )));
        }

        let points = (0..n)
            .map(|i| ForecastPoint::new(timestamps[i], yhat[i], yhat_lower[i], yhat_upper[i]))
            .collect();
        Self::new(points)
    }

    /// Check the ordering and bound invariants.
    pub fn validate(&self) -> Result<()> {
        for (i, p) in self.points.iter().enumerate() {
            if !(p.yhat.is_finite() && p.yhat_lower.is_finite() && p.yhat_upper.is_finite()) {
                return Err(ReconcileError::MalformedCurve(format!(
                    "non-finite value at index {i}"
                )));
            }
            if p.yhat_lower > p.yhat || p.yhat > p.yhat_upper {
                return Err(ReconcileError::MalformedCurve(format!(
                    "bounds out of order at index {i}: {} <= {} <= {} does not hold",
                    p.yhat_lower, p.yhat, p.yhat_upper
                )));
            }
            if i > 0 && p.timestamp <= self.points[i - 1].timestamp {
                return Err(ReconcileError::MalformedCurve(format!(
                    "timestamps not strictly increasing at index {i}"
                )));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    pub fn first(&self) -> Option<&ForecastPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&ForecastPoint> {
        self.points.last()
    }

    /// Index of the first point strictly after `boundary` (start of the
    /// future region). Equals `len()` if there is no future region.
    pub fn future_start(&self, boundary: DateTime<Utc>) -> usize {
        self.points.partition_point(|p| p.timestamp <= boundary)
    }

    /// Points strictly after `boundary`.
    pub fn future(&self, boundary: DateTime<Utc>) -> &[ForecastPoint] {
        &self.points[self.future_start(boundary)..]
    }

    /// Points at or before `boundary`.
    pub fn overlap(&self, boundary: DateTime<Utc>) -> &[ForecastPoint] {
        &self.points[..self.future_start(boundary)]
    }

    /// Apply a per-point transform, producing a new curve.
    ///
    /// Callers are responsible for keeping the bound ordering intact.
    pub(crate) fn map_points(&self, f: impl FnMut((usize, &ForecastPoint)) -> ForecastPoint) -> Self {
        Self {
            points: self.points.iter().enumerate().map(f).collect(),
        }
    }
}

/// A forecast curve after anchoring and floor application.
///
/// Same shape as [`ForecastCurve`], with every `yhat_lower >= floor`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciledCurve {
    curve: ForecastCurve,
    floor: f64,
}

impl ReconciledCurve {
    pub(crate) fn new(curve: ForecastCurve, floor: f64) -> Self {
        Self { curve, floor }
    }

    pub fn curve(&self) -> &ForecastCurve {
        &self.curve
    }

    pub fn points(&self) -> &[ForecastPoint] {
        self.curve.points()
    }

    /// Floor value the curve was constrained to.
    pub fn floor(&self) -> f64 {
        self.floor
    }

    pub fn len(&self) -> usize {
        self.curve.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curve.is_empty()
    }

    /// Future region prefixed with a bridge point at the last historical
    /// timestamp, so the drawn forecast touches the history line.
    pub fn with_bridge(&self, last_timestamp: DateTime<Utc>, anchor: f64) -> Vec<ForecastPoint> {
        let bridge = ForecastPoint::new(last_timestamp, anchor, anchor, anchor);
        std::iter::once(bridge)
            .chain(self.curve.future(last_timestamp).iter().copied())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn ts(day: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap() + Duration::days(day)
    }

    fn curve(n: i64) -> ForecastCurve {
        ForecastCurve::new(
            (0..n)
                .map(|d| ForecastPoint::new(ts(d), 10.0 + d as f64, 8.0 + d as f64, 12.0 + d as f64))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn curve_rejects_inverted_bounds() {
        let result = ForecastCurve::new(vec![ForecastPoint::new(ts(0), 5.0, 6.0, 7.0)]);
        assert!(matches!(result, Err(ReconcileError::MalformedCurve(_))));

        let result = ForecastCurve::new(vec![ForecastPoint::new(ts(0), 8.0, 6.0, 7.0)]);
        assert!(matches!(result, Err(ReconcileError::MalformedCurve(_))));
    }

    #[test]
    fn curve_rejects_unordered_timestamps() {
        let result = ForecastCurve::new(vec![
            ForecastPoint::new(ts(1), 1.0, 0.0, 2.0),
            ForecastPoint::new(ts(1), 1.0, 0.0, 2.0),
        ]);
        assert!(matches!(result, Err(ReconcileError::MalformedCurve(_))));
    }

    #[test]
    fn curve_rejects_non_finite_values() {
        let result = ForecastCurve::new(vec![ForecastPoint::new(ts(0), f64::NAN, 0.0, 2.0)]);
        assert!(result.is_err());
    }

    #[test]
    fn from_columns_checks_lengths() {
        let result = ForecastCurve::from_columns(vec![ts(0), ts(1)], vec![1.0], vec![0.0], vec![2.0]);
        assert!(matches!(result, Err(ReconcileError::MalformedCurve(_))));
    }

    #[test]
    fn regions_split_at_boundary() {
        let c = curve(6);
        assert_eq!(c.future_start(ts(2)), 3);
        assert_eq!(c.overlap(ts(2)).len(), 3);
        assert_eq!(c.future(ts(2)).len(), 3);
        assert_eq!(c.future(ts(10)).len(), 0);
        assert_eq!(c.future(ts(-1)).len(), 6);
    }

    #[test]
    fn bridge_prefixes_future_region() {
        let reconciled = ReconciledCurve::new(curve(5), 0.0);
        let bridged = reconciled.with_bridge(ts(2), 42.0);
        assert_eq!(bridged.len(), 3);
        assert_eq!(bridged[0].timestamp, ts(2));
        assert_eq!(bridged[0].yhat_lower, 42.0);
        assert_eq!(bridged[1].timestamp, ts(3));
    }
}
