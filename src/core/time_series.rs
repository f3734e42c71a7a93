//! Historical series of aggregated values.

use crate::error::{ReconcileError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// A single historical observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeSeriesPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// A univariate historical series with strictly increasing timestamps.
///
/// Every value is finite. The invariant is checked on construction, so
/// every stage that accepts a `TimeSeries` can rely on it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeSeries {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
}

/// Builder for constructing TimeSeries from loose points.
#[derive(Debug, Clone, Default)]
pub struct TimeSeriesBuilder {
    points: Vec<TimeSeriesPoint>,
}

impl TimeSeriesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn point(mut self, timestamp: DateTime<Utc>, value: f64) -> Self {
        self.points.push(TimeSeriesPoint { timestamp, value });
        self
    }

    pub fn points(mut self, points: impl IntoIterator<Item = TimeSeriesPoint>) -> Self {
        self.points.extend(points);
        self
    }

    pub fn build(self) -> Result<TimeSeries> {
        let (timestamps, values) = self
            .points
            .into_iter()
            .map(|p| (p.timestamp, p.value))
            .unzip();
        TimeSeries::new(timestamps, values)
    }
}

impl TimeSeries {
    /// Create a series, validating ordering and finiteness.
    pub fn new(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>) -> Result<Self> {
        if timestamps.len() != values.len() {
            return Err(ReconcileError::TimestampError(format!(
                "{} timestamps for {} values",
                timestamps.len(),
                values.len()
            )));
        }

        for i in 1..timestamps.len() {
            if timestamps[i] <= timestamps[i - 1] {
                return Err(ReconcileError::TimestampError(
                    "timestamps must be strictly increasing".to_string(),
                ));
            }
        }

        if values.iter().any(|v| !v.is_finite()) {
            return Err(ReconcileError::MissingValues);
        }

        Ok(Self { timestamps, values })
    }

    /// Get the number of observations.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Check if the series is empty.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Iterate over observations in time order.
    pub fn points(&self) -> impl Iterator<Item = TimeSeriesPoint> + '_ {
        self.timestamps
            .iter()
            .zip(self.values.iter())
            .map(|(&timestamp, &value)| TimeSeriesPoint { timestamp, value })
    }

    /// Last observation, if any.
    pub fn last(&self) -> Option<TimeSeriesPoint> {
        match (self.timestamps.last(), self.values.last()) {
            (Some(&timestamp), Some(&value)) => Some(TimeSeriesPoint { timestamp, value }),
            _ => None,
        }
    }

    /// Last `n` values (fewer if the series is shorter).
    pub fn tail(&self, n: usize) -> &[f64] {
        let start = self.values.len().saturating_sub(n);
        &self.values[start..]
    }

    /// Position of an exact timestamp.
    pub fn index_of(&self, timestamp: &DateTime<Utc>) -> Option<usize> {
        self.timestamps.binary_search(timestamp).ok()
    }

    /// Sub-series of observations at or after `start`.
    pub fn since(&self, start: DateTime<Utc>) -> TimeSeries {
        let from = self.timestamps.partition_point(|t| *t < start);
        TimeSeries {
            timestamps: self.timestamps[from..].to_vec(),
            values: self.values[from..].to_vec(),
        }
    }

    /// Infer the sampling period as the modal spacing between timestamps.
    ///
    /// Ties between equally common spacings resolve to the shortest one.
    pub fn infer_period(&self) -> Result<Duration> {
        if self.len() < 2 {
            return Err(ReconcileError::InsufficientHistory {
                needed: 2,
                got: self.len(),
            });
        }

        let mut counts: HashMap<i64, usize> = HashMap::new();
        for w in self.timestamps.windows(2) {
            *counts.entry((w[1] - w[0]).num_seconds()).or_insert(0) += 1;
        }

        let (modal_diff, _) = counts
            .into_iter()
            .max_by(|(da, ca), (db, cb)| ca.cmp(cb).then(db.cmp(da)))
            .ok_or_else(|| {
                ReconcileError::TimestampError("empty spacing data".to_string())
            })?;

        Ok(Duration::seconds(modal_diff))
    }
}
