//! Reduction of revenue records into a historical series.

use super::records::{OrderStatus, RevenueRecord};
use crate::core::TimeSeries;
use crate::error::{ReconcileError, Result};
use crate::transform::rolling_mean;
use chrono::{DateTime, Datelike, Duration, DurationRound, Utc};
use std::collections::BTreeMap;
use tracing::debug;

/// Width of the aggregation buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Bucket {
    Hour,
    #[default]
    Day,
    /// ISO weeks, starting Monday 00:00 UTC.
    Week,
}

impl Bucket {
    /// Start of the bucket containing `timestamp`.
    pub fn truncate(&self, timestamp: DateTime<Utc>) -> Result<DateTime<Utc>> {
        let unit = match self {
            Bucket::Hour => Duration::hours(1),
            Bucket::Day | Bucket::Week => Duration::days(1),
        };
        let start = timestamp
            .duration_trunc(unit)
            .map_err(|e| ReconcileError::TimestampError(e.to_string()))?;
        Ok(match self {
            Bucket::Week => {
                start - Duration::days(start.weekday().num_days_from_monday() as i64)
            }
            _ => start,
        })
    }
}

/// Configuration for record aggregation.
#[derive(Debug, Clone)]
pub struct AggregationConfig {
    pub bucket: Bucket,
    /// Statuses whose records contribute revenue.
    pub statuses: Vec<OrderStatus>,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            bucket: Bucket::Day,
            statuses: vec![OrderStatus::Delivered],
        }
    }
}

impl AggregationConfig {
    pub fn bucket(mut self, bucket: Bucket) -> Self {
        self.bucket = bucket;
        self
    }

    pub fn statuses(mut self, statuses: Vec<OrderStatus>) -> Self {
        self.statuses = statuses;
        self
    }
}

/// Sum record amounts per bucket.
///
/// Records with a non-finite amount or a status outside the accepted set
/// are skipped. Buckets without records are absent rather than zero.
pub fn aggregate(records: &[RevenueRecord], config: &AggregationConfig) -> Result<TimeSeries> {
    let mut totals: BTreeMap<DateTime<Utc>, f64> = BTreeMap::new();
    let mut skipped = 0usize;

    for record in records {
        if !record.amount.is_finite() || !config.statuses.contains(&record.status) {
            skipped += 1;
            continue;
        }
        let key = config.bucket.truncate(record.timestamp)?;
        *totals.entry(key).or_insert(0.0) += record.amount;
    }

    debug!(
        records = records.len(),
        skipped,
        buckets = totals.len(),
        "aggregated revenue records"
    );

    let (timestamps, values) = totals.into_iter().unzip();
    TimeSeries::new(timestamps, values)
}

/// History at or after `last - lookback`: the window a model is trained on.
pub fn recent_window(series: &TimeSeries, lookback: Duration) -> TimeSeries {
    match series.last() {
        Some(last) => series.since(last.timestamp - lookback),
        None => TimeSeries::default(),
    }
}

/// Smoothed trend line: trailing mean over `window` points, averaging over
/// whatever is available at the start of the series.
pub fn trailing_trend(series: &TimeSeries, window: usize) -> Result<TimeSeries> {
    if window == 0 {
        return Err(ReconcileError::InvalidParameter(
            "trend window must be at least 1".to_string(),
        ));
    }
    let trend = rolling_mean(series.values(), window, 1);
    TimeSeries::new(series.timestamps().to_vec(), trend)
}
