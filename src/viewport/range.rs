//! Time-axis range for the reconciled chart.

use crate::core::{ReconciledCurve, TimeSeries};
use crate::error::{ReconcileError, Result};
use chrono::{DateTime, Duration, Utc};

/// Visible time range: `lookback` before the last observation through the
/// end of the forecast (or the last observation if the forecast ends
/// earlier).
pub fn time_range(
    history: &TimeSeries,
    curve: &ReconciledCurve,
    lookback: Duration,
) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let last = history
        .last()
        .ok_or(ReconcileError::InsufficientHistory { needed: 1, got: 0 })?
        .timestamp;
    let end = curve
        .points()
        .last()
        .map(|p| p.timestamp.max(last))
        .unwrap_or(last);
    Ok((last - lookback, end))
}
