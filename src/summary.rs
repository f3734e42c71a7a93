//! Headline figures shown next to the reconciled chart.

use crate::core::{AnomalyFlag, ReconciledCurve, TimeSeries};
use serde::Serialize;

/// Headline metrics derived from a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastSummary {
    /// Sum of the last `window` historical values.
    pub recent_total: f64,
    /// Percent change from the anchor to the final forecast value.
    pub trend_change_pct: Option<f64>,
    /// Number of flagged historical anomalies.
    pub anomaly_count: usize,
    /// Mean of the last `baseline_window` historical values.
    pub baseline: Option<f64>,
}

/// Summarise history, reconciled forecast and anomalies.
///
/// `trend_change_pct` is `None` without a future region or with a zero
/// anchor; `baseline` is `None` when history is shorter than its window.
pub fn summarize(
    history: &TimeSeries,
    curve: &ReconciledCurve,
    anchor: f64,
    anomalies: &[AnomalyFlag],
    window: usize,
    baseline_window: usize,
) -> ForecastSummary {
    let recent_total = history.tail(window).iter().sum();

    let trend_change_pct = history
        .last()
        .and_then(|last| curve.curve().future(last.timestamp).last().copied())
        .filter(|_| anchor != 0.0)
        .map(|p| (p.yhat / anchor - 1.0) * 100.0);

    let baseline = (baseline_window > 0 && history.len() >= baseline_window).then(|| {
        let tail = history.tail(baseline_window);
        tail.iter().sum::<f64>() / tail.len() as f64
    });

    ForecastSummary {
        recent_total,
        trend_change_pct,
        anomaly_count: anomalies.len(),
        baseline,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ForecastCurve, ForecastPoint};
    use crate::transform::{apply_floor, FloorConfig};
    use approx::assert_relative_eq;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn day(d: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(d)
    }

    fn history(n: i64, value: f64) -> TimeSeries {
        TimeSeries::new((0..n).map(day).collect(), vec![value; n as usize]).unwrap()
    }

    fn reconciled(from: i64, to: i64, level: f64) -> ReconciledCurve {
        let curve = ForecastCurve::new(
            (from..=to)
                .map(|d| ForecastPoint::new(day(d), level, level - 10.0, level + 10.0))
                .collect(),
        )
        .unwrap();
        apply_floor(&curve, &FloorConfig::default()).unwrap()
    }

    #[test]
    fn summary_reports_headline_figures() {
        let h = history(20, 100.0);
        let c = reconciled(20, 29, 110.0);
        let flags = [AnomalyFlag {
            timestamp: day(3),
            value: 100.0,
            z_score: 4.0,
        }];

        let summary = summarize(&h, &c, 100.0, &flags, 7, 14);

        assert_relative_eq!(summary.recent_total, 700.0, epsilon = 1e-9);
        assert_relative_eq!(summary.trend_change_pct.unwrap(), 10.0, epsilon = 1e-6);
        assert_eq!(summary.anomaly_count, 1);
        assert_relative_eq!(summary.baseline.unwrap(), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn missing_future_region_or_short_history() {
        let h = history(5, 10.0);
        let c = reconciled(0, 4, 100.0);
        let summary = summarize(&h, &c, 10.0, &[], 7, 14);

        assert!(summary.trend_change_pct.is_none());
        assert!(summary.baseline.is_none());
        assert_relative_eq!(summary.recent_total, 50.0, epsilon = 1e-9);
    }

    #[test]
    fn zero_anchor_has_no_trend() {
        let h = history(10, 0.0);
        let c = reconciled(10, 12, 50.0);
        assert!(summarize(&h, &c, 0.0, &[], 7, 14).trend_change_pct.is_none());
    }
}
