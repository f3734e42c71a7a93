//! # anofox-reconcile
//!
//! Forecast reconciliation and signal detection for revenue dashboards.
//!
//! Takes a historical series and the raw output of an external forecasting
//! model (trend, uncertainty bounds, candidate changepoints) and produces a
//! decision-ready curve: anchored to recent history, kept above a floor,
//! annotated with significant regime shifts and historical anomalies, and
//! paired with a display range fitted to the data.
//!
//! # Example
//!
//! ```
//! use anofox_reconcile::prelude::*;
//! use chrono::{Duration, TimeZone, Utc};
//!
//! let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let history = TimeSeries::new(
//!     (0..30).map(|d| base + Duration::days(d)).collect(),
//!     (0..30).map(|i| 100.0 + (i % 7) as f64 * 5.0).collect(),
//! )
//! .unwrap();
//! let forecast = ForecastCurve::new(
//!     (20..50)
//!         .map(|d| ForecastPoint::new(base + Duration::days(d), 90.0, 60.0, 120.0))
//!         .collect(),
//! )
//! .unwrap();
//!
//! let output = reconcile(&history, &forecast, &[], &ReconcileConfig::default()).unwrap();
//! assert!(output.viewport.y_min >= 0.0);
//! assert!(output.curve.points().iter().all(|p| p.yhat_lower >= 0.0));
//! ```

#![allow(clippy::neg_cmp_op_on_partial_ord)]

pub mod aggregate;
pub mod changepoint;
pub mod core;
pub mod detection;
pub mod error;
pub mod pipeline;
pub mod summary;
pub mod transform;
pub mod utils;
pub mod viewport;

pub use error::{ReconcileError, Result};

pub mod prelude {
    pub use crate::core::{
        AnomalyFlag, Changepoint, ForecastCurve, ForecastPoint, RawChangepoint, ReconciledCurve,
        TimeSeries, Viewport,
    };
    pub use crate::error::{ReconcileError, Result};
    pub use crate::pipeline::{reconcile, reconcile_segments, ReconcileConfig, ReconciledOutput, Segment};
}
