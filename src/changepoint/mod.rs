//! Changepoint annotation.
//!
//! The forecasting model reports candidate trend-slope changes, many of
//! them near-zero noise. Annotation keeps the ones whose magnitude is large
//! relative to the spread of the history and thins out clusters, leaving a
//! sparse set of regime-shift markers.
//!
//! # Example
//!
//! ```
//! use anofox_reconcile::changepoint::{annotate_changepoints, ChangepointConfig};
//! use anofox_reconcile::core::{RawChangepoint, TimeSeries};
//! use chrono::{Duration, TimeZone, Utc};
//!
//! let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let history = TimeSeries::new(
//!     (0..30).map(|d| base + Duration::days(d)).collect(),
//!     (0..30).map(|i| (i % 3) as f64).collect(),
//! )
//! .unwrap();
//! let raw = vec![
//!     RawChangepoint::new(base + Duration::days(8), 0.01),
//!     RawChangepoint::new(base + Duration::days(20), 4.0),
//! ];
//!
//! let markers = annotate_changepoints(&history, &raw, &ChangepointConfig::default()).unwrap();
//! assert_eq!(markers.len(), 1);
//! ```

pub mod annotate;

pub use annotate::{annotate_changepoints, significance_threshold, ChangepointConfig};
