//! Transforms applied to the forecast curve.
//!
//! Anchoring removes the jump between history and forecast; the floor
//! constraint keeps the anchored curve above a business-valid minimum.
//!
//! # Example
//!
//! ```
//! use anofox_reconcile::core::{ForecastCurve, ForecastPoint, TimeSeries};
//! use anofox_reconcile::transform::{anchor_forecast, apply_floor, AnchorConfig, FloorConfig};
//! use chrono::{Duration, TimeZone, Utc};
//!
//! let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let history = TimeSeries::new(
//!     (0..10).map(|d| base + Duration::days(d)).collect(),
//!     vec![20.0; 10],
//! )
//! .unwrap();
//! let forecast = ForecastCurve::new(
//!     (10..20)
//!         .map(|d| ForecastPoint::new(base + Duration::days(d), 5.0, -10.0, 20.0))
//!         .collect(),
//! )
//! .unwrap();
//!
//! let anchored = anchor_forecast(&history, &forecast, &AnchorConfig::default()).unwrap();
//! let reconciled = apply_floor(&anchored.curve, &FloorConfig::default()).unwrap();
//!
//! assert!((reconciled.points()[0].yhat - 20.0).abs() < 1e-6);
//! assert!(reconciled.points().iter().all(|p| p.yhat_lower >= 0.0));
//! ```

pub mod anchor;
pub mod floor;
pub mod window;

pub use anchor::{anchor_forecast, decay_weight, AnchorConfig, AnchoredForecast};
pub use floor::{apply_floor, soft_floor, FloorConfig, SATURATION_THRESHOLD};
pub use window::{preceding_stats, rolling_mean, rolling_std, WindowStats};
