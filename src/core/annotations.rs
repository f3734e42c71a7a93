//! Annotation values attached to a reconciled forecast.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A candidate trend-slope change reported by the forecasting model.
///
/// `magnitude` is signed: its sign gives the direction of the slope change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawChangepoint {
    pub timestamp: DateTime<Utc>,
    pub magnitude: f64,
}

impl RawChangepoint {
    pub fn new(timestamp: DateTime<Utc>, magnitude: f64) -> Self {
        Self {
            timestamp,
            magnitude,
        }
    }
}

/// A regime-shift marker that survived significance filtering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Changepoint {
    pub timestamp: DateTime<Utc>,
    pub magnitude: f64,
    pub is_significant: bool,
}

/// A historical point whose deviation from its local baseline is extreme.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnomalyFlag {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    pub z_score: f64,
}

/// Display range for the value axis. `y_min` is never negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub y_min: f64,
    pub y_max: f64,
}

impl Viewport {
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.y_min && value <= self.y_max
    }
}
