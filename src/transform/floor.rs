//! Smooth floor constraint for forecast curves.
//!
//! Values are mapped through `floor + s * softplus((v - floor) / s)`, which
//! is strictly above the floor, monotonic (so bound ordering survives) and
//! indistinguishable from the identity once `v - floor` is a few dozen `s`
//! above the floor.

use crate::core::{ForecastCurve, ReconciledCurve};
use crate::error::{ReconcileError, Result};
use crate::utils::softplus;
use tracing::debug;

/// Distance above the floor, in units of the smoothing scale, past which
/// values pass through unchanged. `ln(1 + e^-37)` is below the f64 spacing
/// at 37, so the cut-over introduces no step.
pub const SATURATION_THRESHOLD: f64 = 37.0;

/// Configuration for the floor constraint.
#[derive(Debug, Clone)]
pub struct FloorConfig {
    /// Lower bound the curve must stay above.
    pub floor: f64,
    /// Width of the soft transition near the floor, in value units.
    pub smoothing: f64,
}

impl Default for FloorConfig {
    fn default() -> Self {
        Self {
            floor: 0.0,
            smoothing: 1.0,
        }
    }
}

impl FloorConfig {
    /// Set the floor value.
    pub fn floor(mut self, floor: f64) -> Self {
        self.floor = floor;
        self
    }

    /// Set the smoothing scale.
    pub fn smoothing(mut self, smoothing: f64) -> Self {
        self.smoothing = smoothing;
        self
    }
}

/// Soft-clip a single value against `floor`.
pub fn soft_floor(value: f64, floor: f64, smoothing: f64) -> f64 {
    let x = (value - floor) / smoothing;
    if x > SATURATION_THRESHOLD {
        value
    } else {
        floor + smoothing * softplus(x)
    }
}

/// Apply the soft floor to `yhat`, `yhat_lower` and `yhat_upper` of every
/// point.
///
/// # Errors
/// * `MalformedCurve` if the input violates its ordering invariants
/// * `InvalidParameter` if the floor is not finite or smoothing is not
///   positive
pub fn apply_floor(curve: &ForecastCurve, config: &FloorConfig) -> Result<ReconciledCurve> {
    if !config.floor.is_finite() {
        return Err(ReconcileError::InvalidParameter(
            "floor value must be finite".to_string(),
        ));
    }
    if !(config.smoothing > 0.0 && config.smoothing.is_finite()) {
        return Err(ReconcileError::InvalidParameter(
            "floor smoothing must be positive".to_string(),
        ));
    }
    curve.validate()?;

    let floor = config.floor;
    let smoothing = config.smoothing;
    let clipped = curve
        .points()
        .iter()
        .filter(|p| (p.yhat_lower - floor) / smoothing <= SATURATION_THRESHOLD)
        .count();

    let floored = curve.map_points(|(_, p)| p.map_values(|v| soft_floor(v, floor, smoothing)));

    debug!(
        floor,
        smoothing,
        points = curve.len(),
        softened = clipped,
        "applied floor constraint"
    );

    Ok(ReconciledCurve::new(floored, floor))
}
