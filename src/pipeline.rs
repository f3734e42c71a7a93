//! End-to-end reconciliation of a history and its raw forecast.
//!
//! Anchoring and the floor constraint run in sequence on the forecast;
//! changepoint annotation and anomaly detection run on the history; the
//! viewport is computed last from the reconciled curve, history and
//! anomaly flags. Every stage is a pure function of its inputs, so
//! independent segments (regions, categories) can be reconciled in
//! parallel with [`reconcile_segments`].

use crate::changepoint::{annotate_changepoints, ChangepointConfig};
use crate::core::{
    AnomalyFlag, Changepoint, ForecastCurve, ForecastPoint, RawChangepoint, ReconciledCurve,
    TimeSeries, Viewport,
};
use crate::detection::{
    detect_anomalies, detect_model_residual_shocks, AnomalyConfig, DEFAULT_SHOCK_THRESHOLD,
};
use crate::error::{ReconcileError, Result};
use crate::summary::{summarize, ForecastSummary};
use crate::transform::{anchor_forecast, apply_floor, soft_floor, AnchorConfig, FloorConfig};
use crate::viewport::{optimize_viewport, ViewportConfig};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Recognized pipeline options.
///
/// Deserializes from camelCase keys; absent keys take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ReconcileConfig {
    /// Anchor averaging and offset decay length, in periods.
    pub reconciliation_window: usize,
    pub floor_value: f64,
    /// Width of the soft transition at the floor.
    pub floor_smoothing: f64,
    /// `c` in `tau = c * std(history)`.
    pub changepoint_significance_factor: f64,
    /// Minimum spacing between changepoints, in periods.
    pub changepoint_min_separation: usize,
    pub anomaly_window: usize,
    pub anomaly_z_threshold: f64,
    pub viewport_confidence: f64,
    pub viewport_padding_fraction: f64,
    pub exclude_anomalies_from_viewport: bool,
    /// Window of the rolling baseline reported in the summary.
    pub baseline_window: usize,
    /// Threshold for shocks against the model's in-sample fit.
    pub shock_threshold: f64,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            reconciliation_window: 7,
            floor_value: 0.0,
            floor_smoothing: 1.0,
            changepoint_significance_factor: 2.0,
            changepoint_min_separation: 3,
            anomaly_window: 7,
            anomaly_z_threshold: 3.0,
            viewport_confidence: 0.95,
            viewport_padding_fraction: 0.05,
            exclude_anomalies_from_viewport: true,
            baseline_window: 14,
            shock_threshold: DEFAULT_SHOCK_THRESHOLD,
        }
    }
}

impl ReconcileConfig {
    /// Parse a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ReconcileError::InvalidParameter(format!("configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every option is within range.
    pub fn validate(&self) -> Result<()> {
        fn invalid(msg: &str) -> Result<()> {
            Err(ReconcileError::InvalidParameter(msg.to_string()))
        }

        if self.reconciliation_window == 0 {
            return invalid("reconciliationWindow must be at least 1");
        }
        if !self.floor_value.is_finite() {
            return invalid("floorValue must be finite");
        }
        if !(self.floor_smoothing > 0.0 && self.floor_smoothing.is_finite()) {
            return invalid("floorSmoothing must be positive");
        }
        if !(self.changepoint_significance_factor >= 0.0
            && self.changepoint_significance_factor.is_finite())
        {
            return invalid("changepointSignificanceFactor must be non-negative");
        }
        if self.changepoint_min_separation > i32::MAX as usize {
            return invalid("changepointMinSeparation is out of range");
        }
        if self.anomaly_window == 0 {
            return invalid("anomalyWindow must be at least 1");
        }
        if !(self.anomaly_z_threshold > 0.0 && self.anomaly_z_threshold.is_finite()) {
            return invalid("anomalyZThreshold must be positive");
        }
        if !(self.viewport_confidence > 0.0 && self.viewport_confidence < 1.0) {
            return invalid("viewportConfidence must be in (0, 1)");
        }
        if !(self.viewport_padding_fraction >= 0.0 && self.viewport_padding_fraction.is_finite()) {
            return invalid("viewportPaddingFraction must be non-negative");
        }
        if !(self.shock_threshold > 0.0 && self.shock_threshold.is_finite()) {
            return invalid("shockThreshold must be positive");
        }
        if self.floor_value < 0.0 {
            warn!(
                floor = self.floor_value,
                "negative floor allows negative forecasts; viewport stays at zero"
            );
        }
        Ok(())
    }

    pub fn anchor(&self) -> AnchorConfig {
        AnchorConfig::default().window(self.reconciliation_window)
    }

    pub fn floor(&self) -> FloorConfig {
        FloorConfig::default()
            .floor(self.floor_value)
            .smoothing(self.floor_smoothing)
    }

    pub fn changepoints(&self) -> ChangepointConfig {
        ChangepointConfig::default()
            .significance_factor(self.changepoint_significance_factor)
            .min_separation(self.changepoint_min_separation)
    }

    pub fn anomalies(&self) -> AnomalyConfig {
        AnomalyConfig::default()
            .window(self.anomaly_window)
            .z_threshold(self.anomaly_z_threshold)
    }

    pub fn viewport(&self) -> ViewportConfig {
        ViewportConfig::default()
            .confidence(self.viewport_confidence)
            .padding_fraction(self.viewport_padding_fraction)
            .exclude_anomalies(self.exclude_anomalies_from_viewport)
    }
}

/// Everything the rendering layer needs for one series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciledOutput {
    /// Anchored, floor-constrained forecast.
    pub curve: ReconciledCurve,
    /// Point at the last historical timestamp joining history and forecast,
    /// held above the floor like the rest of the curve.
    pub bridge: ForecastPoint,
    /// Mean of the trailing reconciliation window.
    pub anchor: f64,
    /// Offset applied at the history boundary.
    pub offset: f64,
    pub changepoints: Vec<Changepoint>,
    pub anomalies: Vec<AnomalyFlag>,
    /// Points that deviate from the model's in-sample fit.
    pub shocks: Vec<AnomalyFlag>,
    pub viewport: Viewport,
    pub summary: ForecastSummary,
}

/// Run the full pipeline on one series.
///
/// # Errors
/// Errors from any stage propagate unchanged: `InsufficientHistory`,
/// `EmptyForecast`, `MalformedCurve`, `InsufficientVariance`, or
/// `InvalidParameter` for a bad configuration.
pub fn reconcile(
    history: &TimeSeries,
    forecast: &ForecastCurve,
    raw_changepoints: &[RawChangepoint],
    config: &ReconcileConfig,
) -> Result<ReconciledOutput> {
    config.validate()?;

    let anchored = anchor_forecast(history, forecast, &config.anchor())?;
    let curve = apply_floor(&anchored.curve, &config.floor())?;

    let changepoints = annotate_changepoints(history, raw_changepoints, &config.changepoints())?;
    let anomalies = detect_anomalies(history, &config.anomalies())?;
    let shocks = detect_model_residual_shocks(history, forecast, config.shock_threshold);

    let viewport = optimize_viewport(history, &curve, &anomalies, &config.viewport())?;

    let last = history
        .last()
        .ok_or(ReconcileError::InsufficientHistory { needed: 1, got: 0 })?;
    let bridge_value = soft_floor(anchored.anchor, config.floor_value, config.floor_smoothing);
    let bridge = ForecastPoint::new(last.timestamp, bridge_value, bridge_value, bridge_value);
    let summary = summarize(
        history,
        &curve,
        anchored.anchor,
        &anomalies,
        config.reconciliation_window,
        config.baseline_window,
    );

    debug!(
        history = history.len(),
        forecast = forecast.len(),
        changepoints = changepoints.len(),
        anomalies = anomalies.len(),
        shocks = shocks.len(),
        "reconciled forecast"
    );

    Ok(ReconciledOutput {
        curve,
        bridge,
        anchor: anchored.anchor,
        offset: anchored.offset,
        changepoints,
        anomalies,
        shocks,
        viewport,
        summary,
    })
}

/// One independently reconciled slice of the data, e.g. a region.
#[derive(Debug, Clone)]
pub struct Segment {
    pub name: String,
    pub history: TimeSeries,
    pub forecast: ForecastCurve,
    pub changepoints: Vec<RawChangepoint>,
}

/// Reconcile many segments in parallel.
///
/// Results keep the input order. A failing segment yields its error
/// without affecting the others.
pub fn reconcile_segments(
    segments: &[Segment],
    config: &ReconcileConfig,
) -> Vec<(String, Result<ReconciledOutput>)> {
    segments
        .par_iter()
        .map(|s| {
            let result = reconcile(&s.history, &s.forecast, &s.changepoints, config);
            if let Err(e) = &result {
                debug!(segment = %s.name, error = %e, "segment failed to reconcile");
            }
            (s.name.clone(), result)
        })
        .collect()
}
