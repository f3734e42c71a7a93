//! Shock detection against the model's in-sample fit.
//!
//! Complements the rolling detector: history is joined with the overlap
//! region of the raw forecast, and each residual `y - yhat` is standardized
//! against the mean and standard deviation of all joined residuals.
//!
//! Scores are centred: they differ from the plain `residual / std` score
//! whenever the fit carries a bias, and counts will be lower than that
//! score gives for a fit that sits consistently above or below history.

use crate::core::{AnomalyFlag, ForecastCurve, TimeSeries};
use crate::utils::{mean, std_dev};
use tracing::debug;

/// Default absolute z-score for a shock.
pub const DEFAULT_SHOCK_THRESHOLD: f64 = 3.0;

/// Flag history points whose residual against the model fit lies more than
/// `threshold` standard deviations from the mean residual.
///
/// Only timestamps present in both series take part. Fewer than two joined
/// residuals, or residuals without spread, yield no shocks.
pub fn detect_model_residual_shocks(
    history: &TimeSeries,
    forecast: &ForecastCurve,
    threshold: f64,
) -> Vec<AnomalyFlag> {
    let joined: Vec<(usize, f64)> = forecast
        .points()
        .iter()
        .filter_map(|p| {
            history
                .index_of(&p.timestamp)
                .map(|i| (i, history.values()[i] - p.yhat))
        })
        .collect();

    if joined.len() < 2 {
        return Vec::new();
    }

    let residuals: Vec<f64> = joined.iter().map(|&(_, r)| r).collect();
    let centre = mean(&residuals);
    let sd = std_dev(&residuals);
    if !(sd > 0.0) {
        return Vec::new();
    }

    let shocks: Vec<AnomalyFlag> = joined
        .into_iter()
        .filter_map(|(i, r)| {
            let z = (r - centre) / sd;
            (z.abs() > threshold).then(|| AnomalyFlag {
                timestamp: history.timestamps()[i],
                value: history.values()[i],
                z_score: z,
            })
        })
        .collect();

    debug!(
        joined = residuals.len(),
        residual_sd = sd,
        shocks = shocks.len(),
        "detected model residual shocks"
    );
    shocks
}
