//! Anomaly detection over historical series.
//!
//! - Rolling residual detection against a trailing baseline
//! - Shock detection against the model's in-sample fit

mod residual;
mod shocks;

pub use residual::{detect_anomalies, rolling_z_scores, AnomalyConfig};
pub use shocks::{detect_model_residual_shocks, DEFAULT_SHOCK_THRESHOLD};
