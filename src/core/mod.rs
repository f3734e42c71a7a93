//! Core data structures shared by every pipeline stage.

mod annotations;
mod forecast;
mod time_series;

pub use annotations::{AnomalyFlag, Changepoint, RawChangepoint, Viewport};
pub use forecast::{ForecastCurve, ForecastPoint, ReconciledCurve};
pub use time_series::{TimeSeries, TimeSeriesBuilder, TimeSeriesPoint};
