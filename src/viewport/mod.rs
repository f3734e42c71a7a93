//! Display range selection.
//!
//! The value axis is fitted to the heart of the combined history and
//! forecast distribution so that a single extreme point does not flatten
//! the rest of the chart.

mod bounds;
mod range;

pub use bounds::{coverage_bounds, optimize_viewport, value_pool, ViewportConfig};
pub use range::time_range;
