//! Aggregation of event-level revenue into a historical series.
//!
//! Orders are reduced to one total per bucket (a day by default), counting
//! delivered orders only, which is the series the rest of the pipeline
//! consumes.

mod bucket;
mod records;

pub use bucket::{aggregate, recent_window, trailing_trend, AggregationConfig, Bucket};
pub use records::{OrderStatus, RevenueRecord};
