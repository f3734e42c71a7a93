//! Utility functions shared by the pipeline stages.

pub mod stats;

pub use stats::{mean, rank_bounds, softplus, std_dev, variance};
