//! Error types for the anofox-reconcile library.

use thiserror::Error;

/// Result type alias for reconciliation operations.
pub type Result<T> = std::result::Result<T, ReconcileError>;

/// Errors that can occur while reconciling a forecast with its history.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReconcileError {
    /// History is empty or shorter than a stage requires.
    #[error("insufficient history: need at least {needed}, got {got}")]
    InsufficientHistory { needed: usize, got: usize },

    /// Forecast curve has no points.
    #[error("empty forecast curve")]
    EmptyForecast,

    /// Ordering or bound invariants of a forecast curve are violated.
    #[error("malformed forecast curve: {0}")]
    MalformedCurve(String),

    /// The viewport value pool is degenerate.
    #[error("insufficient variance: need at least 2 distinct values, got {distinct}")]
    InsufficientVariance { distinct: usize },

    /// Invalid configuration value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Timestamp-related error in a historical series.
    #[error("timestamp error: {0}")]
    TimestampError(String),

    /// Missing values detected when not allowed.
    #[error("missing values detected in data")]
    MissingValues,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_descriptive() {
        let err = ReconcileError::InsufficientHistory { needed: 1, got: 0 };
        assert_eq!(err.to_string(), "insufficient history: need at least 1, got 0");

        let err = ReconcileError::EmptyForecast;
        assert_eq!(err.to_string(), "empty forecast curve");

        let err = ReconcileError::MalformedCurve("yhat_lower > yhat at index 3".to_string());
        assert_eq!(
            err.to_string(),
            "malformed forecast curve: yhat_lower > yhat at index 3"
        );

        let err = ReconcileError::InsufficientVariance { distinct: 1 };
        assert_eq!(
            err.to_string(),
            "insufficient variance: need at least 2 distinct values, got 1"
        );

        let err = ReconcileError::InvalidParameter("window must be positive".to_string());
        assert_eq!(err.to_string(), "invalid parameter: window must be positive");
    }

    #[test]
    fn errors_are_clonable_and_comparable() {
        let err1 = ReconcileError::EmptyForecast;
        let err2 = err1.clone();
        assert_eq!(err1, err2);
        assert_ne!(err1, ReconcileError::MissingValues);
    }
}
