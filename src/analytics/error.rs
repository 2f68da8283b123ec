//! Errors raised by the analytics operations

use thiserror::Error;

/// Errors that can occur while computing an analysis
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyticsError {
    #[error("Division by zero: overall total is 0 while dividing {numerator}")]
    DivisionByZero { numerator: f64 },

    #[error("Invalid granularity: {0} (expected month or year)")]
    InvalidGranularity(String),

    #[error("Invalid segment bounds {bounds:?}: {reason}")]
    InvalidSegmentBounds { bounds: Vec<f64>, reason: String },

    #[error("Invalid limit: {0}, must be greater than 0")]
    InvalidLimit(usize),
}

/// Result type for analytics operations
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;
