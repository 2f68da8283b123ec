//! Unified error handling for the gold-analytics crate
//!
//! This module provides a unified error type that consolidates all domain-specific
//! errors into a single `Error` enum, while maintaining the ability to use
//! domain-specific errors when needed.
//!
//! # Architecture
//!
//! - [`AnalyticsErrorTrait`] - Common interface implemented by all error types
//! - [`ErrorCategory`] - Classification of errors for handling strategies
//! - [`Error`] - Unified error enum wrapping all domain-specific errors
//!
//! # Usage
//!
//! ```rust
//! use gold_analytics::error::{AnalyticsErrorTrait, Error, ErrorCategory};
//!
//! fn report(err: &Error) {
//!     match err.category() {
//!         ErrorCategory::Input => eprintln!("Check the table extracts: {}", err.summary()),
//!         _ => eprintln!("Fatal error: {err}"),
//!     }
//! }
//! # report(&Error::config("ranking_limit must be greater than 0"));
//! ```

use std::io;
use thiserror::Error;

// Re-export domain-specific errors for convenience
pub use crate::analytics::error::AnalyticsError;
pub use crate::storage::LoadError;

/// Common trait for all gold-analytics error types
pub trait AnalyticsErrorTrait: std::error::Error {
    /// Check if this error is recoverable (the same call could succeed if retried)
    fn is_recoverable(&self) -> bool;

    /// Short user-facing description
    fn summary(&self) -> String;

    /// Get the error category for handling strategies
    fn category(&self) -> ErrorCategory;
}

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Undefined computation over the loaded data
    Computation,
    /// Unreadable or malformed input tables
    Input,
    /// Configuration and validation errors
    Config,
    /// Other/unknown errors
    Other,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Computation => "computation error",
            Self::Input => "input error",
            Self::Config => "configuration error",
            Self::Other => "other error",
        }
    }
}

impl AnalyticsErrorTrait for AnalyticsError {
    fn is_recoverable(&self) -> bool {
        // Pure computations fail the same way on the same input
        false
    }

    fn summary(&self) -> String {
        match self {
            Self::DivisionByZero { .. } => "overall sales are zero, shares are undefined".to_string(),
            Self::InvalidGranularity(value) => format!("unknown granularity '{value}'"),
            Self::InvalidSegmentBounds { reason, .. } => format!("invalid segment bounds: {reason}"),
            Self::InvalidLimit(limit) => format!("invalid limit {limit}"),
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::DivisionByZero { .. } => ErrorCategory::Computation,
            Self::InvalidGranularity(_) | Self::InvalidSegmentBounds { .. } | Self::InvalidLimit(_) => {
                ErrorCategory::Config
            }
        }
    }
}

impl AnalyticsErrorTrait for LoadError {
    fn is_recoverable(&self) -> bool {
        // A missing file may appear later; malformed content will not fix itself
        matches!(self, Self::Io { .. })
    }

    fn summary(&self) -> String {
        match self {
            Self::Io { path, .. } => format!("cannot read {}", path.display()),
            Self::Csv {
                source_name, line, ..
            } => format!("malformed row {line} in {source_name}"),
            Self::InvalidDate {
                source_name,
                line,
                value,
            } => format!("bad date '{value}' on row {line} in {source_name}"),
            Self::DuplicateKey { table, key } => format!("{table} key {key} appears twice"),
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Input
    }
}

/// Unified error type for the gold-analytics crate
#[derive(Error, Debug)]
pub enum Error {
    /// Analytics computation errors
    #[error("Analytics error: {0}")]
    Analytics(#[from] AnalyticsError),

    /// Table loading errors
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{context}")]
    Other {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl AnalyticsErrorTrait for Error {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::Analytics(e) => e.is_recoverable(),
            Self::Load(e) => e.is_recoverable(),
            Self::Io(_) => true, // I/O errors are often transient
            Self::Json(_) => false,
            Self::Config(_) => false,
            Self::Other { .. } => false,
        }
    }

    fn summary(&self) -> String {
        match self {
            Self::Analytics(e) => e.summary(),
            Self::Load(e) => e.summary(),
            Self::Io(e) => format!("I/O failure: {e}"),
            Self::Json(e) => format!("JSON failure: {e}"),
            Self::Config(msg) => format!("bad configuration: {msg}"),
            Self::Other { context, .. } => context.clone(),
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Analytics(e) => e.category(),
            Self::Load(e) => e.category(),
            Self::Io(_) => ErrorCategory::Input,
            Self::Json(_) => ErrorCategory::Other,
            Self::Config(_) => ErrorCategory::Config,
            Self::Other { .. } => ErrorCategory::Other,
        }
    }
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a generic error with context
    pub fn other(context: impl Into<String>) -> Self {
        Self::Other {
            context: context.into(),
            source: None,
        }
    }

    /// Create a generic error with context and source
    pub fn with_source(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Other {
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Conversion from anyhow::Error
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other {
            context: err.to_string(),
            source: None,
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category() {
        let err = Error::Analytics(AnalyticsError::DivisionByZero { numerator: 0.0 });
        assert_eq!(err.category(), ErrorCategory::Computation);

        let err = Error::Load(LoadError::DuplicateKey {
            table: "product",
            key: 3,
        });
        assert_eq!(err.category(), ErrorCategory::Input);
    }

    #[test]
    fn test_is_recoverable() {
        let io = LoadError::Io {
            path: "missing.csv".into(),
            source: io::Error::new(io::ErrorKind::NotFound, "File not found"),
        };
        assert!(Error::from(io).is_recoverable());

        let err = Error::from(AnalyticsError::InvalidLimit(0));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_error_conversion() {
        let unified: Error = AnalyticsError::InvalidGranularity("week".to_string()).into();
        assert!(matches!(unified, Error::Analytics(_)));
        assert!(unified.summary().contains("week"));
    }

    #[test]
    fn test_config_error() {
        let err = Error::config("ranking_limit must be greater than 0");
        assert_eq!(err.category(), ErrorCategory::Config);
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_other_error() {
        let err = Error::other("Something went wrong");
        assert_eq!(err.category(), ErrorCategory::Other);
        assert_eq!(err.to_string(), "Something went wrong");
    }
}
