//! Error handling for fieldhist
//!
//! This module defines the error types used throughout the crate,
//! providing clear error messages and proper error propagation.

use std::io;
use thiserror::Error;

/// Result type alias for fieldhist operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for fieldhist operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Regex compilation failed
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Home directory could not be determined
    #[error("Home directory not found")]
    HomeDirectoryNotFound,

    /// Invalid command line arguments
    #[error("Invalid arguments: {message}")]
    InvalidArguments { message: String },

    /// Tag has no stored history
    #[error("No history stored for tag: {tag}")]
    TagNotFound { tag: String },

    /// Invalid timestamp value
    #[error("Invalid timestamp: {timestamp}")]
    InvalidTimestamp { timestamp: String },

    /// Configuration validation failed
    #[error("Configuration validation failed: {field} - {reason}")]
    ConfigValidation { field: String, reason: String },

    /// Generic error with custom message
    #[error("{message}")]
    Custom { message: String },
}

impl Error {
    /// Create a custom error with a message
    pub fn custom<S: Into<String>>(message: S) -> Self {
        Error::Custom {
            message: message.into(),
        }
    }

    /// Create an invalid arguments error
    pub fn invalid_arguments<S: Into<String>>(message: S) -> Self {
        Error::InvalidArguments {
            message: message.into(),
        }
    }

    /// Create a config validation error
    pub fn config_validation<S: Into<String>>(field: S, reason: S) -> Self {
        Error::ConfigValidation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Check if this error is recoverable
    ///
    /// Storage failures are treated as recoverable: history is cache-like
    /// data and callers are expected to carry on without it.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::InvalidArguments { .. } => false,
            Error::HomeDirectoryNotFound => false,
            Error::ConfigValidation { .. } => false,
            _ => true,
        }
    }

    /// Get the error category for logging purposes
    pub fn category(&self) -> &'static str {
        match self {
            Error::Io(_) => "io",
            Error::Regex(_) => "regex",
            Error::Json(_) => "json",
            Error::Database(_) => "database",
            Error::HomeDirectoryNotFound => "system",
            Error::InvalidArguments { .. } => "arguments",
            Error::TagNotFound { .. } => "history",
            Error::InvalidTimestamp { .. } => "timestamp",
            Error::ConfigValidation { .. } => "config",
            Error::Custom { .. } => "custom",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_error() {
        let err = Error::custom("test message");
        assert_eq!(err.to_string(), "test message");
        assert_eq!(err.category(), "custom");
    }

    #[test]
    fn test_invalid_arguments_error() {
        let err = Error::invalid_arguments("missing tag");
        assert_eq!(err.to_string(), "Invalid arguments: missing tag");
        assert_eq!(err.category(), "arguments");
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_config_validation_error() {
        let err = Error::config_validation("field.max_history_values", "must be positive");
        assert_eq!(
            err.to_string(),
            "Configuration validation failed: field.max_history_values - must be positive"
        );
        assert_eq!(err.category(), "config");
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_tag_not_found() {
        let err = Error::TagNotFound {
            tag: "login_field".to_string(),
        };
        assert_eq!(err.to_string(), "No history stored for tag: login_field");
        assert_eq!(err.category(), "history");
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_database_error_is_recoverable() {
        let err: Error = rusqlite::Error::InvalidQuery.into();
        assert_eq!(err.category(), "database");
        assert!(err.is_recoverable());
    }
}
