//! Custom error types for kgi-trader
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions. Errors stop at the session boundary: the
//! `SessionManager` turns them into boolean outcomes and journal events.

use thiserror::Error;

/// The main error type for kgi-trader operations
#[derive(Error, Debug)]
pub enum TraderError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Errors raised by the brokerage SDK or its bridge
    #[error("Broker error: {0}")]
    Broker(String),

    /// Credentials rejected or no accounts returned
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Invalid input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },
}

impl TraderError {
    /// Create a "not found" error for accounts
    pub fn account_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Account",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error came from the collaborator transport
    pub fn is_broker(&self) -> bool {
        matches!(self, Self::Broker(_))
    }
}

impl From<std::io::Error> for TraderError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for TraderError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<reqwest::Error> for TraderError {
    fn from(err: reqwest::Error) -> Self {
        Self::Broker(err.to_string())
    }
}

/// Result type alias for kgi-trader operations
pub type TraderResult<T> = Result<T, TraderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TraderError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = TraderError::account_not_found("S1");
        assert_eq!(err.to_string(), "Account not found: S1");
        assert!(err.is_not_found());
        assert!(!err.is_broker());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let trader_err: TraderError = io_err.into();
        assert!(matches!(trader_err, TraderError::Io(_)));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err();
        let trader_err: TraderError = json_err.into();
        assert!(matches!(trader_err, TraderError::Json(_)));
    }
}
