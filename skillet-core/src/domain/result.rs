//! Result and error types for the core library

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Core library error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a backend error
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

/// Advisory message surfaced to the user after an operation
///
/// Services catch network/persistence failures at their boundary and report
/// them through this type instead of propagating errors (none are fatal).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Advisory {
    Info(String),
    Warning(String),
}

impl Advisory {
    pub fn text(&self) -> &str {
        match self {
            Advisory::Info(s) | Advisory::Warning(s) => s,
        }
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, Advisory::Warning(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_constructors() {
        let e = Error::not_found("no active session");
        assert!(e.to_string().contains("no active session"));

        let e = Error::validation("title cannot be empty");
        assert!(e.to_string().starts_with("Validation error"));
    }

    #[test]
    fn test_advisory_text() {
        let a = Advisory::Warning("could not reach server".to_string());
        assert!(a.is_warning());
        assert_eq!(a.text(), "could not reach server");
    }
}
