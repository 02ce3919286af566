//! Error types for tmstat
//!
//! This module defines the error types used throughout the tmstat crates.
//! All errors are derived from `thiserror` for convenient error handling
//! and automatic `From` implementations.
//!
//! # Example
//!
//! ```
//! use tmstat_core::error::{TmstatError, Result};
//!
//! fn example_function() -> Result<()> {
//!     // This will automatically convert serde_json::Error to TmstatError
//!     let _value: serde_json::Value = serde_json::from_str("{}")?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Main error type for tmstat operations
///
/// Every failure is fatal to the operation that raised it. Nothing in the
/// workspace retries; errors travel up to the CLI which reports and exits.
#[derive(Error, Debug)]
pub enum TmstatError {
    /// The carrier answered with a `responseCode` other than `OK`
    #[error("Server response error, code: {}", .code.as_deref().unwrap_or("<missing>"))]
    ServerResponse {
        /// The code returned by the server, if any
        code: Option<String>,
    },

    /// An authenticated operation was invoked without a bearer token
    #[error("Method requires an authentication token")]
    AuthenticationRequired,

    /// Phone number is empty or in international format
    #[error("Invalid subscriber number: {0}")]
    InvalidSubscriberNumber(String),

    /// The server said OK but the payload lacks something we need
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Network error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Invalid timezone
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl TmstatError {
    /// Build a server response error from the raw code
    pub fn server_response(code: Option<&str>) -> Self {
        Self::ServerResponse {
            code: code.map(str::to_string),
        }
    }

    /// The server code carried by this error, when it is a server response error
    pub fn server_code(&self) -> Option<&str> {
        match self {
            Self::ServerResponse { code } => code.as_deref(),
            _ => None,
        }
    }
}

/// Convenience type alias for Results in tmstat
///
/// # Example
///
/// ```
/// use tmstat_core::Result;
///
/// fn process_data() -> Result<String> {
///     Ok("Processed successfully".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, TmstatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = TmstatError::AuthenticationRequired;
        assert_eq!(
            error.to_string(),
            "Method requires an authentication token"
        );
    }

    #[test]
    fn test_server_response_display() {
        let error = TmstatError::server_response(Some("INVALID_PIN"));
        assert_eq!(error.to_string(), "Server response error, code: INVALID_PIN");
        assert_eq!(error.server_code(), Some("INVALID_PIN"));

        let error = TmstatError::server_response(None);
        assert_eq!(error.to_string(), "Server response error, code: <missing>");
        assert_eq!(error.server_code(), None);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let tmstat_error: TmstatError = io_error.into();
        assert!(matches!(tmstat_error, TmstatError::Io(_)));
    }
}
