//! Core error types and traits for Relay

use thiserror::Error;

/// Result type alias for Relay operations
pub type RelayResult<T> = Result<T, RelayError>;

/// Unified error trait implemented by [`RelayError`].
///
/// - error_code(): Unique code for programmatic error identification
/// - message(): Human-readable error message
/// - context(): Optional additional context
/// - triggers_fallback(): Whether a failed attempt should advance the chain
pub trait UnifiedError: std::error::Error + Send + Sync {
    /// Get the error code for programmatic handling
    fn error_code(&self) -> &str;

    /// Get the human-readable error message
    fn message(&self) -> &str;

    /// Get optional context about the error
    fn context(&self) -> Option<&str> {
        None
    }

    /// Whether this error, raised by one backend attempt, should cause the
    /// next backend in the chain to be tried
    fn triggers_fallback(&self) -> bool {
        true
    }
}

/// Main error type for Relay
#[derive(Error, Debug, Clone)]
pub enum RelayError {
    /// Configuration or construction errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// A backend answered, but with a failure (non-2xx, malformed reply)
    #[error("Backend error: {message}")]
    Backend {
        message: String,
        backend: Option<String>,
        status_code: Option<u16>,
        context: Option<String>,
    },

    /// Transport failures (connect, DNS, TLS, body read)
    #[error("HTTP error: {message}")]
    Http {
        message: String,
        url: Option<String>,
        status_code: Option<u16>,
        context: Option<String>,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        context: Option<String>,
    },

    /// Invalid input errors
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        field: Option<String>,
        context: Option<String>,
    },

    /// Request timed out at the transport layer
    #[error("Request timed out: {message}")]
    Timeout {
        message: String,
        context: Option<String>,
    },

    /// The in-flight request was cancelled by the caller
    #[error("Request was cancelled")]
    Cancelled,

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        context: Option<String>,
    },
}
