//! UnifiedError trait implementation for RelayError

use super::types::{RelayError, UnifiedError};

impl UnifiedError for RelayError {
    fn error_code(&self) -> &str {
        match self {
            Self::Config { .. } => "RELAY_CONFIG",
            Self::Backend { .. } => "RELAY_BACKEND",
            Self::Http { .. } => "RELAY_HTTP",
            Self::Json { .. } => "RELAY_JSON",
            Self::InvalidInput { .. } => "RELAY_INVALID_INPUT",
            Self::Timeout { .. } => "RELAY_TIMEOUT",
            Self::Cancelled => "RELAY_CANCELLED",
            Self::Io { .. } => "RELAY_IO",
        }
    }

    fn message(&self) -> &str {
        match self {
            Self::Config { message, .. } => message,
            Self::Backend { message, .. } => message,
            Self::Http { message, .. } => message,
            Self::Json { message, .. } => message,
            Self::InvalidInput { message, .. } => message,
            Self::Timeout { message, .. } => message,
            Self::Cancelled => "Request was cancelled",
            Self::Io { message, .. } => message,
        }
    }

    fn context(&self) -> Option<&str> {
        match self {
            Self::Config { context, .. } => context.as_deref(),
            Self::Backend { context, .. } => context.as_deref(),
            Self::Http { context, .. } => context.as_deref(),
            Self::Json { context, .. } => context.as_deref(),
            Self::InvalidInput { context, .. } => context.as_deref(),
            Self::Timeout { context, .. } => context.as_deref(),
            Self::Cancelled => None,
            Self::Io { context, .. } => context.as_deref(),
        }
    }

    // Cancellation aborts the current attempt only; it is never a reason to
    // try the next backend.
    fn triggers_fallback(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}
