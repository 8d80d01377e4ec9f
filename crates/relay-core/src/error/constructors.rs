//! Constructor methods for RelayError

use super::types::RelayError;

impl RelayError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: None,
        }
    }

    /// Create a configuration error with context
    pub fn config_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create a new backend error
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
            backend: None,
            status_code: None,
            context: None,
        }
    }

    /// Create a backend error attributed to a named backend
    pub fn backend_named(message: impl Into<String>, backend: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
            backend: Some(backend.into()),
            status_code: None,
            context: None,
        }
    }

    /// Create a backend error carrying the HTTP status the backend returned
    pub fn backend_with_status(message: impl Into<String>, status_code: u16) -> Self {
        Self::Backend {
            message: message.into(),
            backend: None,
            status_code: Some(status_code),
            context: None,
        }
    }

    /// Create an HTTP error with message
    pub fn http(message: impl Into<String>) -> Self {
        Self::Http {
            message: message.into(),
            url: None,
            status_code: None,
            context: None,
        }
    }

    /// Create a JSON error with message
    pub fn json(message: impl Into<String>) -> Self {
        Self::Json {
            message: message.into(),
            context: None,
        }
    }

    /// Create an invalid input error with field
    pub fn invalid_input_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: Some(field.into()),
            context: None,
        }
    }

    /// Create a new timeout error
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
            context: None,
        }
    }

    /// Create an IO error with message
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            context: None,
        }
    }

    /// Add context to any error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        let ctx = Some(context.into());
        match &mut self {
            Self::Config { context: c, .. } => *c = ctx,
            Self::Backend { context: c, .. } => *c = ctx,
            Self::Http { context: c, .. } => *c = ctx,
            Self::Json { context: c, .. } => *c = ctx,
            Self::InvalidInput { context: c, .. } => *c = ctx,
            Self::Timeout { context: c, .. } => *c = ctx,
            Self::Io { context: c, .. } => *c = ctx,
            Self::Cancelled => {}
        }
        self
    }

    /// Attribute a backend error to a named backend; other variants pass through
    pub fn for_backend(mut self, name: impl Into<String>) -> Self {
        if let Self::Backend { backend, .. } = &mut self {
            if backend.is_none() {
                *backend = Some(name.into());
            }
        }
        self
    }
}
