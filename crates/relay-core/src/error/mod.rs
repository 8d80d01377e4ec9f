//! Error types for Relay
//!
//! Every failure the library can produce is a [`RelayError`]. All variants
//! implement [`UnifiedError`], which exposes:
//! - error_code: A stable identifier for programmatic handling
//! - message: Human-readable error message
//! - context: Optional additional context about where the error occurred
//! - triggers_fallback: Whether the orchestrator should move to the next backend

mod constructors;
mod conversions;
mod types;
mod unified_error;

pub use types::{RelayError, RelayResult, UnifiedError};
