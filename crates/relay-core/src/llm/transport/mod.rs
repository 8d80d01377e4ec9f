//! Chat-completion transport
//!
//! The orchestrator only depends on [`ChatTransport`]: a flat request in,
//! an OpenAI-compatible reply object out. [`HttpTransport`] is the bundled
//! implementation; tests and embedders can supply their own.

mod http;
mod types;


use crate::error::RelayResult;
use async_trait::async_trait;

pub use http::{DEFAULT_BASE_URL, HttpTransport};
pub use types::{
    RawChoice, RawCompletion, RawFunctionCall, RawMessage, RawToolCall, RawUsage,
    TransportRequest,
};

/// One request/response cycle against one backend endpoint.
///
/// Implementations must return `Err` for transport failures, timeouts,
/// non-2xx statuses and undecodable payloads; the orchestrator treats every
/// such error (except [`crate::error::RelayError::Cancelled`]) as a reason to
/// try the next backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn complete(&self, request: TransportRequest) -> RelayResult<RawCompletion>;
}
