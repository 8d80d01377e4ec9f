//! Ordered multi-backend fallback
//!
//! A [`FallbackOrchestrator`] walks its backend chain one attempt at a
//! time. Each attempt binds credentials, resolves the model identifier and
//! invokes the backend; the outcome (success, soft error, hard error) is
//! fed to a [`FallbackRun`] that decides whether to stop or continue.

mod builder;
mod orchestrator;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use builder::FallbackOrchestratorBuilder;
pub use orchestrator::FallbackOrchestrator;
pub use state::{AttemptOutcome, ChainState, EXHAUSTED_HEADER, FallbackRun, aggregate_error};
pub use types::{
    ChatRequest, DEFAULT_ERROR_SENTINEL, FailureKind, FailureSummary, FallbackEvent,
    FallbackEventKind, SoftErrorPolicy, slot_label,
};
