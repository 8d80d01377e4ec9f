//! Relay Core Library
//!
//! This crate satisfies a chat-completion request by trying an ordered chain
//! of LLM backends, rewriting model identifiers and credentials per backend
//! and normalizing every reply into one [`CanonicalResponse`].

pub mod config;
pub mod credential;
pub mod error;
pub mod fallback;
pub mod llm;
pub mod registry;
pub mod resolver;

// Re-export commonly used types
pub use config::{BackendConfig, RelayConfig, TimeoutConfig};
pub use credential::{CredentialStore, EnvCredentialStore, MemoryCredentialStore};
pub use error::{RelayError, RelayResult, UnifiedError};
pub use fallback::{ChatRequest, FallbackOrchestrator, FallbackOrchestratorBuilder, SoftErrorPolicy};
pub use llm::{
    CanonicalResponse, ChatMessage, ChatTransport, FinishReason, HttpTransport, TokenUsage,
    ToolCallRequest, ToolDefinition,
};
pub use registry::{BackendRegistry, BackendSpec, find_spec_by_gateway, find_spec_by_model};
pub use resolver::IdentifierResolver;
