//! Chat-completion plumbing: message types, the transport seam, the
//! single-backend invoker and reply normalization

pub mod invoker;
pub mod messages;
pub mod parsers;
pub mod response;
pub mod transport;

pub use invoker::{BackendCall, BackendInvoker};
pub use messages::{ChatMessage, FunctionDefinition, MessageRole, ToolDefinition};
pub use response::{CanonicalResponse, FinishReason, TokenUsage, ToolCallRequest};
pub use transport::{ChatTransport, HttpTransport, RawCompletion, TransportRequest};
