//! One request/response cycle against one backend

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::error::RelayResult;
use crate::llm::messages::{ChatMessage, ToolDefinition};
use crate::llm::parsers::ResponseParser;
use crate::llm::response::CanonicalResponse;
use crate::llm::transport::{ChatTransport, TransportRequest};
use crate::registry::BackendRegistry;

/// Everything that varies per backend attempt
#[derive(Clone, Default, PartialEq)]
pub struct BackendCall {
    /// Backend name, for error attribution
    pub backend: String,
    /// Wire identifier, already resolved
    pub model: String,
    pub credential: Option<String>,
    pub base_url: Option<String>,
    pub headers: BTreeMap<String, String>,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
    /// Prefix the endpoint does not understand, stripped before sending
    pub routing_prefix: Option<String>,
}

impl std::fmt::Debug for BackendCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendCall")
            .field("backend", &self.backend)
            .field("model", &self.model)
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("routing_prefix", &self.routing_prefix)
            .finish()
    }
}

/// Dispatches a single call through a [`ChatTransport`] and normalizes the
/// reply.
///
/// Soft errors (`finish_reason = error`, sentinel text) come back as `Ok`;
/// classifying them is the orchestrator's job.
#[derive(Clone)]
pub struct BackendInvoker {
    transport: Arc<dyn ChatTransport>,
    registry: Arc<BackendRegistry>,
}

impl BackendInvoker {
    pub fn new(transport: Arc<dyn ChatTransport>, registry: Arc<BackendRegistry>) -> Self {
        Self {
            transport,
            registry,
        }
    }

    /// Build the outbound request for `call`
    pub fn build_request(
        &self,
        call: &BackendCall,
        messages: &[ChatMessage],
        tools: Option<&[ToolDefinition]>,
    ) -> TransportRequest {
        let mut request = TransportRequest::new(&call.model, messages.to_vec(), call.max_tokens);
        request.temperature = call.temperature;

        if let Some(tools) = tools.filter(|t| !t.is_empty()) {
            request.tools = Some(tools.to_vec());
            request.tool_choice = Some("auto".to_string());
        }

        if let Some(overrides) = self
            .registry
            .find_spec_by_model(&call.model)
            .and_then(|spec| spec.overrides_for(&call.model))
        {
            debug!(model = %call.model, ?overrides, "Applying parameter overrides");
            request.apply_overrides(overrides);
        }

        request.credential = call.credential.clone();
        request.base_url = call.base_url.clone();
        request.headers = call.headers.clone();
        request.routing_prefix = call.routing_prefix.clone();
        request
    }

    /// Perform one call. Fails with the transport's error, or a backend error
    /// when the reply has no choices.
    #[instrument(skip(self, call, messages, tools), fields(backend = %call.backend, model = %call.model))]
    pub async fn invoke(
        &self,
        call: &BackendCall,
        messages: &[ChatMessage],
        tools: Option<&[ToolDefinition]>,
    ) -> RelayResult<CanonicalResponse> {
        let request = self.build_request(call, messages, tools);
        debug!(max_tokens = request.max_tokens, "Dispatching completion");

        let raw = self
            .transport
            .complete(request)
            .await
            .map_err(|e| e.for_backend(&call.backend))?;

        ResponseParser::parse(raw).map_err(|e| e.for_backend(&call.backend))
    }
}

impl std::fmt::Debug for BackendInvoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendInvoker")
            .field("backends", &self.registry.all_specs().len())
            .finish_non_exhaustive()
    }
}
