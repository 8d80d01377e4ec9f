//! Orchestrator tests over a scripted transport

mod chain;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::config::BackendConfig;
use crate::error::{RelayError, RelayResult};
use crate::llm::messages::ChatMessage;
use crate::llm::transport::{ChatTransport, RawCompletion, TransportRequest};

use super::{ChatRequest, FallbackOrchestrator};

type Reply = Arc<dyn Fn() -> RelayResult<RawCompletion> + Send + Sync>;

/// Transport that answers per base URL and records every request
#[derive(Default)]
pub(super) struct ScriptedTransport {
    replies: Mutex<HashMap<String, Reply>>,
    calls: Mutex<Vec<TransportRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on(
        &self,
        base_url: &str,
        reply: impl Fn() -> RelayResult<RawCompletion> + Send + Sync + 'static,
    ) {
        self.replies
            .lock()
            .insert(base_url.to_string(), Arc::new(reply));
    }

    pub fn calls(&self) -> Vec<TransportRequest> {
        self.calls.lock().clone()
    }

    /// Base URLs in the order they were called
    pub fn call_order(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .map(|r| r.base_url.clone().unwrap_or_default())
            .collect()
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    async fn complete(&self, request: TransportRequest) -> RelayResult<RawCompletion> {
        let base_url = request.base_url.clone().unwrap_or_default();
        self.calls.lock().push(request);
        let reply = self.replies.lock().get(&base_url).cloned();
        match reply {
            Some(reply) => reply(),
            None => Err(RelayError::http(format!("no route to {}", base_url))),
        }
    }
}

pub(super) fn ok(text: &'static str) -> impl Fn() -> RelayResult<RawCompletion> + Send + Sync {
    move || Ok(RawCompletion::from_text(text, "stop"))
}

pub(super) fn refused() -> impl Fn() -> RelayResult<RawCompletion> + Send + Sync {
    || Err(RelayError::http("connection refused"))
}

/// Backend entry with a distinct base URL the transport routes on
pub(super) fn backend(name: &str, model: &str, base_url: &str) -> BackendConfig {
    BackendConfig::new(name, model).with_base_url(base_url)
}

pub(super) fn orchestrator(
    transport: Arc<ScriptedTransport>,
    backends: Vec<BackendConfig>,
) -> FallbackOrchestrator {
    FallbackOrchestrator::builder()
        .transport(transport)
        .backends(backends)
        .build()
        .unwrap()
}

pub(super) fn request() -> ChatRequest {
    ChatRequest::new(vec![ChatMessage::user("hello")])
}
