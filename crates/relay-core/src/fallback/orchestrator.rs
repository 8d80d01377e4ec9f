//! The fallback orchestrator

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use super::builder::FallbackOrchestratorBuilder;
use super::state::{AttemptOutcome, ChainState, FallbackRun};
use super::types::{ChatRequest, FallbackEvent, FallbackEventKind, SoftErrorPolicy, slot_label};
use crate::config::BackendConfig;
use crate::credential::CredentialBinder;
use crate::error::{RelayError, RelayResult, UnifiedError};
use crate::llm::invoker::{BackendCall, BackendInvoker};
use crate::llm::response::CanonicalResponse;
use crate::registry::BackendRegistry;
use crate::resolver::IdentifierResolver;

/// Longest slice of an error message carried into a log line
const LOG_PREVIEW_CHARS: usize = 200;

/// Satisfies a chat call by trying an ordered chain of backends.
///
/// Backends are tried strictly one at a time in configured order; the first
/// usable reply wins. Failures never escape [`chat`](Self::chat): an
/// exhausted chain comes back as an error-shaped [`CanonicalResponse`].
pub struct FallbackOrchestrator {
    pub(super) backends: Vec<BackendConfig>,
    pub(super) registry: Arc<BackendRegistry>,
    pub(super) resolver: IdentifierResolver,
    pub(super) binder: CredentialBinder,
    pub(super) invoker: BackendInvoker,
    pub(super) soft_errors: SoftErrorPolicy,
    pub(super) default_max_tokens: u32,
    pub(super) default_temperature: f32,
    pub(super) history: Mutex<VecDeque<FallbackEvent>>,
    pub(super) max_history: usize,
}

impl FallbackOrchestrator {
    pub fn builder() -> FallbackOrchestratorBuilder {
        FallbackOrchestratorBuilder::new()
    }

    /// Configured chain, primary first
    pub fn backends(&self) -> &[BackendConfig] {
        &self.backends
    }

    /// Model used when a request names none
    pub fn default_model(&self) -> &str {
        &self.backends[0].model
    }

    pub fn soft_error_policy(&self) -> &SoftErrorPolicy {
        &self.soft_errors
    }

    /// Recent fallback events, oldest first
    pub fn history(&self) -> Vec<FallbackEvent> {
        self.history.lock().iter().cloned().collect()
    }

    pub fn clear_history(&self) {
        self.history.lock().clear();
    }

    /// Run the chain. Always returns a well-formed reply.
    pub async fn chat(&self, request: ChatRequest) -> CanonicalResponse {
        let token = CancellationToken::new();
        match self.chat_with_cancellation(request, &token).await {
            Ok(reply) => reply,
            Err(e) => CanonicalResponse::error(e.to_string()),
        }
    }

    /// Run the chain until it finishes or `cancel` fires.
    ///
    /// Cancellation aborts the in-flight attempt and stops the chain. Apart
    /// from that, only a request without messages is rejected, before any
    /// backend is called.
    #[instrument(
        skip(self, request, cancel),
        fields(chain_len = self.backends.len(), model = request.model.as_deref().unwrap_or(""))
    )]
    pub async fn chat_with_cancellation(
        &self,
        request: ChatRequest,
        cancel: &CancellationToken,
    ) -> RelayResult<CanonicalResponse> {
        request.validate()?;
        let mut run = FallbackRun::new(self.backends.len());

        while let Some(index) = run.current() {
            if cancel.is_cancelled() {
                return Err(RelayError::Cancelled);
            }

            let backend = &self.backends[index];
            let model = self.model_for_slot(index, &request);
            let label = slot_label(index, &backend.backend_name, &model);
            let call = self.prepare_call(index, backend, &model, &request);

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(RelayError::Cancelled),
                result = self.invoker.invoke(&call, &request.messages, request.tools.as_deref()) => {
                    match result {
                        Err(e) if !e.triggers_fallback() => return Err(e),
                        Err(e) => AttemptOutcome::HardError(e),
                        Ok(reply) if self.soft_errors.is_soft_error(&reply) => {
                            AttemptOutcome::SoftError(reply)
                        }
                        Ok(reply) => AttemptOutcome::Success(reply),
                    }
                }
            };

            match run.record(label.clone(), outcome) {
                ChainState::Pending(next) => {
                    let Some(failure) = run.failures().last().cloned() else {
                        continue;
                    };
                    let next_backend = &self.backends[next];
                    let next_label =
                        slot_label(next, &next_backend.backend_name, &self.model_for_slot(next, &request));
                    warn!(
                        backend = %backend.backend_name,
                        index,
                        kind = %failure.kind,
                        next = %next_backend.backend_name,
                        error = %preview(&failure.message),
                        "{} failed, falling back to {}",
                        label,
                        next_label
                    );
                    self.record_event(FallbackEventKind::AttemptFailed {
                        failure,
                        next: next_label,
                    });
                }
                ChainState::Success(i) if i > 0 => {
                    info!(
                        backend = %backend.backend_name,
                        index = i,
                        failed_attempts = run.failures().len(),
                        "Recovered via {}",
                        label
                    );
                    self.record_event(FallbackEventKind::Recovered { index: i, label });
                }
                ChainState::Success(_) => {
                    debug!(backend = %backend.backend_name, "Primary backend succeeded");
                }
                ChainState::Exhausted => {
                    error!(
                        attempts = run.failures().len(),
                        last_error = %run.failures().last().map(|f| preview(&f.message)).unwrap_or_default(),
                        "All backends failed"
                    );
                    self.record_event(FallbackEventKind::Exhausted {
                        failures: run.failures().to_vec(),
                    });
                }
            }
        }

        Ok(run.into_response())
    }

    fn model_for_slot(&self, index: usize, request: &ChatRequest) -> String {
        let configured = &self.backends[index].model;
        if index == 0 {
            request
                .model
                .as_deref()
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .unwrap_or(configured)
                .to_string()
        } else {
            configured.clone()
        }
    }

    /// Bind credentials and resolve the identifier for one attempt
    fn prepare_call(
        &self,
        index: usize,
        backend: &BackendConfig,
        model: &str,
        request: &ChatRequest,
    ) -> BackendCall {
        let gateway = self.registry.find_spec_by_gateway(
            Some(&backend.backend_name),
            backend.credential(),
            backend.base_url(),
        );
        let spec = gateway.or_else(|| self.registry.find_spec_by_model(model));

        let resolved = self.resolver.resolve(model, gateway);
        let (credential, base_url) = match spec {
            Some(spec) => (
                self.binder.bind_for_slot(
                    spec,
                    backend.credential(),
                    backend.base_url(),
                    model,
                    index,
                ),
                spec.effective_base_url(backend.base_url()).map(str::to_string),
            ),
            None => (
                backend.credential().map(str::to_string),
                backend.base_url().map(str::to_string),
            ),
        };

        let max_tokens = backend
            .max_tokens
            .or(request.max_tokens)
            .unwrap_or(self.default_max_tokens);
        let temperature = backend
            .temperature
            .or(request.temperature)
            .unwrap_or(self.default_temperature);

        BackendCall {
            backend: backend.backend_name.clone(),
            model: resolved,
            credential,
            base_url,
            headers: backend.extra_headers.clone(),
            max_tokens,
            temperature: Some(temperature),
            routing_prefix: spec
                .and_then(|spec| spec.identifier_prefix)
                .map(str::to_string),
        }
    }

    fn record_event(&self, kind: FallbackEventKind) {
        let mut history = self.history.lock();
        history.push_back(FallbackEvent::new(kind));
        while history.len() > self.max_history {
            history.pop_front();
        }
    }
}

impl std::fmt::Debug for FallbackOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackOrchestrator")
            .field("backends", &self.backends)
            .field("soft_errors", &self.soft_errors)
            .field("max_history", &self.max_history)
            .finish_non_exhaustive()
    }
}

fn preview(message: &str) -> String {
    if message.chars().count() <= LOG_PREVIEW_CHARS {
        message.to_string()
    } else {
        let cut: String = message.chars().take(LOG_PREVIEW_CHARS).collect();
        format!("{}...", cut)
    }
}
