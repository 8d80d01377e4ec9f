//! Builder for fallback orchestrators

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use super::orchestrator::FallbackOrchestrator;
use super::types::SoftErrorPolicy;
use crate::config::{BackendConfig, RelayConfig, TimeoutConfig};
use crate::credential::{CredentialBinder, CredentialStore, MemoryCredentialStore};
use crate::error::{RelayError, RelayResult};
use crate::llm::invoker::BackendInvoker;
use crate::llm::transport::{ChatTransport, HttpTransport};
use crate::registry::BackendRegistry;
use crate::resolver::IdentifierResolver;

const DEFAULT_MAX_HISTORY: usize = 100;

/// Builder for creating a [`FallbackOrchestrator`]
pub struct FallbackOrchestratorBuilder {
    backends: Vec<BackendConfig>,
    transport: Option<Arc<dyn ChatTransport>>,
    store: Option<Arc<dyn CredentialStore>>,
    registry: Option<Arc<BackendRegistry>>,
    timeouts: TimeoutConfig,
    soft_errors: SoftErrorPolicy,
    default_max_tokens: u32,
    default_temperature: f32,
    max_history: usize,
}

impl FallbackOrchestratorBuilder {
    pub fn new() -> Self {
        let defaults = RelayConfig::default();
        Self {
            backends: Vec::new(),
            transport: None,
            store: None,
            registry: None,
            timeouts: defaults.timeouts,
            soft_errors: defaults.soft_errors,
            default_max_tokens: defaults.default_max_tokens,
            default_temperature: defaults.default_temperature,
            max_history: DEFAULT_MAX_HISTORY,
        }
    }

    /// Take the chain and ambient settings from a loaded config
    pub fn config(mut self, config: &RelayConfig) -> Self {
        self.backends = config.backends.clone();
        self.timeouts = config.timeouts;
        self.soft_errors = config.soft_errors.clone();
        self.default_max_tokens = config.default_max_tokens;
        self.default_temperature = config.default_temperature;
        self
    }

    /// Append a backend to the chain
    pub fn backend(mut self, backend: BackendConfig) -> Self {
        self.backends.push(backend);
        self
    }

    /// Replace the whole chain
    pub fn backends(mut self, backends: Vec<BackendConfig>) -> Self {
        self.backends = backends;
        self
    }

    /// Transport used for every attempt. Defaults to [`HttpTransport`].
    pub fn transport(mut self, transport: Arc<dyn ChatTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Store credentials are published into. Defaults to a private
    /// [`MemoryCredentialStore`].
    pub fn credential_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn registry(mut self, registry: Arc<BackendRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Timeouts for the default transport
    pub fn timeouts(mut self, timeouts: TimeoutConfig) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn soft_errors(mut self, policy: SoftErrorPolicy) -> Self {
        self.soft_errors = policy;
        self
    }

    pub fn default_max_tokens(mut self, max_tokens: u32) -> Self {
        self.default_max_tokens = max_tokens;
        self
    }

    pub fn default_temperature(mut self, temperature: f32) -> Self {
        self.default_temperature = temperature;
        self
    }

    /// Set max history size
    pub fn max_history(mut self, max: usize) -> Self {
        self.max_history = max;
        self
    }

    /// Build the orchestrator.
    ///
    /// Fails with a configuration error on an empty chain or an invalid
    /// backend entry.
    pub fn build(self) -> RelayResult<FallbackOrchestrator> {
        if self.backends.is_empty() {
            return Err(RelayError::config(
                "At least one backend (the primary) must be configured",
            ));
        }
        for (index, backend) in self.backends.iter().enumerate() {
            backend
                .validate()
                .map_err(|e| e.with_context(format!("backends[{}]", index)))?;
        }

        let transport: Arc<dyn ChatTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new(self.timeouts)?),
        };
        let store: Arc<dyn CredentialStore> = match self.store {
            Some(store) => store,
            None => Arc::new(MemoryCredentialStore::new()),
        };
        let registry = self.registry.unwrap_or_else(BackendRegistry::builtin);

        debug!(
            chain = ?self
                .backends
                .iter()
                .map(|b| b.backend_name.as_str())
                .collect::<Vec<_>>(),
            "Built fallback orchestrator"
        );

        Ok(FallbackOrchestrator {
            resolver: IdentifierResolver::new(registry.clone()),
            invoker: BackendInvoker::new(transport, registry.clone()),
            binder: CredentialBinder::new(store),
            registry,
            backends: self.backends,
            soft_errors: self.soft_errors,
            default_max_tokens: self.default_max_tokens,
            default_temperature: self.default_temperature,
            history: Mutex::new(VecDeque::new()),
            max_history: self.max_history,
        })
    }
}

impl Default for FallbackOrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FallbackOrchestrator {
    /// Orchestrator over an [`HttpTransport`] built from `config`
    pub fn from_config(config: &RelayConfig) -> RelayResult<Self> {
        config.validate()?;
        Self::builder().config(config).build()
    }
}
