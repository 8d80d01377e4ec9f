//! Model identifier rewriting
//!
//! Turns the identifier a caller configured into the one a backend expects
//! on the wire. Resolution is idempotent: feeding a resolved identifier
//! back in returns it unchanged.

use std::sync::Arc;

use tracing::debug;

use crate::registry::{BackendRegistry, BackendSpec};

/// Rewrites model identifiers using a [`BackendRegistry`]
#[derive(Debug, Clone)]
pub struct IdentifierResolver {
    registry: Arc<BackendRegistry>,
}

impl IdentifierResolver {
    pub fn new(registry: Arc<BackendRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &BackendRegistry {
        &self.registry
    }

    /// Wire identifier for `model`.
    ///
    /// With a gateway spec, the gateway's prefix rule applies. Otherwise the
    /// registry is consulted by model; an unknown identifier passes through.
    pub fn resolve(&self, model: &str, gateway: Option<&BackendSpec>) -> String {
        let resolved = match gateway {
            Some(spec) => resolve_for_gateway(model, spec),
            None => match self.registry.find_spec_by_model(model) {
                Some(spec) => resolve_for_standard(model, spec),
                None => model.to_string(),
            },
        };
        if resolved != model {
            debug!(model = %model, resolved = %resolved, "Rewrote model identifier");
        }
        resolved
    }
}

impl Default for IdentifierResolver {
    fn default() -> Self {
        Self::new(BackendRegistry::builtin())
    }
}

fn resolve_for_gateway(model: &str, spec: &BackendSpec) -> String {
    let bare = if spec.strip_existing_prefix {
        model.rsplit_once('/').map_or(model, |(_, name)| name)
    } else {
        model
    };
    match spec.identifier_prefix {
        Some(prefix) if !has_prefix(bare, prefix) => format!("{}/{}", prefix, bare),
        _ => bare.to_string(),
    }
}

fn resolve_for_standard(model: &str, spec: &BackendSpec) -> String {
    match spec.identifier_prefix {
        Some(prefix) if !spec.is_already_qualified(model) => {
            format!("{}/{}", prefix, model)
        }
        _ => model.to_string(),
    }
}

fn has_prefix(model: &str, prefix: &str) -> bool {
    model
        .strip_prefix(prefix)
        .is_some_and(|rest| rest.starts_with('/'))
}
