//! Binding backend credentials into a shared store

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use super::store::CredentialStore;
use crate::registry::BackendSpec;

/// Whether a bind may replace a value already present in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindPolicy {
    /// Always write
    Overwrite,
    /// Write only when the key is unset
    IfUnset,
}

impl BindPolicy {
    /// Policy for the credential of chain slot `slot`.
    ///
    /// Fallback slots and gateways always overwrite; the primary in standard
    /// mode keeps an externally configured value.
    pub fn for_slot(slot: usize, gateway: bool) -> Self {
        if slot > 0 || gateway {
            Self::Overwrite
        } else {
            Self::IfUnset
        }
    }
}

impl fmt::Display for BindPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overwrite => write!(f, "overwrite"),
            Self::IfUnset => write!(f, "if-unset"),
        }
    }
}

/// Publishes credentials into a [`CredentialStore`], one bind at a time
pub struct CredentialBinder {
    store: Arc<dyn CredentialStore>,
    lock: Mutex<()>,
}

impl CredentialBinder {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self {
            store,
            lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// Bind for chain slot `slot`, choosing the policy with
    /// [`BindPolicy::for_slot`]
    pub fn bind_for_slot(
        &self,
        spec: &BackendSpec,
        credential: Option<&str>,
        base_url: Option<&str>,
        model: &str,
        slot: usize,
    ) -> Option<String> {
        let policy = BindPolicy::for_slot(slot, spec.is_gateway());
        self.bind(spec, credential, base_url, model, policy)
    }

    /// Publish `credential` under the spec's key and its auxiliary entries.
    ///
    /// Auxiliary entries are always written only when unset. Returns the
    /// credential the request should carry: the configured one, else the
    /// store's current value for the spec's key.
    pub fn bind(
        &self,
        spec: &BackendSpec,
        credential: Option<&str>,
        base_url: Option<&str>,
        model: &str,
        policy: BindPolicy,
    ) -> Option<String> {
        let credential = credential.filter(|c| !c.is_empty());
        let _guard = self.lock.lock();

        if let Some(value) = credential {
            let key = spec.credential_env_key;
            let write = match policy {
                BindPolicy::Overwrite => true,
                BindPolicy::IfUnset => !self.store.is_set(key),
            };
            if write {
                self.store.set(key, value);
            }
            debug!(
                backend = spec.name,
                model = %model,
                key = key,
                policy = %policy,
                written = write,
                "Bound backend credential"
            );
        }

        let effective = credential
            .map(str::to_string)
            .or_else(|| self.store.get(spec.credential_env_key));

        let api_key = effective.as_deref().unwrap_or("");
        for (name, value) in spec.resolve_env_extras(api_key, base_url) {
            if !value.is_empty() && !self.store.is_set(name) {
                self.store.set(name, &value);
                debug!(backend = spec.name, key = name, "Bound auxiliary setting");
            }
        }

        effective
    }
}

impl fmt::Debug for CredentialBinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialBinder")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}
