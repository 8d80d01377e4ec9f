//! Shared credential stores

use std::collections::HashMap;

use parking_lot::RwLock;

/// Shared key/value configuration that credentials are published into
pub trait CredentialStore: Send + Sync + std::fmt::Debug {
    /// Current value, `None` when unset or empty
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str);

    fn is_set(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

/// Process environment.
///
/// Writes are visible to every thread and every other request in the
/// process: two concurrent requests binding different credentials under the
/// same variable race, and the last writer wins. Prefer
/// [`MemoryCredentialStore`] unless a downstream library only reads the
/// environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentialStore;

impl CredentialStore for EnvCredentialStore {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.is_empty())
    }

    fn set(&self, key: &str, value: &str) {
        // SAFETY: callers serialize writes through `CredentialBinder`; reads
        // from other threads outside that lock are the documented hazard.
        unsafe {
            std::env::set_var(key, value);
        }
    }
}

/// In-process store, isolated from the environment
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `entries`
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let values = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            values: RwLock::new(values),
        }
    }

    /// Copy of every entry
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.values.read().clone()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .get(key)
            .filter(|v| !v.is_empty())
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values.write().insert(key.to_string(), value.to_string());
    }
}
