//! Credential propagation
//!
//! Credentials reach the transport explicitly through the request. The
//! [`CredentialStore`] side channel exists for collaborators that only read
//! shared configuration (typically the process environment); every write to
//! it goes through [`CredentialBinder`], which holds a single lock.

mod binder;
mod store;

pub use binder::{BindPolicy, CredentialBinder};
pub use store::{CredentialStore, EnvCredentialStore, MemoryCredentialStore};
