//! Configuration for the relay: the ordered backend chain plus ambient
//! settings (timeouts, soft-error policy, logging)

mod backend;
mod loader;
mod logging_config;
mod relay_config;
mod timeouts;

pub use backend::{BackendConfig, mask_credential};
pub use loader::ENV_PREFIX;
pub use logging_config::{LogFormat, LoggingConfig};
pub use relay_config::RelayConfig;
pub use timeouts::TimeoutConfig;
