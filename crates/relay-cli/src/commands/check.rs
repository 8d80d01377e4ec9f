//! Configuration validation command

use crate::console::CliConsole;
use anyhow::Context;
use colored::*;
use relay_core::config::mask_credential;
use relay_core::fallback::slot_label;
use relay_core::RelayConfig;

/// Load and validate a config file, then print the chain
pub fn validate(config_file: &str) -> anyhow::Result<()> {
    let console = CliConsole::new(true);
    console.print_header("Configuration Validation");

    let config = match RelayConfig::from_file(config_file) {
        Ok(config) => config,
        Err(e) => {
            console.error(&format!("{e}"));
            return Err(e).with_context(|| format!("Invalid configuration: {config_file}"));
        }
    };
    console.success(&format!("Loaded configuration from: {config_file}"));

    for (index, backend) in config.backends.iter().enumerate() {
        console.info(&slot_label(index, &backend.backend_name, &backend.model).bold().to_string());
        console.detail(&format!(
            "credential: {}",
            backend
                .credential()
                .map(mask_credential)
                .unwrap_or_else(|| "(from environment)".to_string())
        ));
        if let Some(base_url) = backend.base_url() {
            console.detail(&format!("base url: {base_url}"));
        }
        if !backend.extra_headers.is_empty() {
            console.detail(&format!(
                "headers: {}",
                backend.extra_headers.keys().cloned().collect::<Vec<_>>().join(", ")
            ));
        }
    }

    console.info(&format!(
        "Timeouts: connect {}s, request {}s",
        config.timeouts.connection_timeout_secs, config.timeouts.request_timeout_secs
    ));
    console.info(&format!(
        "Soft errors: sentinel detection {}",
        if config.soft_errors.detect_sentinel {
            "on".green()
        } else {
            "off".yellow()
        }
    ));
    Ok(())
}
