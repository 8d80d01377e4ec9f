//! Identifier resolution command

use colored::*;
use relay_core::{BackendRegistry, IdentifierResolver};

/// Print the spec a model maps to and its wire identifier
pub fn show(
    model: &str,
    backend: Option<&str>,
    credential: Option<&str>,
    base_url: Option<&str>,
) -> anyhow::Result<()> {
    let registry = BackendRegistry::builtin();
    let resolver = IdentifierResolver::new(registry.clone());

    let gateway = registry.find_spec_by_gateway(backend, credential, base_url);
    let spec = gateway.or_else(|| registry.find_spec_by_model(model));
    let resolved = resolver.resolve(model, gateway);

    match spec {
        Some(spec) => println!(
            "{} {} ({}, credential from {})",
            "spec:".bold(),
            spec.name.magenta(),
            spec.kind.as_str(),
            spec.credential_env_key
        ),
        None => println!("{} {}", "spec:".bold(), "none (passed through)".dimmed()),
    }
    println!("{} {}", "wire model:".bold(), resolved.green());
    Ok(())
}
