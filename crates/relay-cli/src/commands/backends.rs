//! Registry listing command

use crate::console::CliConsole;
use colored::*;
use relay_core::BackendRegistry;

/// List every built-in backend spec
pub fn list(verbose: bool) -> anyhow::Result<()> {
    let console = CliConsole::new(verbose);
    console.print_header("Backends");

    let registry = BackendRegistry::builtin();
    for spec in registry.all_specs() {
        println!(
            "{:<12} {:<9} {:<22} {}",
            spec.name.magenta().bold(),
            spec.kind.as_str(),
            spec.credential_env_key,
            spec.display_name.dimmed()
        );
        if let Some(prefix) = spec.identifier_prefix {
            console.detail(&format!("prefix: {prefix}/"));
        }
        if !spec.keywords.is_empty() {
            console.detail(&format!("keywords: {}", spec.keywords.join(", ")));
        }
        if let Some(base) = spec.default_base_url {
            console.detail(&format!("base url: {base}"));
        }
        for o in &spec.parameter_overrides {
            console.detail(&format!(
                "override for *{}*: {}",
                o.pattern,
                serde_json::Value::Object(o.params.clone())
            ));
        }
    }
    Ok(())
}
