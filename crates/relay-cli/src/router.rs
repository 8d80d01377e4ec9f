//! Command routing logic for CLI

use crate::args::{Cli, Commands};
use crate::commands;

/// Route CLI commands to their respective handlers
pub async fn route(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Chat {
            prompt,
            system,
            model,
            max_tokens,
            temperature,
            json,
        } => {
            let options = commands::chat::ChatOptions {
                prompt,
                system,
                model,
                max_tokens,
                temperature,
                json,
            };
            commands::chat::run(&cli.config_file, options, cli.verbose).await
        }
        Commands::Backends => commands::backends::list(cli.verbose),
        Commands::Resolve {
            model,
            backend,
            credential,
            base_url,
        } => commands::resolve::show(
            &model,
            backend.as_deref(),
            credential.as_deref(),
            base_url.as_deref(),
        ),
        Commands::Check => commands::check::validate(&cli.config_file),
    }
}
