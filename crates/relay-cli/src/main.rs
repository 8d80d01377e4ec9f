//! Relay CLI
//!
//! Command-line surface over `relay-core`:
//!
//! - `relay chat "prompt"`      # One-shot chat through the configured chain
//! - `relay backends`           # List the built-in backend registry
//! - `relay resolve <model>`    # Show how a model identifier is rewritten
//! - `relay check`              # Validate a configuration file
//!
//! Set `RUST_LOG=debug` for verbose logging.

mod args;
mod commands;
mod console;
mod logging;
mod router;

use clap::Parser;

use args::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(&logging::load_settings(&cli.config_file), cli.verbose)?;
    router::route(cli).await
}
