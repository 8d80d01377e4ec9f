//! CLI argument definitions using clap

use clap::{Parser, Subcommand};

/// Default configuration file name used across all CLI commands.
pub const DEFAULT_CONFIG_FILE: &str = "relay.toml";

#[derive(Parser)]
#[command(name = "relay")]
#[command(about = "Relay - ordered multi-backend LLM requests with fallback")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (TOML, JSON or YAML)
    #[arg(long, global = true, env = "RELAY_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config_file: String,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Send one prompt through the fallback chain
    Chat {
        /// User prompt
        prompt: String,

        /// System prompt
        #[arg(long, short)]
        system: Option<String>,

        /// Model for the primary backend (defaults to the configured one)
        #[arg(long, short)]
        model: Option<String>,

        /// Maximum tokens to generate
        #[arg(long)]
        max_tokens: Option<u32>,

        /// Sampling temperature
        #[arg(long)]
        temperature: Option<f32>,

        /// Print the full canonical response as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the built-in backend registry
    Backends,

    /// Show how a model identifier is rewritten for a backend
    Resolve {
        /// Model identifier as configured
        model: String,

        /// Backend name, used for gateway detection
        #[arg(long, short)]
        backend: Option<String>,

        /// Credential, used for gateway detection by key prefix
        #[arg(long)]
        credential: Option<String>,

        /// Base URL, used for gateway detection by keyword
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Validate a configuration file and print the chain
    Check,
}
