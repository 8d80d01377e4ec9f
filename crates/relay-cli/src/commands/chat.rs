//! One-shot chat through the fallback chain

use crate::console::CliConsole;
use anyhow::{Context, bail};
use colored::*;
use relay_core::fallback::FallbackEventKind;
use relay_core::{ChatMessage, ChatRequest, FallbackOrchestrator, RelayConfig, RelayError};
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub struct ChatOptions {
    pub prompt: String,
    pub system: Option<String>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub json: bool,
}

impl ChatOptions {
    fn into_request(self) -> ChatRequest {
        let mut messages = Vec::new();
        if let Some(system) = self.system {
            messages.push(ChatMessage::system(system));
        }
        messages.push(ChatMessage::user(self.prompt));

        ChatRequest {
            messages,
            tools: None,
            model: self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

/// Send the prompt and print the reply. Ctrl+C cancels the in-flight
/// attempt without falling back.
pub async fn run(config_file: &str, options: ChatOptions, verbose: bool) -> anyhow::Result<()> {
    let console = CliConsole::new(verbose);
    let config = RelayConfig::from_file(config_file)
        .with_context(|| format!("Failed to load configuration from {config_file}"))?;
    let relay = FallbackOrchestrator::from_config(&config)?;
    debug!(backends = relay.backends().len(), "Loaded fallback chain");

    let json = options.json;
    let request = options.into_request();
    console.detail(&format!(
        "Chain: {}",
        relay
            .backends()
            .iter()
            .map(|b| format!("{}/{}", b.backend_name, b.model))
            .collect::<Vec<_>>()
            .join(" -> ")
    ));

    let token = CancellationToken::new();
    let on_interrupt = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let response = match relay.chat_with_cancellation(request, &token).await {
        Ok(response) => response,
        Err(RelayError::Cancelled) => bail!("Interrupted"),
        Err(e) => return Err(e.into()),
    };

    for event in relay.history() {
        match event.kind {
            FallbackEventKind::AttemptFailed { failure, next } => {
                console.warn(&format!("{failure} (trying {next})"));
            }
            FallbackEventKind::Recovered { label, .. } => {
                console.detail(&format!("Served by {label}"));
            }
            FallbackEventKind::Exhausted { .. } => {}
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else if response.finish_reason.is_error() {
        console.error(response.content_str());
    } else {
        if let Some(reasoning) = &response.reasoning_content {
            console.detail(reasoning);
        }
        println!("{}", response.content_str());
        for call in &response.tool_calls {
            println!(
                "{} {}({})",
                "→".cyan(),
                call.name.bold(),
                serde_json::Value::Object(call.arguments.clone())
            );
        }
        if let Some(usage) = response.usage {
            console.detail(&format!(
                "tokens: {} prompt + {} completion = {}",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            ));
        }
    }

    if response.finish_reason.is_error() {
        bail!("All backends failed");
    }
    Ok(())
}
