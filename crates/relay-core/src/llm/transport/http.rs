//! OpenAI-compatible HTTP transport

use super::types::{RawCompletion, TransportRequest};
use super::ChatTransport;
use crate::config::TimeoutConfig;
use crate::error::{RelayError, RelayResult};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

/// Base URL used when neither the backend entry nor its registry spec
/// provides one
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Longest slice of an error body kept in a backend error message
const MAX_ERROR_BODY: usize = 500;

/// Sends requests to `{base_url}/chat/completions`.
///
/// Timeouts are enforced here, below the invoker: an elapsed deadline comes
/// back as [`RelayError::Timeout`] and is handled like any other failed
/// attempt.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    default_base_url: String,
}

impl HttpTransport {
    /// Create a transport with the given timeouts
    pub fn new(timeouts: TimeoutConfig) -> RelayResult<Self> {
        timeouts
            .validate()
            .map_err(|e| RelayError::config_with_context(e, "Validating transport timeouts"))?;

        let client = Client::builder()
            .connect_timeout(timeouts.connection_timeout())
            .timeout(timeouts.request_timeout())
            .build()
            .map_err(|e| RelayError::config(format!("Failed to create HTTP client: {}", e)))?;

        debug!(
            "Created HTTP transport with timeouts: connection={}s, request={}s",
            timeouts.connection_timeout_secs, timeouts.request_timeout_secs
        );

        Ok(Self::with_client(client))
    }

    /// Wrap an existing reqwest client
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            default_base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Override the base URL used when a request carries none
    pub fn with_default_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.default_base_url = base_url.into();
        self
    }

    pub(super) fn endpoint(&self, request: &TransportRequest) -> String {
        let base = request
            .base_url
            .as_deref()
            .unwrap_or(&self.default_base_url)
            .trim_end_matches('/');
        format!("{}/chat/completions", base)
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    #[instrument(skip(self, request), fields(model = %request.model), level = "debug")]
    async fn complete(&self, request: TransportRequest) -> RelayResult<RawCompletion> {
        let url = self.endpoint(&request);
        let body = request.wire_body()?;
        debug!(wire_model = %request.wire_model(), "POST {}", url);
        let mut builder = self.client.post(&url).json(&body);

        if let Some(key) = request.credential.as_deref().filter(|k| !k.is_empty()) {
            builder = builder.bearer_auth(key);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RelayError::backend_with_status(
                format!("status {}: {}", status, truncate(&body, MAX_ERROR_BODY)),
                status.as_u16(),
            ));
        }

        let body = response.text().await?;
        serde_json::from_str::<RawCompletion>(&body).map_err(|e| {
            RelayError::backend(format!("Malformed completion payload: {}", e))
                .with_context(format!("POST {}", url))
        })
    }
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
