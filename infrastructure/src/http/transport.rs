//! Streaming chat completions over HTTP.
//!
//! POSTs a [`ChatRequest`] to an OpenAI-compatible endpoint and hands the
//! response body to [`spawn_decoder`].

use crate::error::TransportError;
use crate::sse::spawn_decoder;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use std::time::Duration;
use streamchat_application::{CompletionTransport, StreamHandle};
use streamchat_domain::{ChatRequest, StreamError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

const COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Settings for [`HttpCompletionTransport`].
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// Scheme and host, optionally ending in `/v1`.
    pub base_url: String,
    /// Bearer token; requests are sent unauthenticated when `None`.
    pub api_key: Option<String>,
    pub connect_timeout: Duration,
    /// Decoded events buffered between the decoder task and the assembler.
    pub channel_capacity: usize,
}

/// [`CompletionTransport`] backed by `reqwest`.
pub struct HttpCompletionTransport {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    channel_capacity: usize,
}

impl HttpCompletionTransport {
    pub fn new(config: HttpTransportConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: completions_endpoint(&config.base_url),
            api_key: config.api_key,
            channel_capacity: config.channel_capacity,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CompletionTransport for HttpCompletionTransport {
    async fn open_stream(
        &self,
        request: &ChatRequest,
        cancellation: CancellationToken,
    ) -> Result<StreamHandle, StreamError> {
        debug!("POST {} (model {})", self.endpoint, request.model);

        let mut builder = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, "text/event-stream")
            .json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| StreamError::connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Completion request rejected: HTTP {}", status.as_u16());
            return Err(StreamError::http_status(
                status.as_u16(),
                error_message(&body, status),
            ));
        }

        if response.content_length() == Some(0) {
            return Err(StreamError::NoResponseBody);
        }

        Ok(spawn_decoder(
            response.bytes_stream(),
            cancellation,
            self.channel_capacity,
        ))
    }
}

/// Join the base URL and the completions path, tolerating a trailing `/v1`.
fn completions_endpoint(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    match base.strip_suffix("/v1") {
        Some(root) => format!("{root}{COMPLETIONS_PATH}"),
        None => format!("{base}{COMPLETIONS_PATH}"),
    }
}

/// Best human-readable message from an error response body.
///
/// OpenAI-style bodies look like `{"error": {"message": "..."}}`.
fn error_message(body: &str, status: reqwest::StatusCode) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        });

    match from_json {
        Some(message) => message,
        None if !body.trim().is_empty() => body.trim().to_string(),
        None => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    }
}
