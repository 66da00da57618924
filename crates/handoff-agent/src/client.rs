//! Chat-completion clients.
//!
//! [`ChatClient`] is the seam between the orchestrator and the provider.
//! [`OpenAiClient`] implements it over HTTP for any OpenAI-compatible
//! endpoint. The client does not retry failed requests, and it has no
//! timeout unless one is configured.

use crate::config::ClientConfig;
use crate::error::{TransportError, TransportResult};
use crate::types::{ChatCompletionRequest, ChatCompletionResponse};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// A chat-completion provider.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send one request and return the provider's response.
    async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> TransportResult<ChatCompletionResponse>;
}

#[async_trait]
impl<C: ChatClient + ?Sized> ChatClient for Arc<C> {
    async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> TransportResult<ChatCompletionResponse> {
        (**self).complete(request).await
    }
}

/// HTTP client for OpenAI-compatible chat-completion endpoints.
#[derive(Clone)]
pub struct OpenAiClient {
    http: Client,
    endpoint: Url,
    api_key: String,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl OpenAiClient {
    /// Create a client from its configuration.
    pub fn new(config: &ClientConfig) -> TransportResult<Self> {
        let mut builder =
            Client::builder().user_agent(format!("handoff/{}", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| TransportError::Connection {
            message: format!("Failed to create HTTP client: {e}"),
        })?;
        Self::with_http_client(config, http)
    }

    /// Create a client with a custom HTTP client.
    pub fn with_http_client(config: &ClientConfig, http: Client) -> TransportResult<Self> {
        let endpoint = config
            .completions_url()
            .map_err(|e| TransportError::Connection {
                message: format!("Invalid endpoint URL: {e}"),
            })?;
        Ok(Self {
            http,
            endpoint,
            api_key: config.api_key().to_string(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ChatClient for OpenAiClient {
    async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> TransportResult<ChatCompletionResponse> {
        debug!(
            url = %self.endpoint,
            model = %request.model,
            messages = request.messages.len(),
            tools = request.tools.len(),
            "Sending chat-completion request"
        );

        let response = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError::Connection {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Connection {
                message: e.to_string(),
            })?;
        serde_json::from_slice(&body).map_err(|e| TransportError::Decode {
            message: e.to_string(),
        })
    }
}
