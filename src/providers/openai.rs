//! OpenAI chat-completions provider.
//!
//! Sends a two-message conversation (system + user) to
//! `{base_url}/v1/chat/completions` and returns the first choice's content.
//!
//! Auth priority: config key → `OPENAI_API_KEY`. A missing key is reported
//! per call as [`RemoteError::MissingApiKey`] so the server can still start
//! and serve its page without credentials.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::ProviderConfig;
use crate::error::{EspGptError, Result};

use super::{CompletionProvider, RemoteError};

/// Default OpenAI REST API base.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Default model when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Returned when the API answers without any message content.
const NO_RESPONSE: &str = "No response";

/// Chat-completions client.
pub struct OpenAiProvider {
    api_key: Option<String>,
    model: String,
    base_url: String,
    client: Client,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl OpenAiProvider {
    /// Build a provider from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EspGptError::Config`] if the HTTP client cannot be built.
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        let env_key = std::env::var("OPENAI_API_KEY").ok();
        let api_key = resolve_api_key(config.api_key.as_deref(), env_key.as_deref());
        if api_key.is_none() {
            warn!("No OpenAI API key configured; /ask will fail until one is set");
        }

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| EspGptError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Full URL of the chat-completions endpoint.
    fn api_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    /// Build the request body for a single system + user exchange.
    pub fn build_request_body(&self, prompt: &str, system_prompt: &str) -> Value {
        json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": prompt }
            ]
        })
    }

    /// Turn an HTTP status and raw body into answer text or an error.
    ///
    /// An `error` object wins over everything else. A missing content field
    /// yields the literal `"No response"`.
    pub fn parse_response(status: u16, body: &str) -> std::result::Result<String, RemoteError> {
        let json: Value = serde_json::from_str(body).map_err(|e| {
            RemoteError::InvalidResponse(format!("JSON parsing failed - {e}"))
        })?;

        if json["error"].is_object() {
            let message = json["error"]["message"]
                .as_str()
                .unwrap_or("unknown error")
                .to_string();
            return Err(RemoteError::Api { status, message });
        }

        if !(200..300).contains(&status) {
            return Err(RemoteError::Api {
                status,
                message: body.trim().to_string(),
            });
        }

        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or(NO_RESPONSE);
        Ok(content.trim().to_string())
    }
}

fn resolve_api_key(explicit: Option<&str>, env: Option<&str>) -> Option<String> {
    explicit
        .filter(|k| !k.is_empty())
        .or(env.filter(|k| !k.is_empty()))
        .map(String::from)
}

fn map_transport_error(e: reqwest::Error) -> RemoteError {
    if e.is_timeout() {
        RemoteError::Timeout
    } else {
        RemoteError::Connection(e.to_string())
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn complete(
        &self,
        prompt: &str,
        system_prompt: &str,
    ) -> std::result::Result<String, RemoteError> {
        let api_key = self.api_key.as_deref().ok_or(RemoteError::MissingApiKey)?;
        let body = self.build_request_body(prompt, system_prompt);

        debug!(model = %self.model, "Sending chat completion request");

        let response = self
            .client
            .post(self.api_url())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(map_transport_error)?;
        Self::parse_response(status, &text)
    }

    fn name(&self) -> &str {
        "openai"
    }
}
