//! Remote completion providers.
//!
//! The assistant core only knows the [`CompletionProvider`] trait: give it a
//! prompt and a system prompt, get back answer text or a [`RemoteError`].
//! Transport, auth, and timeouts live entirely inside the implementation.

pub mod openai;

use async_trait::async_trait;
use thiserror::Error;

pub use openai::OpenAiProvider;

/// Failure of a remote completion call.
///
/// Returned to callers unchanged; the core never retries and never caches
/// these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// Could not reach the API at all.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The provider's own timeout elapsed.
    #[error("Request timed out")]
    Timeout,

    /// The API answered with an error object or a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The API answered with something that is not a completion.
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    /// No API key was configured.
    #[error("No API key configured (set provider.api_key or OPENAI_API_KEY)")]
    MissingApiKey,
}

/// A remote text-completion backend.
///
/// Implementations must be `Send + Sync` because one provider is shared by
/// every request handler.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Complete `prompt` under `system_prompt`, returning the answer text.
    async fn complete(
        &self,
        prompt: &str,
        system_prompt: &str,
    ) -> std::result::Result<String, RemoteError>;

    /// Short provider name for logs.
    fn name(&self) -> &str;
}
