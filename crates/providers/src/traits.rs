use crate::types::{ChatCompletionRequest, CompletionReply};
use async_trait::async_trait;
use mcp_relay_policy::Credential;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Backend unreachable: {0}")]
    Unreachable(String),
    #[error("Backend timed out")]
    Timeout,
    #[error("Invalid backend response: {0}")]
    InvalidResponse(String),
}

/// An OpenAI-compatible chat-completion endpoint.
///
/// A non-success HTTP status is not an error here: it comes back as a
/// [`CompletionReply`] so callers can mirror it.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn chat_completions(
        &self,
        request: &ChatCompletionRequest,
        credential: &Credential,
    ) -> Result<CompletionReply, ProviderError>;

    async fn models(&self, credential: &Credential) -> Result<CompletionReply, ProviderError>;

    fn name(&self) -> &str;
}
