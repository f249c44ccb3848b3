use crate::traits::{CompletionBackend, ProviderError};
use crate::types::{ChatCompletionRequest, CompletionReply};
use mcp_relay_policy::Credential;
use mcp_relay_tools::ToolCatalog;
use serde_json::json;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio::time::{timeout, Duration};
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Completion backend unreachable: {0}")]
    Unreachable(String),
    #[error("Completion backend timed out after {0}ms")]
    Timeout(u64),
    #[error("Completion backend sent an unreadable response: {0}")]
    InvalidResponse(String),
}

impl RelayError {
    fn from_provider(e: ProviderError, timeout_ms: u64) -> Self {
        match e {
            ProviderError::Unreachable(msg) => RelayError::Unreachable(msg),
            ProviderError::Timeout => RelayError::Timeout(timeout_ms),
            ProviderError::InvalidResponse(msg) => RelayError::InvalidResponse(msg),
        }
    }
}

/// Forwards chat completions, advertising the tool catalog when the caller
/// brought no tools of its own.
pub struct CompletionRelay {
    backend: Arc<dyn CompletionBackend>,
    catalog: Arc<ToolCatalog>,
    timeout_ms: u64,
}

impl CompletionRelay {
    pub fn new(backend: Arc<dyn CompletionBackend>, catalog: Arc<ToolCatalog>, timeout_ms: u64) -> Self {
        Self {
            backend,
            catalog,
            timeout_ms,
        }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Rewrite a client request into what is actually sent upstream.
    pub fn prepare(&self, mut request: ChatCompletionRequest) -> ChatCompletionRequest {
        if !request.has_tools() {
            debug!("Injecting {} catalog tools", self.catalog.len());
            request.tools = Some(self.catalog.definitions());
            request.tool_choice = Some(json!("auto"));
        }

        // Tool calls are only detected on whole responses.
        if request.stream == Some(true) {
            request.stream = Some(false);
            request.extra.remove("stream_options");
        }

        request
    }

    /// Send an already prepared request.
    pub async fn send(
        &self,
        request: &ChatCompletionRequest,
        credential: &Credential,
    ) -> Result<CompletionReply, RelayError> {
        let reply = self
            .bounded(self.backend.chat_completions(request, credential))
            .await?;

        if reply.is_success() {
            info!("Completion backend answered {}", reply.status);
        } else {
            warn!("Completion backend returned status {}", reply.status);
        }
        Ok(reply)
    }

    pub async fn complete(
        &self,
        request: ChatCompletionRequest,
        credential: &Credential,
    ) -> Result<CompletionReply, RelayError> {
        let prepared = self.prepare(request);
        self.send(&prepared, credential).await
    }

    pub async fn list_models(&self, credential: &Credential) -> Result<CompletionReply, RelayError> {
        self.bounded(self.backend.models(credential)).await
    }

    async fn bounded<F>(&self, call: F) -> Result<CompletionReply, RelayError>
    where
        F: Future<Output = Result<CompletionReply, ProviderError>>,
    {
        match timeout(Duration::from_millis(self.timeout_ms), call).await {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(e)) => {
                warn!("Completion backend call failed: {}", e);
                Err(RelayError::from_provider(e, self.timeout_ms))
            }
            Err(_) => {
                warn!("Completion backend timed out after {}ms", self.timeout_ms);
                Err(RelayError::Timeout(self.timeout_ms))
            }
        }
    }
}
