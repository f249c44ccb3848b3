use crate::traits::*;
use crate::types::{ChatCompletionRequest, CompletionReply};
use async_trait::async_trait;
use mcp_relay_policy::Credential;
use reqwest::{Client, RequestBuilder, Response};
use tracing::debug;

/// Talks to an OpenAI-compatible proxy such as LiteLLM.
///
/// The caller's `Authorization` header is forwarded as-is; the relay holds no
/// backend key of its own.
pub struct OpenAICompatibleBackend {
    client: Client,
    base_url: String,
}

impl OpenAICompatibleBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorize(&self, request: RequestBuilder, credential: &Credential) -> RequestBuilder {
        if credential.is_present() {
            request.header(reqwest::header::AUTHORIZATION, credential.header_value())
        } else {
            request
        }
    }

    async fn into_reply(response: Response) -> Result<CompletionReply, ProviderError> {
        let status = response.status().as_u16();
        let body = response.text().await.map_err(classify)?;
        Ok(CompletionReply { status, body })
    }
}

fn classify(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout
    } else if e.is_decode() || e.is_body() {
        ProviderError::InvalidResponse(e.to_string())
    } else {
        ProviderError::Unreachable(e.to_string())
    }
}

#[async_trait]
impl CompletionBackend for OpenAICompatibleBackend {
    async fn chat_completions(
        &self,
        request: &ChatCompletionRequest,
        credential: &Credential,
    ) -> Result<CompletionReply, ProviderError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        debug!("POST {} ({} messages)", url, request.messages.len());

        let response = self
            .authorize(self.client.post(&url).json(request), credential)
            .send()
            .await
            .map_err(classify)?;

        Self::into_reply(response).await
    }

    async fn models(&self, credential: &Credential) -> Result<CompletionReply, ProviderError> {
        let url = format!("{}/v1/models", self.base_url);
        debug!("GET {}", url);

        let response = self
            .authorize(self.client.get(&url), credential)
            .send()
            .await
            .map_err(classify)?;

        Self::into_reply(response).await
    }

    fn name(&self) -> &str {
        "openai-compatible"
    }
}
