use crate::error::BackendError;
use crate::traits::ToolBackend;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

/// Forwards calls to an MCP proxy that fronts the real tool servers.
///
/// The executor key names both: `postgres_execute_sql` runs tool
/// `execute_sql` on server `postgres`.
pub struct McpProxyBackend {
    client: reqwest::Client,
    base_url: String,
}

impl McpProxyBackend {
    pub fn new(base_url: impl Into<String>, timeout_ms: u64) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| BackendError::Unreachable(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Split an executor key into `(server, tool)` at the first underscore.
pub fn split_executor_key(key: &str) -> Option<(&str, &str)> {
    key.split_once('_')
        .filter(|(server, tool)| !server.is_empty() && !tool.is_empty())
}

#[async_trait]
impl ToolBackend for McpProxyBackend {
    async fn call(&self, operation: &str, arguments: &Value) -> Result<Value, BackendError> {
        let (server, tool) = split_executor_key(operation)
            .ok_or_else(|| BackendError::UnsupportedOperation(operation.to_string()))?;
        let url = format!("{}/servers/{}/tools/{}/run", self.base_url, server, tool);
        debug!("MCP proxy call: {}", url);

        let response = self
            .client
            .post(&url)
            .json(&json!({ "arguments": arguments }))
            .send()
            .await
            .map_err(|e| BackendError::Unreachable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BackendError::Unreachable(e.to_string()))?;

        if !status.is_success() {
            warn!("MCP proxy returned {} for {}", status, operation);
            return Err(BackendError::Failed(body));
        }

        // Tool servers occasionally answer with plain text.
        Ok(serde_json::from_str(&body).unwrap_or(Value::String(body)))
    }

    fn name(&self) -> &str {
        "mcp-proxy"
    }
}
