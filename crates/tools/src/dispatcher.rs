use crate::catalog::ToolCatalog;
use crate::traits::ToolBackend;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::time::{timeout, Duration};
use tracing::{debug, error, warn};

/// Outcome of one tool execution. Never a Rust error: failures are payloads.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    Success(Value),
    Error(String),
}

impl ToolOutput {
    pub fn is_error(&self) -> bool {
        matches!(self, ToolOutput::Error(_))
    }

    /// The JSON value spliced into the conversation as the tool message content.
    pub fn into_payload(self) -> Value {
        match self {
            ToolOutput::Success(value) => value,
            ToolOutput::Error(message) => json!({ "error": message }),
        }
    }
}

/// Routes a tool call to the backend registered for its executor key.
pub struct ToolDispatcher {
    catalog: Arc<ToolCatalog>,
    routes: HashMap<String, Arc<dyn ToolBackend>>,
    fallback: Arc<dyn ToolBackend>,
    timeout_ms: u64,
}

impl ToolDispatcher {
    pub fn new(catalog: Arc<ToolCatalog>, fallback: Arc<dyn ToolBackend>, timeout_ms: u64) -> Self {
        Self {
            catalog,
            routes: HashMap::new(),
            fallback,
            timeout_ms,
        }
    }

    /// Send `executor_key` to `backend` instead of the fallback.
    pub fn route(mut self, executor_key: impl Into<String>, backend: Arc<dyn ToolBackend>) -> Self {
        self.routes.insert(executor_key.into(), backend);
        self
    }

    fn backend_for(&self, executor_key: &str) -> Arc<dyn ToolBackend> {
        self.routes
            .get(executor_key)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone())
    }

    pub async fn execute(&self, tool_name: &str, arguments: &Value) -> ToolOutput {
        let Some(spec) = self.catalog.lookup(tool_name) else {
            warn!("Dispatch requested for unknown tool: {}", tool_name);
            return ToolOutput::Error(format!("Unknown function: {}", tool_name));
        };

        let backend = self.backend_for(&spec.executor_key);
        debug!(
            "Dispatching {} -> {} via {}",
            tool_name,
            spec.executor_key,
            backend.name()
        );

        self.execute_with_protection(tool_name, backend, spec.executor_key.clone(), arguments.clone())
            .await
    }

    async fn execute_with_protection(
        &self,
        tool_name: &str,
        backend: Arc<dyn ToolBackend>,
        operation: String,
        arguments: Value,
    ) -> ToolOutput {
        let handle = tokio::spawn(async move { backend.call(&operation, &arguments).await });

        match timeout(Duration::from_millis(self.timeout_ms), handle).await {
            Ok(Ok(Ok(value))) => ToolOutput::Success(value),
            Ok(Ok(Err(e))) => {
                warn!("Tool {} failed: {}", tool_name, e);
                ToolOutput::Error(e.to_string())
            }
            Ok(Err(join_err)) => {
                if join_err.is_panic() {
                    error!("Tool {} panicked", tool_name);
                } else {
                    error!("Tool {} cancelled", tool_name);
                }
                ToolOutput::Error(format!("Tool {} failed unexpectedly", tool_name))
            }
            Err(_) => {
                warn!("Tool {} timed out after {}ms", tool_name, self.timeout_ms);
                ToolOutput::Error(format!(
                    "Tool {} timed out after {}ms",
                    tool_name, self.timeout_ms
                ))
            }
        }
    }
}
