use crate::error::BackendError;
use async_trait::async_trait;
use serde_json::Value;

/// A system a tool ultimately delegates to: a database, a browser, an object
/// store, a local filesystem, or a remote MCP server.
///
/// `operation` is the catalog's executor key (e.g. `postgres_execute_sql`).
/// Whether the call is local or remote is the backend's business.
#[async_trait]
pub trait ToolBackend: Send + Sync {
    async fn call(&self, operation: &str, arguments: &Value) -> Result<Value, BackendError>;

    fn name(&self) -> &str;
}
