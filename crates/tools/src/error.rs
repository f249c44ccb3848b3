use thiserror::Error;

/// Errors raised while building the catalog.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Duplicate tool name: {0}")]
    DuplicateTool(String),
}

/// Failures reported by a tool backend.
///
/// The dispatcher turns every variant into an error payload, so none of these
/// ever abort a completion turn.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("MCP connection error: {0}")]
    Unreachable(String),

    #[error("MCP execution failed: {0}")]
    Failed(String),
}
