use mcp_relay_providers::RelayError;
use thiserror::Error;

/// Only completion-call failures end a turn early. Tool failures are payloads.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("First completion failed: {0}")]
    FirstPass(#[source] RelayError),
    #[error("Final completion failed: {0}")]
    FinalPass(#[source] RelayError),
}
