//! The tool-call interception loop.
//!
//! A completion turn is at most two backend calls: the first may ask for
//! tools, which are authorized and executed here, and the second turns their
//! results into the final answer.

pub mod error;
pub mod metrics;
pub mod orchestrator;
pub mod tool_call;

pub use error::OrchestratorError;
pub use metrics::{Metrics, MetricsSnapshot};
pub use orchestrator::{Orchestrator, ToolResult, TurnReport};
pub use tool_call::{parse_tool_call, ParsedToolCall, RejectReason, ToolCallRequest};
