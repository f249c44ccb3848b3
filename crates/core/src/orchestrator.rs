use crate::error::OrchestratorError;
use crate::metrics::Metrics;
use crate::tool_call::{parse_tool_call, requested_tool_calls, ParsedToolCall, ToolCallRequest};
use futures::future::join_all;
use mcp_relay_policy::{Credential, PermissionEngine};
use mcp_relay_providers::{ChatCompletionRequest, CompletionRelay, CompletionReply};
use mcp_relay_tools::ToolDispatcher;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The payload produced for one tool call.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResult {
    pub call_id: String,
    pub tool_name: String,
    pub payload: Value,
}

impl ToolResult {
    pub fn is_error(&self) -> bool {
        self.payload.get("error").is_some()
    }

    pub fn to_message(&self) -> Value {
        json!({
            "role": "tool",
            "tool_call_id": self.call_id,
            "content": self.payload.to_string()
        })
    }
}

/// What a completion turn produced.
#[derive(Debug, Clone)]
pub struct TurnReport {
    /// Returned to the client unchanged.
    pub reply: CompletionReply,
    /// Empty when the first completion asked for no tools.
    pub results: Vec<ToolResult>,
    /// Tool-call entries discarded as structurally invalid.
    pub dropped: usize,
}

impl TurnReport {
    fn passthrough(reply: CompletionReply) -> Self {
        Self {
            reply,
            results: Vec::new(),
            dropped: 0,
        }
    }

    pub fn used_tools(&self) -> bool {
        !self.results.is_empty()
    }
}

enum TurnState {
    AwaitingFirstCompletion,
    ToolCallsPresent {
        first: CompletionReply,
        assistant: Value,
        entries: Vec<Value>,
    },
    Executing {
        assistant: Value,
        calls: Vec<ToolCallRequest>,
        dropped: usize,
    },
    AwaitingFinalCompletion {
        assistant: Value,
        results: Vec<ToolResult>,
        dropped: usize,
    },
    Done(TurnReport),
}

/// Runs the two-pass tool-calling loop for one client request.
pub struct Orchestrator {
    relay: Arc<CompletionRelay>,
    permissions: Arc<PermissionEngine>,
    dispatcher: Arc<ToolDispatcher>,
    metrics: Arc<Metrics>,
}

impl Orchestrator {
    pub fn new(
        relay: Arc<CompletionRelay>,
        permissions: Arc<PermissionEngine>,
        dispatcher: Arc<ToolDispatcher>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            relay,
            permissions,
            dispatcher,
            metrics,
        }
    }

    pub fn relay(&self) -> &CompletionRelay {
        &self.relay
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub async fn run_turn(
        &self,
        request: ChatCompletionRequest,
        credential: &Credential,
    ) -> Result<TurnReport, OrchestratorError> {
        self.metrics.inc_turns();
        let prepared = self.relay.prepare(request);
        let mut state = TurnState::AwaitingFirstCompletion;

        loop {
            state = match state {
                TurnState::AwaitingFirstCompletion => {
                    let first = self
                        .send(&prepared, credential)
                        .await
                        .map_err(OrchestratorError::FirstPass)?;
                    self.inspect_first(first)
                }
                TurnState::ToolCallsPresent {
                    first,
                    assistant,
                    entries,
                } => self.validate(first, assistant, &entries),
                TurnState::Executing {
                    assistant,
                    calls,
                    dropped,
                } => {
                    self.metrics.inc_tool_rounds();
                    info!("Executing {} tool call(s)", calls.len());
                    let results = self.execute_batch(&calls, credential).await;
                    TurnState::AwaitingFinalCompletion {
                        assistant,
                        results,
                        dropped,
                    }
                }
                TurnState::AwaitingFinalCompletion {
                    assistant,
                    results,
                    dropped,
                } => {
                    let follow_up = prepared.with_messages(follow_up_messages(
                        &prepared.messages,
                        assistant,
                        &results,
                    ));
                    let reply = self
                        .send(&follow_up, credential)
                        .await
                        .map_err(OrchestratorError::FinalPass)?;
                    info!("Final completion answered {}", reply.status);
                    TurnState::Done(TurnReport {
                        reply,
                        results,
                        dropped,
                    })
                }
                TurnState::Done(report) => return Ok(report),
            };
        }
    }

    async fn send(
        &self,
        request: &ChatCompletionRequest,
        credential: &Credential,
    ) -> Result<CompletionReply, mcp_relay_providers::RelayError> {
        self.metrics.inc_relay_requests();
        self.relay.send(request, credential).await.inspect_err(|_| {
            self.metrics.inc_relay_failures();
        })
    }

    fn inspect_first(&self, first: CompletionReply) -> TurnState {
        if !first.is_success() {
            return TurnState::Done(TurnReport::passthrough(first));
        }

        let Some(body) = first.json() else {
            warn!("First completion body is not JSON; passing it through");
            return TurnState::Done(TurnReport::passthrough(first));
        };

        match requested_tool_calls(&body) {
            Some((assistant, entries)) => TurnState::ToolCallsPresent {
                assistant: assistant.clone(),
                entries: entries.clone(),
                first,
            },
            None => {
                debug!("No tool calls requested");
                TurnState::Done(TurnReport::passthrough(first))
            }
        }
    }

    fn validate(&self, first: CompletionReply, assistant: Value, entries: &[Value]) -> TurnState {
        let mut calls = Vec::with_capacity(entries.len());
        let mut dropped = 0;

        for (position, entry) in entries.iter().enumerate() {
            match parse_tool_call(entry) {
                ParsedToolCall::Valid(call) => {
                    if call.malformed_arguments {
                        warn!(
                            "Malformed arguments for {} ({}); using {{}}",
                            call.tool_name, call.call_id
                        );
                        self.metrics.inc_malformed_arguments();
                    }
                    calls.push(call);
                }
                ParsedToolCall::Rejected(reason) => {
                    warn!("Dropping tool call #{}: {}", position, reason);
                    self.metrics.inc_dropped_calls();
                    dropped += 1;
                }
            }
        }

        if calls.is_empty() {
            warn!("Every requested tool call was invalid; returning first completion");
            return TurnState::Done(TurnReport {
                reply: first,
                results: Vec::new(),
                dropped,
            });
        }

        TurnState::Executing {
            assistant,
            calls,
            dropped,
        }
    }

    /// Run every call concurrently. Results keep the order of `calls`.
    async fn execute_batch(&self, calls: &[ToolCallRequest], credential: &Credential) -> Vec<ToolResult> {
        join_all(calls.iter().map(|call| self.execute_one(call, credential))).await
    }

    async fn execute_one(&self, call: &ToolCallRequest, credential: &Credential) -> ToolResult {
        let decision = self.permissions.authorize(credential, &call.tool_name);

        let payload = match decision.denial_message(&call.tool_name) {
            Some(message) => {
                self.metrics.inc_permission_denials();
                json!({ "error": message })
            }
            None => {
                self.metrics.inc_tool_executions();
                let output = self.dispatcher.execute(&call.tool_name, &call.arguments).await;
                if output.is_error() {
                    self.metrics.inc_tool_failures();
                }
                output.into_payload()
            }
        };

        ToolResult {
            call_id: call.call_id.clone(),
            tool_name: call.tool_name.clone(),
            payload,
        }
    }
}

/// Original conversation, then the assistant's tool-call message as received,
/// then one tool message per result.
fn follow_up_messages(original: &[Value], assistant: Value, results: &[ToolResult]) -> Vec<Value> {
    let mut messages = Vec::with_capacity(original.len() + 1 + results.len());
    messages.extend_from_slice(original);
    messages.push(assistant);
    messages.extend(results.iter().map(ToolResult::to_message));
    messages
}
