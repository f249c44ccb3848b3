use serde_json::{Map, Value};
use std::fmt;

/// A tool invocation the model asked for, with arguments already decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallRequest {
    /// Empty when the backend omitted the id.
    pub call_id: String,
    pub tool_name: String,
    /// Always a JSON object.
    pub arguments: Value,
    /// Arguments were present but not a JSON object and were replaced by `{}`.
    pub malformed_arguments: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    NotAnObject,
    MissingFunction,
    MissingName,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::NotAnObject => write!(f, "entry is not an object"),
            RejectReason::MissingFunction => write!(f, "entry has no function object"),
            RejectReason::MissingName => write!(f, "function has no name"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParsedToolCall {
    Valid(ToolCallRequest),
    Rejected(RejectReason),
}

/// Validate one entry of an assistant message's `tool_calls` list.
pub fn parse_tool_call(entry: &Value) -> ParsedToolCall {
    let Some(entry) = entry.as_object() else {
        return ParsedToolCall::Rejected(RejectReason::NotAnObject);
    };
    let Some(function) = entry.get("function").and_then(Value::as_object) else {
        return ParsedToolCall::Rejected(RejectReason::MissingFunction);
    };
    let Some(name) = function
        .get("name")
        .and_then(Value::as_str)
        .filter(|name| !name.trim().is_empty())
    else {
        return ParsedToolCall::Rejected(RejectReason::MissingName);
    };

    let call_id = entry
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let (arguments, malformed_arguments) = decode_arguments(function.get("arguments"));

    ParsedToolCall::Valid(ToolCallRequest {
        call_id,
        tool_name: name.to_string(),
        arguments,
        malformed_arguments,
    })
}

/// Arguments normally arrive JSON-encoded in a string. Some backends send the
/// object itself.
fn decode_arguments(raw: Option<&Value>) -> (Value, bool) {
    let empty = || Value::Object(Map::new());

    match raw {
        None | Some(Value::Null) => (empty(), false),
        Some(object @ Value::Object(_)) => (object.clone(), false),
        Some(Value::String(text)) if text.trim().is_empty() => (empty(), false),
        Some(Value::String(text)) => match serde_json::from_str::<Value>(text) {
            Ok(parsed @ Value::Object(_)) => (parsed, false),
            _ => (empty(), true),
        },
        Some(_) => (empty(), true),
    }
}

/// The assistant message of the first choice, and its tool-call list when it
/// is a non-empty array.
pub fn requested_tool_calls(completion: &Value) -> Option<(&Value, &Vec<Value>)> {
    let message = completion.get("choices")?.get(0)?.get("message")?;
    let calls = message.get("tool_calls")?.as_array()?;
    if calls.is_empty() {
        return None;
    }
    Some((message, calls))
}
