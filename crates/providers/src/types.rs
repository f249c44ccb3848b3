use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Inbound chat-completion request.
///
/// Only the fields the relay reads or rewrites are typed; everything else is
/// carried in `extra` and forwarded untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChatCompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Value>) -> Self {
        Self {
            model: model.into(),
            messages,
            tools: None,
            tool_choice: None,
            stream: None,
            extra: Map::new(),
        }
    }

    pub fn has_tools(&self) -> bool {
        self.tools.as_ref().is_some_and(|tools| !tools.is_empty())
    }

    /// Same request with a different conversation.
    pub fn with_messages(&self, messages: Vec<Value>) -> Self {
        Self {
            messages,
            ..self.clone()
        }
    }
}

/// A backend response kept as raw bytes so it can be returned unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionReply {
    pub status: u16,
    pub body: String,
}

impl CompletionReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The body as JSON, if it parses.
    pub fn json(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_fields_survive() {
        let raw = json!({
            "model": "gpt-4o",
            "messages": [{"role": "user", "content": "hi"}],
            "temperature": 0.2,
            "user": "alice"
        });
        let request: ChatCompletionRequest = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(request.extra["temperature"], 0.2);
        assert_eq!(serde_json::to_value(&request).unwrap(), raw);
    }

    #[test]
    fn test_missing_messages_rejected() {
        let result: Result<ChatCompletionRequest, _> =
            serde_json::from_value(json!({"model": "gpt-4o"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_has_tools() {
        let mut request = ChatCompletionRequest::new("m", vec![]);
        assert!(!request.has_tools());
        request.tools = Some(vec![]);
        assert!(!request.has_tools());
        request.tools = Some(vec![json!({"type": "function"})]);
        assert!(request.has_tools());
    }

    #[test]
    fn test_reply_status() {
        assert!(CompletionReply::new(200, "{}").is_success());
        assert!(!CompletionReply::new(429, "{}").is_success());
        assert!(CompletionReply::new(200, "not json").json().is_none());
    }
}
