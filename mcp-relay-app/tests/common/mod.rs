#![allow(dead_code)]

use axum::extract::{DefaultBodyLimit, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use mcp_relay_app::{build, Config, Server};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const ADMIN_KEY: &str = "sk-admin";
pub const PLAIN_BODY: &str =
    "{\"id\":\"chatcmpl-plain\",\"choices\":[{\"index\":0,\"message\":{\"role\":\"assistant\",\"content\":\"Hello there\"},\"finish_reason\":\"stop\"}]}";

/// Stand-in for an OpenAI-compatible proxy.
///
/// Behaviour is picked by `model`:
/// - `plain`: answers [`PLAIN_BODY`] verbatim
/// - `tools`: requests the calls listed as JSON in the last user message,
///   then summarises the tool messages once they arrive
/// - `limited`: 429
/// - `slow`: sleeps before answering
pub struct FakeBackend {
    pub url: String,
    pub received: Arc<Mutex<Vec<Value>>>,
    pub auth_headers: Arc<Mutex<Vec<String>>>,
}

impl FakeBackend {
    pub fn received(&self) -> Vec<Value> {
        self.received.lock().unwrap().clone()
    }

    pub fn auth_headers(&self) -> Vec<String> {
        self.auth_headers.lock().unwrap().clone()
    }
}

#[derive(Clone)]
struct FakeState {
    received: Arc<Mutex<Vec<Value>>>,
    auth_headers: Arc<Mutex<Vec<String>>>,
}

async fn chat(
    State(state): State<FakeState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, String) {
    state.received.lock().unwrap().push(body.clone());
    if let Some(auth) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
        state.auth_headers.lock().unwrap().push(auth.to_string());
    }

    let messages = body["messages"].as_array().cloned().unwrap_or_default();
    match body["model"].as_str().unwrap_or("") {
        "plain" => (StatusCode::OK, PLAIN_BODY.to_string()),
        "limited" => (
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"error":{"message":"Rate limit exceeded"}}"#.to_string(),
        ),
        "slow" => {
            tokio::time::sleep(Duration::from_secs(3)).await;
            (StatusCode::OK, PLAIN_BODY.to_string())
        }
        _ => {
            let tool_messages: Vec<&Value> =
                messages.iter().filter(|m| m["role"] == "tool").collect();
            if !tool_messages.is_empty() {
                let summary: Vec<Value> = tool_messages
                    .iter()
                    .map(|m| json!({"id": m["tool_call_id"], "content": m["content"]}))
                    .collect();
                let reply = json!({
                    "id": "chatcmpl-final",
                    "choices": [{
                        "index": 0,
                        "message": {"role": "assistant", "content": Value::Array(summary).to_string()},
                        "finish_reason": "stop"
                    }]
                });
                return (StatusCode::OK, reply.to_string());
            }

            let script = messages
                .iter()
                .rev()
                .find(|m| m["role"] == "user")
                .and_then(|m| m["content"].as_str())
                .and_then(|c| serde_json::from_str::<Vec<Value>>(c).ok())
                .unwrap_or_default();
            let calls: Vec<Value> = script
                .iter()
                .enumerate()
                .map(|(i, step)| {
                    json!({
                        "id": format!("call_{}", i),
                        "type": "function",
                        "function": {"name": step["name"], "arguments": step["arguments"]}
                    })
                })
                .collect();
            let reply = json!({
                "id": "chatcmpl-tools",
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": null, "tool_calls": calls},
                    "finish_reason": "tool_calls"
                }]
            });
            (StatusCode::OK, reply.to_string())
        }
    }
}

async fn models() -> Json<Value> {
    Json(json!({"object": "list", "data": [{"id": "gpt-4o", "object": "model"}]}))
}

pub async fn spawn_fake_backend() -> FakeBackend {
    let state = FakeState {
        received: Arc::default(),
        auth_headers: Arc::default(),
    };
    let app = Router::new()
        .route("/v1/chat/completions", post(chat))
        .route("/v1/models", get(models))
        .layer(DefaultBodyLimit::disable())
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeBackend {
        url: format!("http://{}", addr),
        received: state.received,
        auth_headers: state.auth_headers,
    }
}

pub fn relay_config(backend_url: &str) -> Config {
    let mut config = Config {
        listen_addr: "127.0.0.1:0".to_string(),
        privileged_keys: vec![ADMIN_KEY.to_string()],
        ..Config::default()
    };
    config.completion_backend.url = backend_url.to_string();
    config.completion_backend.timeout_ms = 5_000;
    config.executor.timeout_ms = 5_000;
    config
}

pub async fn start_relay(config: Config) -> Server {
    let state = build(&config).unwrap();
    Server::start(state, config.socket_addr().unwrap())
        .await
        .unwrap()
}

pub fn url(server: &Server, path: &str) -> String {
    format!("http://{}{}", server.addr(), path)
}

/// A user message the fake backend turns into tool calls.
pub fn script(calls: &[(&str, &str)]) -> String {
    let steps: Vec<Value> = calls
        .iter()
        .map(|(name, arguments)| json!({"name": name, "arguments": arguments}))
        .collect();
    Value::Array(steps).to_string()
}

/// Tool messages the relay sent on its second pass.
pub fn spliced_tool_messages(received: &[Value]) -> Vec<Value> {
    received
        .last()
        .and_then(|body| body["messages"].as_array())
        .map(|messages| {
            messages
                .iter()
                .filter(|m| m["role"] == "tool")
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}
