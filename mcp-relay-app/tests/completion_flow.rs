mod common;

use common::*;
use serde_json::{json, Value};

fn chat_body(model: &str, user: &str) -> Value {
    json!({
        "model": model,
        "messages": [{"role": "user", "content": user}]
    })
}

#[tokio::test]
async fn test_plain_completion_is_passed_through() {
    let backend = spawn_fake_backend().await;
    let relay = start_relay(relay_config(&backend.url)).await;

    let response = reqwest::Client::new()
        .post(url(&relay, "/v1/chat/completions"))
        .bearer_auth("sk-user")
        .json(&json!({
            "model": "plain",
            "messages": [{"role": "user", "content": "hi"}],
            "stream": true,
            "temperature": 0.5
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), PLAIN_BODY);

    let received = backend.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0]["stream"], false);
    assert_eq!(received[0]["temperature"], 0.5);
    assert_eq!(received[0]["tool_choice"], "auto");
    assert_eq!(received[0]["tools"].as_array().map(Vec::len), Some(23));
    assert_eq!(backend.auth_headers(), vec!["Bearer sk-user"]);
}

#[tokio::test]
async fn test_tool_round_trip() {
    let backend = spawn_fake_backend().await;
    let relay = start_relay(relay_config(&backend.url)).await;

    let user = script(&[
        ("list_databases", ""),
        ("get_container_logs", r#"{"container_name":"litellm","line_count":2}"#),
    ]);
    let response = reqwest::Client::new()
        .post(url(&relay, "/v1/chat/completions"))
        .bearer_auth("sk-user")
        .json(&chat_body("tools", &user))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["id"], "chatcmpl-final");

    let received = backend.received();
    assert_eq!(received.len(), 2);
    let tools = spliced_tool_messages(&received);
    assert_eq!(tools.len(), 2);
    assert_eq!(tools[0]["tool_call_id"], "call_0");
    assert_eq!(tools[1]["tool_call_id"], "call_1");

    let logs: Value = serde_json::from_str(tools[1]["content"].as_str().unwrap()).unwrap();
    assert_eq!(logs["container"], "litellm");
    assert_eq!(logs["logs"].as_array().map(Vec::len), Some(2));
    assert_eq!(backend.auth_headers(), vec!["Bearer sk-user", "Bearer sk-user"]);
}

#[tokio::test]
async fn test_list_directory_requires_privilege() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("payroll.xlsx"), "x").unwrap();
    let args = json!({"path": dir.path().to_string_lossy()}).to_string();
    let user = script(&[("list_directory", args.as_str())]);

    let backend = spawn_fake_backend().await;
    let relay = start_relay(relay_config(&backend.url)).await;
    let client = reqwest::Client::new();

    client
        .post(url(&relay, "/v1/chat/completions"))
        .bearer_auth("sk-user")
        .json(&chat_body("tools", &user))
        .send()
        .await
        .unwrap();
    let denied = spliced_tool_messages(&backend.received());
    assert_eq!(
        denied[0]["content"],
        r#"{"error":"Permission denied for list_directory"}"#
    );

    client
        .post(url(&relay, "/v1/chat/completions"))
        .bearer_auth(ADMIN_KEY)
        .json(&chat_body("tools", &user))
        .send()
        .await
        .unwrap();
    let allowed = spliced_tool_messages(&backend.received());
    let listing: Value = serde_json::from_str(allowed[0]["content"].as_str().unwrap()).unwrap();
    assert_eq!(listing["files"], json!(["payroll.xlsx"]));
}

#[tokio::test]
async fn test_backend_error_status_mirrored() {
    let backend = spawn_fake_backend().await;
    let relay = start_relay(relay_config(&backend.url)).await;

    let response = reqwest::Client::new()
        .post(url(&relay, "/v1/chat/completions"))
        .json(&chat_body("limited", "hi"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 429);
    assert_eq!(
        response.text().await.unwrap(),
        r#"{"error":{"message":"Rate limit exceeded"}}"#
    );
}

#[tokio::test]
async fn test_invalid_body_rejected_before_backend() {
    let backend = spawn_fake_backend().await;
    let relay = start_relay(relay_config(&backend.url)).await;

    let response = reqwest::Client::new()
        .post(url(&relay, "/v1/chat/completions"))
        .header("content-type", "application/json")
        .body(r#"{"model": "plain"}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["type"], "invalid_request_body");
    assert!(backend.received().is_empty());
}

#[tokio::test]
async fn test_large_conversation_reaches_backend() {
    let backend = spawn_fake_backend().await;
    let relay = start_relay(relay_config(&backend.url)).await;

    let long = "x".repeat(3 * 1024 * 1024);
    let response = reqwest::Client::new()
        .post(url(&relay, "/v1/chat/completions"))
        .json(&chat_body("plain", &long))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), PLAIN_BODY);
    assert_eq!(backend.received().len(), 1);
}

#[tokio::test]
async fn test_body_over_limit_is_json_413() {
    let backend = spawn_fake_backend().await;
    let mut config = relay_config(&backend.url);
    config.max_body_bytes = 1024;
    let relay = start_relay(config).await;

    let response = reqwest::Client::new()
        .post(url(&relay, "/v1/chat/completions"))
        .json(&chat_body("plain", &"x".repeat(4096)))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 413);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["type"], "request_too_large");
    assert!(backend.received().is_empty());
}

#[tokio::test]
async fn test_unreachable_backend_is_bad_gateway() {
    let relay = start_relay(relay_config("http://127.0.0.1:1")).await;

    let response = reqwest::Client::new()
        .post(url(&relay, "/v1/chat/completions"))
        .json(&chat_body("plain", "hi"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 502);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["type"], "backend_unreachable");
}

#[tokio::test]
async fn test_slow_backend_is_gateway_timeout() {
    let backend = spawn_fake_backend().await;
    let mut config = relay_config(&backend.url);
    config.completion_backend.timeout_ms = 200;
    let relay = start_relay(config).await;

    let response = reqwest::Client::new()
        .post(url(&relay, "/v1/chat/completions"))
        .json(&chat_body("slow", "hi"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 504);
}

#[tokio::test]
async fn test_tools_endpoint() {
    let backend = spawn_fake_backend().await;
    let relay = start_relay(relay_config(&backend.url)).await;

    let body: Value = reqwest::get(url(&relay, "/v1/tools"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["object"], "list");
    assert_eq!(body["data"].as_array().map(Vec::len), Some(23));
    assert_eq!(body["data"][0]["function"]["name"], "list_mcp_tools");
}

#[tokio::test]
async fn test_models_and_health() {
    let backend = spawn_fake_backend().await;
    let relay = start_relay(relay_config(&backend.url)).await;

    let models: Value = reqwest::get(url(&relay, "/v1/models"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(models["data"][0]["id"], "gpt-4o");

    reqwest::Client::new()
        .post(url(&relay, "/v1/chat/completions"))
        .json(&chat_body("tools", &script(&[("list_workflows", "{}")])))
        .send()
        .await
        .unwrap();

    let health: Value = reqwest::get(url(&relay, "/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["service"], "mcp-relay");
    assert_eq!(health["tools"], 23);
    assert_eq!(health["metrics"]["turns"], 1);
    assert_eq!(health["metrics"]["relay_requests"], 2);
    assert_eq!(health["metrics"]["tool_executions"], 1);
    assert_eq!(health["relay_success_rate"], 1.0);
    assert_eq!(health["tool_success_rate"], 1.0);
}

#[tokio::test]
async fn test_graceful_stop() {
    let backend = spawn_fake_backend().await;
    let relay = start_relay(relay_config(&backend.url)).await;
    let health = url(&relay, "/health");

    relay.stop().await;
    assert!(reqwest::get(health).await.is_err());
}
