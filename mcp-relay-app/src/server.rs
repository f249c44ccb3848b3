use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use mcp_relay_policy::Credential;
use mcp_relay_providers::{ChatCompletionRequest, CompletionReply};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::bootstrap::AppState;
use error::ApiError;

pub mod error;

pub struct Server {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Server {
    /// Bind `listen_addr` and serve in the background.
    pub async fn start(state: Arc<AppState>, listen_addr: SocketAddr) -> std::io::Result<Self> {
        let listener = TcpListener::bind(listen_addr).await?;
        let addr = listener.local_addr()?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let app = router(state);

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await
            {
                warn!("Server stopped with error: {}", e);
            }
        });

        info!("Listening on {}", addr);
        Ok(Server {
            addr,
            shutdown: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn shutdown(&mut self) {
        if let Some(sender) = self.shutdown.take() {
            let _ = sender.send(());
        }
    }

    /// Signal shutdown and wait for in-flight requests to finish.
    pub async fn stop(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        self.shutdown();
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = DefaultBodyLimit::max(state.max_body_bytes);

    Router::new()
        .route("/v1/chat/completions", post(chat_completions))
        .route("/v1/tools", get(list_tools))
        .route("/v1/models", get(list_models))
        .route("/health", get(health))
        .with_state(state)
        .layer(body_limit)
        .layer(cors)
}

fn credential(headers: &HeaderMap) -> Credential {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(Credential::from_header)
        .unwrap_or_default()
}

/// Return a backend reply with its own status and body.
fn mirror(reply: CompletionReply) -> Response {
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::BAD_GATEWAY);
    (status, [(header::CONTENT_TYPE, "application/json")], reply.body).into_response()
}

async fn chat_completions(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    let body = body.map_err(ApiError::from)?;
    let request: ChatCompletionRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::invalid_request(format!("Invalid request body: {}", e)))?;
    info!(
        "Chat completion: model={} messages={} caller_tools={}",
        request.model,
        request.messages.len(),
        request.has_tools()
    );

    let report = state
        .orchestrator
        .run_turn(request, &credential(&headers))
        .await?;

    if report.used_tools() {
        let failed = report.results.iter().filter(|r| r.is_error()).count();
        info!(
            "Turn used {} tool(s), {} failed, {} dropped",
            report.results.len(),
            failed,
            report.dropped
        );
    }
    Ok(mirror(report.reply))
}

async fn list_tools(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "object": "list",
        "data": state.catalog.definitions()
    }))
}

async fn list_models(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let reply = state
        .orchestrator
        .relay()
        .list_models(&credential(&headers))
        .await?;
    Ok(mirror(reply))
}

async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    let metrics = state.metrics.snapshot();
    Json(json!({
        "status": "healthy",
        "service": "mcp-relay",
        "tools": state.catalog.len(),
        "relay_success_rate": metrics.relay_success_rate(),
        "tool_success_rate": metrics.tool_success_rate(),
        "metrics": metrics
    }))
}
