use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use mcp_relay_core::OrchestratorError;
use mcp_relay_providers::RelayError;
use serde::Serialize;

/// Error raised by the relay itself, as opposed to a backend reply being
/// mirrored. Serialises as `{"error": {"type": "<kind>", "message": "<text>"}}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ApiErrorResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorBody {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ApiErrorResponse {
                error: ApiErrorBody {
                    kind: kind.into(),
                    message: message.into(),
                },
            },
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_request_body", message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        let status = rejection.status();
        let kind = if status == StatusCode::PAYLOAD_TOO_LARGE {
            "request_too_large"
        } else {
            "invalid_request_body"
        };
        Self::new(status, kind, rejection.body_text())
    }
}

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        let message = err.to_string();
        match err {
            RelayError::Unreachable(_) => {
                Self::new(StatusCode::BAD_GATEWAY, "backend_unreachable", message)
            }
            RelayError::InvalidResponse(_) => {
                Self::new(StatusCode::BAD_GATEWAY, "backend_error", message)
            }
            RelayError::Timeout(_) => {
                Self::new(StatusCode::GATEWAY_TIMEOUT, "backend_timeout", message)
            }
        }
    }
}

impl From<OrchestratorError> for ApiError {
    fn from(err: OrchestratorError) -> Self {
        match err {
            OrchestratorError::FirstPass(e) | OrchestratorError::FinalPass(e) => e.into(),
        }
    }
}
