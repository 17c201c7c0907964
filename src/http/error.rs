//! Structured error responses for handlers.
//!
//! [`HttpError`] renders as `{ "statusCode", "error", "message" }` JSON. This
//! is the body an error response keeps when no error page applies.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const INTERNAL_MESSAGE: &str = "An internal server error occurred";

/// JSON payload of an [`HttpError`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status_code: u16,
    pub error: String,
    pub message: String,
}

/// A handled failure with an HTTP status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{status}: {message}")]
pub struct HttpError {
    status: StatusCode,
    message: String,
}

impl HttpError {
    /// `status` below 400 is coerced to 500.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        let status = if status.is_client_error() || status.is_server_error() {
            status
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self {
            status,
            message: message.into(),
        }
    }

    /// Error whose message is the status reason phrase.
    pub fn from_status(status: StatusCode) -> Self {
        let message = status.canonical_reason().unwrap_or("Unknown");
        Self::new(status, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found() -> Self {
        Self::from_status(StatusCode::NOT_FOUND)
    }

    pub fn not_implemented() -> Self {
        Self::from_status(StatusCode::NOT_IMPLEMENTED)
    }

    /// A 500 for a server-side bug. The detail is kept for logs only.
    pub fn bad_implementation(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, detail)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Payload sent to the client. 500 messages are replaced with a generic one.
    pub fn body(&self) -> ErrorBody {
        let message = if self.status == StatusCode::INTERNAL_SERVER_ERROR {
            INTERNAL_MESSAGE.to_string()
        } else {
            self.message.clone()
        };
        ErrorBody {
            status_code: self.status.as_u16(),
            error: self.status.canonical_reason().unwrap_or("Unknown").to_string(),
            message,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, message = %self.message, "Handler failed");
        }
        (self.status, Json(self.body())).into_response()
    }
}
