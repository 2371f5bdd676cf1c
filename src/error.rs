//! Endpoint error types.
//!
//! [`ServerError`] is the central error type. Session handlers return it to
//! report how a connection ended; the session boundary in
//! [`crate::ws::handler::run_session`] classifies it and never lets it
//! escape the connection task. The HTTP-facing variants map to a status
//! code and a structured JSON error response.

use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Structured JSON error response body.
///
/// ```json
/// {
///   "error": {
///     "code": 426,
///     "message": "websocket upgrade required for /echotest"
///   }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Numeric error code (the HTTP status code).
    pub code: u16,
    /// Human-readable error message.
    pub message: String,
}

/// Close code and reason reported by a peer that went away abnormally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloseInfo {
    /// Close status code, if the peer sent one.
    pub code: Option<u16>,
    /// Close reason text (may be empty).
    pub reason: String,
}

impl fmt::Display for CloseInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) if self.reason.is_empty() => write!(f, "code {code}"),
            Some(code) => write!(f, "code {code}, reason `{}`", self.reason),
            None => f.write_str("no close information provided"),
        }
    }
}

/// Endpoint error enum.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The peer completed a normal close handshake (1000 or 1001).
    #[error("peer closed the connection normally")]
    ClosedNormally,

    /// The peer went away without a normal close.
    #[error("peer closed the connection abnormally: {0}")]
    ClosedAbnormally(CloseInfo),

    /// Error surfaced by the WebSocket transport.
    #[error("websocket transport error: {0}")]
    Transport(#[from] axum::Error),

    /// A control command had missing or malformed arguments.
    #[error("invalid command: {0}")]
    InvalidCommand(String),

    /// A plain HTTP request arrived on a WebSocket route.
    #[error("websocket upgrade required for {0}")]
    UpgradeRequired(String),

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Socket or listener failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServerError {
    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::UpgradeRequired(_) => StatusCode::UPGRADE_REQUIRED,
            Self::InvalidCommand(_) => StatusCode::BAD_REQUEST,
            Self::ClosedNormally
            | Self::ClosedAbnormally(_)
            | Self::Transport(_)
            | Self::Config(_)
            | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns `true` if this error is one of the two ways a peer ends a
    /// session (normal or abnormal close) rather than a fault.
    #[must_use]
    pub const fn is_peer_close(&self) -> bool {
        matches!(self, Self::ClosedNormally | Self::ClosedAbnormally(_))
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: status.as_u16(),
                message: self.to_string(),
            },
        };
        (status, axum::Json(body)).into_response()
    }
}
