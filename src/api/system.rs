//! System endpoints: health check and echo statistics.

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use serde::Serialize;

use crate::app_state::AppState;
use crate::domain::path_behavior::PathSummary;

/// Health check response.
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
    version: &'static str,
}

/// `GET /health` — Service health status.
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy",
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}

/// Echo counters plus the registered paths.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    /// Messages received across active echo sessions.
    pub received: u64,
    /// Messages sent across active echo sessions.
    pub sent: u64,
    /// Echo sessions currently running.
    pub active_clients: u64,
    /// Paths registered through the control channel.
    pub paths: Vec<PathSummary>,
    /// Time the snapshot was taken (RFC 3339).
    pub timestamp: String,
}

/// `GET /stats` — Current echo counters and registered paths.
pub async fn stats_handler(state: &AppState) -> impl IntoResponse {
    let counters = state.counters.snapshot();
    let paths = state.registry.list().await;
    (
        StatusCode::OK,
        Json(StatsResponse {
            received: counters.received,
            sent: counters.sent,
            active_clients: counters.active_clients,
            paths,
            timestamp: Utc::now().to_rfc3339(),
        }),
    )
}
