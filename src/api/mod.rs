//! Plain HTTP diagnostics.
//!
//! Only requests that are not WebSocket upgrades land here, so these
//! endpoints never shadow a WebSocket route.

pub mod system;

use axum::http::Method;
use axum::response::{IntoResponse, Response};

use crate::app_state::AppState;
use crate::error::ServerError;

/// Answers a non-upgrade request for `path`.
///
/// `GET /health` and `GET /stats` are served; everything else gets
/// `426 Upgrade Required`.
pub async fn respond(method: &Method, path: &str, state: &AppState) -> Response {
    let is_get = *method == Method::GET;
    match path {
        "/health" if is_get => system::health_handler().await.into_response(),
        "/stats" if is_get => system::stats_handler(state).await.into_response(),
        _ => ServerError::UpgradeRequired(path.to_owned()).into_response(),
    }
}
