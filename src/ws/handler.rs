//! Dispatcher: resolves an inbound request to a route and runs it.
//!
//! Every request reaches [`dispatch`] through the router fallback. Upgrade
//! requests are resolved to a [`Route`] and served on their own task;
//! plain HTTP requests are answered by [`crate::api`].

use std::collections::HashMap;

use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::ws::{WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::http::{Method, Uri};
use axum::response::{IntoResponse, Response};
use tracing::Instrument;

use super::control::run_control;
use super::echo::{EchoOptions, run_echo};
use super::oneshot;
use super::session::Session;
use crate::api;
use crate::app_state::AppState;
use crate::domain::Route;
use crate::error::ServerError;

/// Router fallback for every path.
pub async fn dispatch(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
    upgrade: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    let path = uri.path().to_owned();

    let Ok(upgrade) = upgrade else {
        return api::respond(&method, &path, &state).await;
    };

    let route = Route::resolve(&path, &state.registry).await;
    let span = tracing::info_span!(
        "session",
        id = %uuid::Uuid::new_v4(),
        path = %path,
        route = route.name()
    );

    upgrade
        .on_failed_upgrade(|error| tracing::warn!(%error, "websocket upgrade failed"))
        .on_upgrade(move |socket| run_session(socket, route, query, state).instrument(span))
        .into_response()
}

/// Runs one route on an upgraded socket.
///
/// This is the session boundary: the handler's outcome is logged here and
/// never propagates further.
pub async fn run_session(
    socket: WebSocket,
    route: Route,
    query: HashMap<String, String>,
    state: AppState,
) {
    tracing::debug!("session opened");

    let mut session = Session::new(
        socket,
        state.config.ping_interval,
        state.config.close_timeout,
    );

    let outcome = match &route {
        Route::OpenCloseTest => oneshot::open_close_test(&mut session).await,
        Route::EchoTest => {
            let options = EchoOptions::from_query(&query);
            run_echo(&mut session, &options, &state.counters).await
        }
        Route::CloseDuringEcho => oneshot::close_during_echo(&mut session).await,
        Route::Control => run_control(&mut session, &state).await,
        Route::Custom(behavior) => oneshot::custom_path(&mut session, behavior).await,
        Route::TerminateServer => {
            if state.shutdown.trigger() {
                tracing::info!("shutdown requested via terminate route");
            }
            return;
        }
        Route::EchoOnce => oneshot::echo_once(&mut session).await,
    };

    log_outcome(&outcome);
    session.finish().await;
}

fn log_outcome(outcome: &Result<(), ServerError>) {
    match outcome {
        Ok(()) => tracing::debug!("session handler completed"),
        Err(ServerError::ClosedAbnormally(info)) => {
            tracing::warn!(close = %info, "peer closed the connection abnormally");
        }
        Err(error) if error.is_peer_close() => {
            tracing::info!("peer closed the connection normally");
        }
        Err(ServerError::Transport(error)) => {
            tracing::warn!(%error, "connection lost; no close information provided");
        }
        Err(error) => tracing::error!(%error, "session failed"),
    }
}
