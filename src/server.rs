//! Server lifecycle: bind, serve, and stop on the shutdown signal.

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::ws::handler::dispatch;

/// Builds the router: every path goes through the dispatcher.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .fallback(dispatch)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// A bound, not yet running endpoint.
#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    state: AppState,
}

impl Server {
    /// Binds the listener and creates fresh shared state.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Io`] if the address cannot be bound.
    pub async fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(config.listen_addr).await?;
        Ok(Self {
            listener,
            state: AppState::new(config),
        })
    }

    /// Returns the bound address (useful when binding port 0).
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Io`] if the socket address is unavailable.
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Shared state of this server instance.
    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Accepts connections until the shutdown signal fires.
    ///
    /// The listener is dropped as soon as the signal resolves, so later
    /// connection attempts are refused. Sessions still running are left
    /// to finish or to be dropped with the runtime.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Io`] if serving fails.
    pub async fn run(self) -> Result<(), ServerError> {
        let addr = self.local_addr()?;
        let shutdown = self.state.shutdown.clone();
        let app = build_router(self.state);

        tracing::info!(%addr, "server listening");

        axum::serve(self.listener, app)
            .with_graceful_shutdown(async move {
                shutdown.wait().await;
                tracing::info!("shutdown signal received; no longer accepting connections");
            })
            .await?;

        tracing::info!("server stopped");
        Ok(())
    }
}
