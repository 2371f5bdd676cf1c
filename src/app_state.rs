//! Shared application state injected into the dispatcher and handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::domain::{EchoCounters, PathRegistry, ShutdownSignal};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Paths provisioned through the control channel.
    pub registry: Arc<PathRegistry>,
    /// Counters shared by all `/echotest` sessions.
    pub counters: Arc<EchoCounters>,
    /// Fires once to stop the accept loop.
    pub shutdown: ShutdownSignal,
    /// Endpoint configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Builds fresh, empty state for one server instance.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        Self {
            registry: Arc::new(PathRegistry::new()),
            counters: Arc::new(EchoCounters::new()),
            shutdown: ShutdownSignal::new(),
            config: Arc::new(config),
        }
    }
}
