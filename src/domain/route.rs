//! Route resolution for inbound connections.
//!
//! Every upgraded connection is resolved to exactly one [`Route`] before
//! the socket is handed to a handler.

use super::{PathBehavior, PathRegistry};

/// Diagnostic route: read once, never reply.
pub const OPEN_CLOSE_TEST: &str = "/openclosetest";
/// Echo loop with optional `delay` and `fragment` query parameters.
pub const ECHO_TEST: &str = "/echotest";
/// Read once, then close with 1001 "going away".
pub const CLOSE_DURING_ECHO: &str = "/closeduringecho";
/// Control channel command loop.
pub const CONTROL: &str = "/control";
/// Triggers server shutdown without reading or writing.
pub const TERMINATE_SERVER: &str = "/terminateserver";

/// Behavior selected for one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/openclosetest`.
    OpenCloseTest,
    /// `/echotest`.
    EchoTest,
    /// `/closeduringecho`.
    CloseDuringEcho,
    /// `/control`.
    Control,
    /// A path registered through the control channel.
    Custom(PathBehavior),
    /// `/terminateserver`.
    TerminateServer,
    /// Anything else: reply once with `Data received as: <message>!`.
    EchoOnce,
}

impl Route {
    /// Resolves `path` (without query string) to a route.
    ///
    /// Built-in literal routes win over registered paths, and registered
    /// paths win over `/terminateserver`.
    pub async fn resolve(path: &str, registry: &PathRegistry) -> Self {
        match path {
            OPEN_CLOSE_TEST => return Self::OpenCloseTest,
            ECHO_TEST => return Self::EchoTest,
            CLOSE_DURING_ECHO => return Self::CloseDuringEcho,
            CONTROL => return Self::Control,
            _ => {}
        }

        if let Some(behavior) = registry.get(path).await {
            return Self::Custom(behavior);
        }

        if path == TERMINATE_SERVER {
            Self::TerminateServer
        } else {
            Self::EchoOnce
        }
    }

    /// Short name used in log fields.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::OpenCloseTest => "open_close_test",
            Self::EchoTest => "echo_test",
            Self::CloseDuringEcho => "close_during_echo",
            Self::Control => "control",
            Self::Custom(_) => "custom_path",
            Self::TerminateServer => "terminate_server",
            Self::EchoOnce => "echo_once",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn literal_routes() {
        let registry = PathRegistry::new();
        assert_eq!(
            Route::resolve("/openclosetest", &registry).await,
            Route::OpenCloseTest
        );
        assert_eq!(Route::resolve("/echotest", &registry).await, Route::EchoTest);
        assert_eq!(
            Route::resolve("/closeduringecho", &registry).await,
            Route::CloseDuringEcho
        );
        assert_eq!(Route::resolve("/control", &registry).await, Route::Control);
        assert_eq!(
            Route::resolve("/terminateserver", &registry).await,
            Route::TerminateServer
        );
    }

    #[tokio::test]
    async fn unknown_paths_fall_back_to_echo_once() {
        let registry = PathRegistry::new();
        assert_eq!(Route::resolve("/xyz", &registry).await, Route::EchoOnce);
        assert_eq!(Route::resolve("/", &registry).await, Route::EchoOnce);
    }

    #[tokio::test]
    async fn registered_path_resolves_to_custom() {
        let registry = PathRegistry::new();
        let behavior = PathBehavior::new("foo", Duration::from_secs(2));
        let _ = registry.insert(behavior.clone()).await;

        assert_eq!(
            Route::resolve("/foo", &registry).await,
            Route::Custom(behavior)
        );
    }

    #[tokio::test]
    async fn literal_routes_win_over_registered_paths() {
        let registry = PathRegistry::new();
        let _ = registry
            .insert(PathBehavior::new("echotest", Duration::from_secs(1)))
            .await;
        assert_eq!(Route::resolve("/echotest", &registry).await, Route::EchoTest);
    }

    #[tokio::test]
    async fn registered_path_wins_over_terminate_server() {
        let registry = PathRegistry::new();
        let behavior = PathBehavior::new("terminateserver", Duration::ZERO);
        let _ = registry.insert(behavior.clone()).await;
        assert_eq!(
            Route::resolve("/terminateserver", &registry).await,
            Route::Custom(behavior)
        );
    }
}
