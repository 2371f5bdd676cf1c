//! Concurrent storage for dynamically provisioned paths.
//!
//! [`PathRegistry`] maps a normalized request path to its
//! [`PathBehavior`]. The control channel writes to it and the dispatcher
//! reads it on every new connection, so the map sits behind a single
//! [`tokio::sync::RwLock`].

use std::collections::HashMap;

use tokio::sync::RwLock;

use super::PathBehavior;
use super::path_behavior::PathSummary;

/// Registry of paths created at runtime via `newPath`.
#[derive(Debug, Default)]
pub struct PathRegistry {
    paths: RwLock<HashMap<String, PathBehavior>>,
}

impl PathRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a behavior, replacing any previous entry for the same path.
    ///
    /// Returns the replaced behavior, if there was one.
    pub async fn insert(&self, behavior: PathBehavior) -> Option<PathBehavior> {
        let mut map = self.paths.write().await;
        map.insert(behavior.path.clone(), behavior)
    }

    /// Looks up the behavior registered for exactly `path`.
    ///
    /// Keys are normalized on insert; the request path is matched as is.
    pub async fn get(&self, path: &str) -> Option<PathBehavior> {
        let map = self.paths.read().await;
        map.get(path).cloned()
    }

    /// Returns summaries of all registered paths, sorted by path.
    pub async fn list(&self) -> Vec<PathSummary> {
        let map = self.paths.read().await;
        let mut summaries: Vec<PathSummary> = map.values().map(PathSummary::from).collect();
        summaries.sort_by(|a, b| a.path.cmp(&b.path));
        summaries
    }

    /// Returns the number of registered paths.
    pub async fn len(&self) -> usize {
        self.paths.read().await.len()
    }

    /// Returns `true` if no path has been registered.
    pub async fn is_empty(&self) -> bool {
        self.paths.read().await.is_empty()
    }
}
