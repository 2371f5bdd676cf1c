//! Behavior descriptor for a dynamically provisioned path.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Behavior attached to a path registered through the control channel.
///
/// Created by a `newPath` command and never mutated afterwards; a later
/// `newPath` for the same path replaces the whole entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathBehavior {
    /// Normalized request path (always starts with a single `/`).
    pub path: String,

    /// Delay applied before the one-shot echo reply.
    pub delay: Duration,

    /// Registration timestamp.
    pub registered_at: DateTime<Utc>,
}

impl PathBehavior {
    /// Creates a behavior for `path`, normalizing it to a single leading `/`.
    #[must_use]
    pub fn new(path: &str, delay: Duration) -> Self {
        Self {
            path: normalize_path(path),
            delay,
            registered_at: Utc::now(),
        }
    }
}

/// Serializable view of a [`PathBehavior`] for the `/stats` endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct PathSummary {
    /// Registered path.
    pub path: String,
    /// Reply delay in milliseconds.
    pub delay_millis: u64,
    /// Registration timestamp.
    pub registered_at: DateTime<Utc>,
}

impl From<&PathBehavior> for PathSummary {
    fn from(behavior: &PathBehavior) -> Self {
        Self {
            path: behavior.path.clone(),
            delay_millis: u64::try_from(behavior.delay.as_millis()).unwrap_or(u64::MAX),
            registered_at: behavior.registered_at,
        }
    }
}

/// Normalizes a path to exactly one leading `/`.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    format!("/{}", path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_adds_or_collapses_leading_slash() {
        assert_eq!(normalize_path("foo"), "/foo");
        assert_eq!(normalize_path("/foo"), "/foo");
        assert_eq!(normalize_path("//foo/bar"), "/foo/bar");
    }

    #[test]
    fn summary_reports_millis() {
        let behavior = PathBehavior::new("slow", Duration::from_secs(2));
        let summary = PathSummary::from(&behavior);
        assert_eq!(summary.path, "/slow");
        assert_eq!(summary.delay_millis, 2000);
    }
}
