//! Domain layer: routes, path registry, echo counters, and shutdown signal.
//!
//! This module holds the shared state that outlives individual
//! connections. Each piece carries its own synchronization primitive and
//! is injected into handlers through [`crate::app_state::AppState`].

pub mod echo_counters;
pub mod path_behavior;
pub mod path_registry;
pub mod route;
pub mod shutdown;

pub use echo_counters::{ActiveClient, CounterSnapshot, EchoCounters};
pub use path_behavior::PathBehavior;
pub use path_registry::PathRegistry;
pub use route::Route;
pub use shutdown::ShutdownSignal;
