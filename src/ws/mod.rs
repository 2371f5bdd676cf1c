//! WebSocket layer: dispatch, sessions, and the per-route behaviors.
//!
//! Every upgrade request is resolved to a single [`crate::domain::Route`]
//! by [`handler::dispatch`] and served on its own task.

pub mod control;
pub mod echo;
pub mod handler;
pub mod oneshot;
pub mod session;
