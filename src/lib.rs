//! # ws-test-endpoint
//!
//! Scriptable mock WebSocket endpoint for driving WebSocket client tests.
//!
//! The endpoint echoes, delays, fragments, and closes connections on
//! request, and a control channel lets a test provision new paths and stop
//! the server at runtime.
//!
//! ## Architecture
//!
//! ```text
//! Clients (WebSocket, plain HTTP)
//!     │
//!     ├── Dispatcher (ws/handler)  ──── Diagnostics (api/)
//!     │
//!     ├── Routes: echo, control, one-shot (ws/)
//!     ├── Session (ws/session)
//!     │
//!     └── Shared state (domain/)
//!         ├── PathRegistry
//!         ├── EchoCounters
//!         └── ShutdownSignal ──── Server lifecycle (server)
//! ```
//!
//! ## Routes
//!
//! | Path | Behavior |
//! |---|---|
//! | `/openclosetest` | read once, never reply |
//! | `/echotest` | echo loop; `delay=<seconds>`, `fragment=true` |
//! | `/closeduringecho` | read once, close with 1001 `closed` |
//! | `/control` | command channel (`close`, `newPath <path> <delaySeconds>`) |
//! | `/terminateserver` | stop the server |
//! | registered path | one delayed echo, then close |
//! | anything else | reply `Data received as: <message>!` |

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod server;
pub mod ws;
