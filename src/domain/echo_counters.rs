//! Shared message counters for the echo route.
//!
//! All `/echotest` sessions share one [`EchoCounters`]. The received and
//! sent totals are reset when the last active echo client leaves, so test
//! runs that share one server process each start from zero.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;

/// Point-in-time copy of the echo counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CounterSnapshot {
    /// Messages received across all active echo sessions.
    pub received: u64,
    /// Messages sent across all active echo sessions.
    pub sent: u64,
    /// Echo sessions currently running.
    pub active_clients: u64,
}

/// Process-wide echo counters behind a single mutex.
#[derive(Debug, Default)]
pub struct EchoCounters {
    state: Mutex<CounterSnapshot>,
}

impl EchoCounters {
    /// Creates zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new active echo client.
    ///
    /// The returned guard performs the exit bookkeeping when dropped, so
    /// it runs exactly once no matter how the session ends.
    #[must_use]
    pub fn enter(self: &Arc<Self>) -> ActiveClient {
        self.lock().active_clients += 1;
        ActiveClient {
            counters: Arc::clone(self),
        }
    }

    /// Records one received message.
    pub fn record_received(&self) {
        self.lock().received += 1;
    }

    /// Records one sent message.
    pub fn record_sent(&self) {
        self.lock().sent += 1;
    }

    /// Returns a copy of the current counter values.
    #[must_use]
    pub fn snapshot(&self) -> CounterSnapshot {
        *self.lock()
    }

    fn leave(&self) {
        let mut state = self.lock();
        state.active_clients = state.active_clients.saturating_sub(1);
        if state.active_clients == 0 {
            state.received = 0;
            state.sent = 0;
        }
    }

    // Every update is a single field write; poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, CounterSnapshot> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Guard for one active echo client; decrements the active count on drop.
#[derive(Debug)]
pub struct ActiveClient {
    counters: Arc<EchoCounters>,
}

impl Drop for ActiveClient {
    fn drop(&mut self) {
        self.counters.leave();
    }
}
