//! Single-resolution shutdown signal.
//!
//! [`ShutdownSignal`] wraps a [`tokio::sync::watch`] channel holding a
//! `bool`. It starts unset, may be triggered any number of times (only
//! the first has an effect), and any number of tasks can wait on it,
//! including ones that start waiting after it fired.

use std::sync::Arc;

use tokio::sync::watch;

/// Process-wide shutdown flag shared by the control channel, the
/// `/terminateserver` route, and the server lifecycle.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    sender: Arc<watch::Sender<bool>>,
}

impl ShutdownSignal {
    /// Creates an unset signal.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Sets the signal.
    ///
    /// Returns `true` if this call resolved it, `false` if it was already set.
    pub fn trigger(&self) -> bool {
        self.sender.send_if_modified(|fired| {
            if *fired {
                false
            } else {
                *fired = true;
                true
            }
        })
    }

    /// Returns `true` once the signal has been set.
    #[must_use]
    pub fn is_triggered(&self) -> bool {
        *self.sender.borrow()
    }

    /// Waits until the signal is set. Returns immediately if it already is.
    pub async fn wait(&self) {
        let mut receiver = self.sender.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = receiver.wait_for(|fired| *fired).await;
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}
