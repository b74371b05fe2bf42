use std::{path::Path, sync::Arc};

use tokio::sync::watch;

/// Shared, immutable string. Cheap to clone across actor boundaries.
pub type ArcStr = Arc<str>;

/// Shared, immutable filesystem path.
pub type ArcPath = Arc<Path>;

/// A cancellation signal that can be shared between a caller and the tasks
/// working on its behalf.
///
/// Cloning yields another handle to the same signal: cancelling any clone
/// cancels them all. Once cancelled, a signal stays cancelled.
///
/// # Examples
/// ```ignore
/// let cancel = Cancel::new();
/// let worker = cancel.clone();
/// tokio::spawn(async move { worker.cancelled().await; });
/// cancel.cancel();
/// ```
#[derive(Debug, Clone)]
pub struct Cancel {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for Cancel {
    fn default() -> Self {
        Self::new()
    }
}

impl Cancel {
    /// Creates a signal in the not-cancelled state.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Flags the signal as cancelled and wakes every task waiting on it.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    /// Returns `true` once [`cancel`](Cancel::cancel) has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Completes when the signal is cancelled. Completes immediately if it
    /// already is.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives as long as `self`, so this only returns on cancel.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}
