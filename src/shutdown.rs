//! Graceful shutdown coordination.
//!
//! A shared [`ShutdownCoordinator`] lets the Ctrl+C handler request early
//! termination. The executor observes the request only at chunk boundaries
//! (and while waiting out a retry backoff), so an interrupted run always
//! stops in a well-defined state: the accepted-chunk count is exact and the
//! caller can compute a resume range from it.

use once_cell::sync::OnceCell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Shared handle to a shutdown coordinator.
pub type SharedShutdown = Arc<ShutdownCoordinator>;

static GLOBAL_SHUTDOWN: OnceCell<SharedShutdown> = OnceCell::new();

/// Install a process-wide shutdown handle. Later installs are ignored.
pub fn install_global(handle: SharedShutdown) {
    let _ = GLOBAL_SHUTDOWN.set(handle);
}

/// The installed process-wide shutdown handle, if any.
pub fn global() -> Option<SharedShutdown> {
    GLOBAL_SHUTDOWN.get().cloned()
}

/// One-way shutdown latch shared across async tasks.
#[derive(Debug, Default)]
pub struct ShutdownCoordinator {
    requested: AtomicBool,
    notify: Notify,
}

impl ShutdownCoordinator {
    /// Create a coordinator with no shutdown requested.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a coordinator behind an [`Arc`] for sharing across tasks.
    pub fn shared() -> SharedShutdown {
        Arc::new(Self::new())
    }

    /// Flip the latch. Waiters are woken once; further calls are no-ops.
    pub fn request(&self) {
        if !self.requested.swap(true, Ordering::SeqCst) {
            self.notify.notify_waiters();
        }
    }

    /// Whether shutdown has been requested.
    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Resolve once shutdown is requested; immediately if it already was.
    pub async fn wait(&self) {
        if self.is_requested() {
            return;
        }
        self.notify.notified().await;
    }
}
