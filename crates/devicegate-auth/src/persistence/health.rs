//! Availability flag shared by the snapshot persister and the admission path.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, warn};

/// Tracks whether the last snapshot write succeeded.
#[derive(Debug)]
pub struct StoreHealth {
    available: AtomicBool,
    fail_closed: bool,
}

impl StoreHealth {
    /// Healthy store. With `fail_closed`, an unavailable store blocks new sessions.
    pub fn new(fail_closed: bool) -> Self {
        Self {
            available: AtomicBool::new(true),
            fail_closed,
        }
    }

    /// Health for a store that is never persisted.
    pub fn in_memory() -> Self {
        Self::new(false)
    }

    /// Whether the last write succeeded.
    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    /// Whether new sessions must currently be refused.
    pub fn rejects_new_sessions(&self) -> bool {
        self.fail_closed && !self.is_available()
    }

    /// Record a successful write.
    pub fn mark_available(&self) {
        if !self.available.swap(true, Ordering::SeqCst) {
            info!("Session store available again");
        }
    }

    /// Record a failed write.
    pub fn mark_unavailable(&self) {
        if self.available.swap(false, Ordering::SeqCst) {
            warn!(
                fail_closed = self.fail_closed,
                "Session store unavailable"
            );
        }
    }
}
