//! Periodic snapshot writer.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;
use tracing::{debug, error, info};

use devicegate_core::config::PersistenceConfig;
use devicegate_core::result::AppResult;
use devicegate_core::types::DeviceLimit;

use super::health::StoreHealth;
use super::snapshot::SessionSnapshot;
use crate::store::SessionStore;

/// Restores the store at startup and writes snapshots when it changes.
#[derive(Debug)]
pub struct SnapshotPersister {
    store: Arc<dyn SessionStore>,
    health: Arc<StoreHealth>,
    path: PathBuf,
    interval: Duration,
    limit: DeviceLimit,
    /// Store revision covered by the last successful write.
    flushed_revision: AtomicU64,
}

impl SnapshotPersister {
    /// Creates a persister for the configured snapshot file.
    pub fn new(
        store: Arc<dyn SessionStore>,
        health: Arc<StoreHealth>,
        config: &PersistenceConfig,
        limit: DeviceLimit,
    ) -> Self {
        let flushed_revision = AtomicU64::new(store.revision());
        Self {
            store,
            health,
            path: PathBuf::from(&config.path),
            interval: Duration::from_secs(config.flush_interval_seconds),
            limit,
            flushed_revision,
        }
    }

    /// Loads the snapshot into the store. Returns the number of sessions
    /// restored; a missing file restores nothing.
    pub async fn restore(&self) -> AppResult<usize> {
        let Some(mut snapshot) = SessionSnapshot::read(&self.path).await? else {
            info!(path = %self.path.display(), "No session snapshot found, starting empty");
            return Ok(0);
        };

        let trimmed = snapshot.trim_to_limit(self.limit);
        let restored = snapshot.session_count();
        let users = snapshot.users.len();
        self.store.restore(snapshot.users);

        // Trimmed sets differ from the file, so leave them for the next flush.
        let revision = self.store.revision();
        let flushed = if trimmed == 0 { revision } else { revision.wrapping_sub(1) };
        self.flushed_revision.store(flushed, Ordering::SeqCst);

        info!(
            path = %self.path.display(),
            saved_at = %snapshot.saved_at,
            users,
            sessions = restored,
            trimmed,
            "Session snapshot restored"
        );
        Ok(restored)
    }

    /// Writes a snapshot if the store changed since the last write.
    /// Returns whether a write happened.
    pub async fn flush(&self) -> AppResult<bool> {
        let revision = self.store.revision();
        if revision == self.flushed_revision.load(Ordering::SeqCst) {
            return Ok(false);
        }

        let snapshot = SessionSnapshot::capture(self.store.as_ref());
        match snapshot.write(&self.path).await {
            Ok(()) => {
                self.flushed_revision.store(revision, Ordering::SeqCst);
                self.health.mark_available();
                debug!(
                    revision,
                    sessions = snapshot.session_count(),
                    "Session snapshot written"
                );
                Ok(true)
            }
            Err(e) => {
                self.health.mark_unavailable();
                Err(e)
            }
        }
    }

    /// Flushes every interval until `shutdown` flips (or its sender is
    /// dropped), then flushes once more.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!(
            path = %self.path.display(),
            interval_secs = self.interval.as_secs(),
            "Snapshot persister started"
        );

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    // A dropped sender also means the server is gone.
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                _ = time::sleep(self.interval) => {
                    if let Err(e) = self.flush().await {
                        error!(error = %e, "Failed to write session snapshot");
                    }
                }
            }
        }

        match self.flush().await {
            Ok(_) => info!("Final session snapshot written"),
            Err(e) => error!(error = %e, "Failed to write final session snapshot"),
        }
    }
}
