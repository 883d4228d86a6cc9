//! Keyed registry of per-user admission locks.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use devicegate_core::types::UserId;

/// One Tokio mutex per user.
///
/// Every read-check-write sequence against a user's session set runs while
/// holding that user's guard. Different users never contend.
#[derive(Debug, Default)]
pub struct UserLocks {
    locks: DashMap<UserId, Arc<Mutex<()>>>,
}

impl UserLocks {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `user_id`'s session set.
    pub async fn acquire(&self, user_id: &UserId) -> UserGuard<'_> {
        // Clone while the shard is still locked so `prune` cannot race us.
        let lock = self
            .locks
            .entry(user_id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let guard = lock.lock_owned().await;

        UserGuard {
            guard: Some(guard),
            locks: self,
            user_id: user_id.clone(),
        }
    }

    /// Number of users with a registered lock.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Returns `true` if no locks are registered.
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }

    /// Drops the user's mutex when nobody holds or waits on it.
    fn prune(&self, user_id: &UserId) {
        self.locks
            .remove_if(user_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

/// Exclusive access to one user's session set. Released on drop.
#[derive(Debug)]
pub struct UserGuard<'a> {
    guard: Option<OwnedMutexGuard<()>>,
    locks: &'a UserLocks,
    user_id: UserId,
}

impl UserGuard<'_> {
    /// The user this guard covers.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }
}

impl Drop for UserGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        self.locks.prune(&self.user_id);
    }
}
