//! In-memory session store backed by a sharded concurrent map.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use dashmap::DashMap;
use tracing::debug;

use devicegate_core::types::{DeviceId, UserId};
use devicegate_entity::Session;

use super::SessionStore;

/// In-memory [`SessionStore`].
///
/// Each user's set is a `Vec` guarded by its map shard. Users whose set
/// becomes empty are dropped from the map.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    /// Active session sets keyed by user.
    users: DashMap<UserId, Vec<Session>>,
    /// Bumped on every mutation.
    revision: AtomicU64,
}

impl MemorySessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of users holding at least one session.
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    fn bump(&self) {
        self.revision.fetch_add(1, Ordering::SeqCst);
    }

    fn drop_if_empty(&self, user_id: &UserId) {
        self.users.remove_if(user_id, |_, sessions| sessions.is_empty());
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, user_id: &UserId) -> Vec<Session> {
        self.users
            .get(user_id)
            .map(|sessions| sessions.clone())
            .unwrap_or_default()
    }

    fn find(&self, user_id: &UserId, device_id: &DeviceId) -> Option<Session> {
        self.users
            .get(user_id)?
            .iter()
            .find(|s| &s.device_id == device_id)
            .cloned()
    }

    fn upsert(&self, user_id: &UserId, device_id: &DeviceId, device_name: &str) -> Session {
        let now = Utc::now();
        let mut sessions = self.users.entry(user_id.clone()).or_default();

        let session = match sessions.iter_mut().find(|s| &s.device_id == device_id) {
            Some(existing) => {
                existing.touch(device_name, now);
                existing.clone()
            }
            None => {
                let created = Session::new(user_id.clone(), device_id.clone(), device_name, now);
                sessions.push(created.clone());
                debug!(
                    user_id = %user_id,
                    device_id = %device_id,
                    session_id = %created.id,
                    "Session appended"
                );
                created
            }
        };
        drop(sessions);

        self.bump();
        session
    }

    fn remove(&self, user_id: &UserId, device_id: &DeviceId) -> bool {
        let removed = match self.users.get_mut(user_id) {
            Some(mut sessions) => {
                let before = sessions.len();
                sessions.retain(|s| &s.device_id != device_id);
                sessions.len() != before
            }
            None => false,
        };

        if removed {
            self.drop_if_empty(user_id);
            self.bump();
        }
        removed
    }

    fn remove_all_except(&self, user_id: &UserId, keep: Option<&DeviceId>) -> Vec<Session> {
        let removed: Vec<Session> = match self.users.get_mut(user_id) {
            Some(mut sessions) => {
                let (kept, removed): (Vec<Session>, Vec<Session>) = sessions
                    .drain(..)
                    .partition(|s| keep == Some(&s.device_id));
                *sessions = kept;
                removed
            }
            None => Vec::new(),
        };

        if !removed.is_empty() {
            self.drop_if_empty(user_id);
            self.bump();
        }
        removed
    }

    fn count(&self, user_id: &UserId) -> usize {
        self.users.get(user_id).map(|s| s.len()).unwrap_or(0)
    }

    fn revision(&self) -> u64 {
        self.revision.load(Ordering::SeqCst)
    }

    fn snapshot(&self) -> BTreeMap<UserId, Vec<Session>> {
        self.users
            .iter()
            .filter(|entry| !entry.value().is_empty())
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    fn restore(&self, users: BTreeMap<UserId, Vec<Session>>) {
        self.users.clear();
        for (user_id, sessions) in users {
            if !sessions.is_empty() {
                self.users.insert(user_id, sessions);
            }
        }
        self.bump();
    }
}
