//! User-directed eviction: single device and logout-others.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use devicegate_core::types::{DeviceId, UserId};
use devicegate_entity::{EvictionNotice, EvictionReason, Session};

use crate::admission::UserLocks;
use crate::notice::NoticeBoard;
use crate::store::SessionStore;

/// Result of a single-device eviction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvictionOutcome {
    /// Whether a session was removed.
    pub removed: bool,
    /// Whether the removed device is the caller's own device.
    pub was_self: bool,
}

/// Removes sessions under the same per-user lock used by admission.
#[derive(Debug, Clone)]
pub struct EvictionService {
    store: Arc<dyn SessionStore>,
    locks: Arc<UserLocks>,
    notices: Arc<NoticeBoard>,
}

impl EvictionService {
    /// Creates a new eviction service.
    pub fn new(
        store: Arc<dyn SessionStore>,
        locks: Arc<UserLocks>,
        notices: Arc<NoticeBoard>,
    ) -> Self {
        Self {
            store,
            locks,
            notices,
        }
    }

    /// Signs one device out.
    ///
    /// `self_device_id` is the caller's own device; `was_self` tells the
    /// caller it must treat itself as logged out. A notice is left only when
    /// the caller names its own device and the target is a different one.
    pub async fn evict_device(
        &self,
        user_id: &UserId,
        device_id: &DeviceId,
        self_device_id: Option<&DeviceId>,
    ) -> EvictionOutcome {
        let _guard = self.locks.acquire(user_id).await;

        let was_self = self_device_id == Some(device_id);
        let reason = self_device_id
            .is_some_and(|caller| caller != device_id)
            .then_some(EvictionReason::RemoteLogout);
        let removed = self
            .evict_locked(user_id, device_id, self_device_id, reason)
            .is_some();

        info!(
            user_id = %user_id,
            device_id = %device_id,
            removed,
            was_self,
            "Device logout"
        );

        EvictionOutcome {
            removed,
            was_self: removed && was_self,
        }
    }

    /// Signs out every device except `self_device_id` and returns how many
    /// sessions were removed.
    pub async fn evict_others(&self, user_id: &UserId, self_device_id: &DeviceId) -> usize {
        let _guard = self.locks.acquire(user_id).await;

        let removed = self.store.remove_all_except(user_id, Some(self_device_id));
        for session in &removed {
            self.post_notice(
                user_id,
                session,
                EvictionReason::RemoteLogout,
                Some(self_device_id),
            );
        }

        info!(
            user_id = %user_id,
            kept_device_id = %self_device_id,
            removed = removed.len(),
            "Logged out other devices"
        );

        removed.len()
    }

    pub(crate) fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    pub(crate) fn locks(&self) -> &Arc<UserLocks> {
        &self.locks
    }

    pub(crate) fn notices(&self) -> &Arc<NoticeBoard> {
        &self.notices
    }

    /// Returns and clears the pending notice for a device.
    pub fn take_notice(&self, user_id: &UserId, device_id: &DeviceId) -> Option<EvictionNotice> {
        self.notices.take(user_id, device_id)
    }

    /// Removes `device_id` while the caller already holds the user's lock.
    ///
    /// Posts a notice with `reason` when one is given.
    pub(crate) fn evict_locked(
        &self,
        user_id: &UserId,
        device_id: &DeviceId,
        evicted_by: Option<&DeviceId>,
        reason: Option<EvictionReason>,
    ) -> Option<Session> {
        let session = self.store.find(user_id, device_id)?;
        if !self.store.remove(user_id, device_id) {
            return None;
        }
        if let Some(reason) = reason {
            self.post_notice(user_id, &session, reason, evicted_by);
        }
        Some(session)
    }

    fn post_notice(
        &self,
        user_id: &UserId,
        session: &Session,
        reason: EvictionReason,
        evicted_by: Option<&DeviceId>,
    ) {
        self.notices.post(
            user_id,
            EvictionNotice::new(session.device_id.clone(), reason, evicted_by.cloned()),
        );
    }
}
