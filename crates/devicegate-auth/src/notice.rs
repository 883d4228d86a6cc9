//! Pending eviction notices, one per evicted device.

use std::time::Duration;

use moka::sync::Cache;
use tracing::debug;

use devicegate_core::config::SessionConfig;
use devicegate_core::types::{DeviceId, UserId};
use devicegate_entity::EvictionNotice;

/// Holds the latest eviction notice for each `(user, device)` until the
/// device reads it or the TTL runs out.
#[derive(Debug, Clone)]
pub struct NoticeBoard {
    cache: Cache<(UserId, DeviceId), EvictionNotice>,
}

impl NoticeBoard {
    /// Creates a board with the configured TTL and capacity.
    pub fn new(config: &SessionConfig) -> Self {
        Self::with_limits(
            Duration::from_secs(config.notice_ttl_seconds),
            config.notice_capacity,
        )
    }

    /// Creates a board with an explicit TTL and capacity.
    pub fn with_limits(ttl: Duration, capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .build();
        Self { cache }
    }

    /// Stores a notice, replacing any earlier one for the same device.
    pub fn post(&self, user_id: &UserId, notice: EvictionNotice) {
        debug!(
            user_id = %user_id,
            device_id = %notice.device_id,
            reason = %notice.reason,
            "Eviction notice posted"
        );
        self.cache
            .insert((user_id.clone(), notice.device_id.clone()), notice);
    }

    /// Returns and removes the pending notice for a device.
    pub fn take(&self, user_id: &UserId, device_id: &DeviceId) -> Option<EvictionNotice> {
        self.cache.remove(&(user_id.clone(), device_id.clone()))
    }

    /// Drops any pending notice for a device that is back in.
    pub fn clear(&self, user_id: &UserId, device_id: &DeviceId) {
        self.cache.invalidate(&(user_id.clone(), device_id.clone()));
    }
}
