//! Read-only device listings.

use std::sync::Arc;

use devicegate_core::types::{DeviceId, UserId};
use devicegate_entity::{DeviceView, Session};

use crate::store::SessionStore;

/// Projects sessions into listing rows, first-registered first.
///
/// The sort is stable, so sessions sharing a `created_at` keep insertion
/// order.
pub fn project(mut sessions: Vec<Session>, current: Option<&DeviceId>) -> Vec<DeviceView> {
    sessions.sort_by_key(|s| s.created_at);
    sessions.iter().map(|s| s.to_view(current)).collect()
}

/// Lists a user's admitted devices.
#[derive(Debug, Clone)]
pub struct SessionQueryService {
    store: Arc<dyn SessionStore>,
}

impl SessionQueryService {
    /// Creates a new query service.
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Returns the user's devices ordered by `created_at`, flagging the
    /// entry matching `self_device_id`.
    pub fn list_devices(
        &self,
        user_id: &UserId,
        self_device_id: Option<&DeviceId>,
    ) -> Vec<DeviceView> {
        project(self.store.get(user_id), self_device_id)
    }

    /// Number of devices the user currently holds.
    pub fn device_count(&self, user_id: &UserId) -> usize {
        self.store.count(user_id)
    }
}
