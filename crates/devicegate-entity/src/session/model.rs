//! Session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use devicegate_core::types::{DeviceId, UserId};

use super::view::DeviceView;

/// An admitted device session.
///
/// Created when a device is admitted, refreshed when the same device
/// registers again, and destroyed by eviction. Within one user's active set
/// `device_id` is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Random identifier used for log correlation only.
    pub id: Uuid,
    /// The user this session belongs to.
    pub user_id: UserId,
    /// The device that opened the session.
    pub device_id: DeviceId,
    /// Last-seen display label for the device.
    pub device_name: String,
    /// When the device was first admitted.
    pub created_at: DateTime<Utc>,
    /// Last admission or touch.
    pub last_active: DateTime<Utc>,
}

impl Session {
    /// Create a fresh session with `created_at = last_active = now`.
    pub fn new(
        user_id: UserId,
        device_id: DeviceId,
        device_name: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            device_id,
            device_name: device_name.into(),
            created_at: now,
            last_active: now,
        }
    }

    /// Record a re-registration of the same device.
    pub fn touch(&mut self, device_name: impl Into<String>, now: DateTime<Utc>) {
        self.device_name = device_name.into();
        self.last_active = now;
    }

    /// Project this session for a listing requested by `current_device`.
    pub fn to_view(&self, current_device: Option<&DeviceId>) -> DeviceView {
        DeviceView {
            device_id: self.device_id.clone(),
            device_name: self.device_name.clone(),
            last_active: self.last_active,
            is_current: current_device == Some(&self.device_id),
        }
    }
}
