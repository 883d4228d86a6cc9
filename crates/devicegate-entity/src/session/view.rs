//! Listing projection of a session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use devicegate_core::types::DeviceId;

/// One row of a user's device list, as shown to one of that user's devices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceView {
    /// Device identifier.
    pub device_id: DeviceId,
    /// Display label.
    pub device_name: String,
    /// Last admission or touch.
    pub last_active: DateTime<Utc>,
    /// Whether this row is the requesting device.
    pub is_current: bool,
}
