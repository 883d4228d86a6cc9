//! Eviction notices for devices signed out by another device.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use devicegate_core::types::DeviceId;

/// Why a device lost its session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvictionReason {
    /// Another device took this device's slot after hitting the limit.
    ForcedLogin,
    /// Another device signed this one out from its device list.
    RemoteLogout,
}

impl EvictionReason {
    /// User-facing explanation.
    pub fn message(&self) -> &'static str {
        match self {
            Self::ForcedLogin => {
                "You were signed out from this device because you logged in from another device that exceeded your device limit."
            }
            Self::RemoteLogout => "You were signed out from this device by another of your devices.",
        }
    }
}

impl std::fmt::Display for EvictionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ForcedLogin => write!(f, "forced_login"),
            Self::RemoteLogout => write!(f, "remote_logout"),
        }
    }
}

/// One-shot message for a device that was evicted by someone else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvictionNotice {
    /// The evicted device.
    pub device_id: DeviceId,
    /// Why it was evicted.
    pub reason: EvictionReason,
    /// The device that caused the eviction, when known.
    pub evicted_by: Option<DeviceId>,
    /// When the eviction happened.
    pub evicted_at: DateTime<Utc>,
    /// Text suitable for showing to the user.
    pub message: String,
}

impl EvictionNotice {
    /// Build a notice stamped with the current time.
    pub fn new(device_id: DeviceId, reason: EvictionReason, evicted_by: Option<DeviceId>) -> Self {
        Self {
            device_id,
            reason,
            evicted_by,
            evicted_at: Utc::now(),
            message: reason.message().to_string(),
        }
    }
}
