//! Request DTOs with validation.
//!
//! Field checks here only catch obviously malformed input. Identifier
//! parsing (`UserId::parse`, `DeviceId::parse`) still runs afterwards and
//! rejects whitespace-only values.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// POST /api/devices/admit body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AdmitRequest {
    /// User the device belongs to; must match the token subject.
    #[validate(length(min = 1, max = 256, message = "user_id is required"))]
    pub user_id: String,
    /// Device asking to be admitted.
    #[validate(length(min = 1, max = 256, message = "device_id is required"))]
    pub device_id: String,
    /// Display label; blank falls back to the configured default.
    #[serde(default)]
    #[validate(length(max = 200, message = "device_name is too long"))]
    pub device_name: Option<String>,
    /// Evict `evict_target` when the device set is full.
    #[serde(default)]
    pub force: bool,
    /// Device to evict when forcing.
    #[serde(default)]
    #[validate(length(max = 256, message = "evict_target is too long"))]
    pub evict_target: Option<String>,
}

/// GET /api/devices query.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ListDevicesQuery {
    /// User whose devices are listed.
    #[validate(length(min = 1, max = 256, message = "user_id is required"))]
    pub user_id: String,
    /// Caller's own device, flagged `is_current` in the listing.
    #[serde(default)]
    pub self_device_id: Option<String>,
}

/// POST /api/devices/logout body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LogoutRequest {
    /// Owner of the device.
    #[validate(length(min = 1, max = 256, message = "user_id is required"))]
    pub user_id: String,
    /// Device to sign out.
    #[validate(length(min = 1, max = 256, message = "device_id is required"))]
    pub device_id: String,
    /// Caller's own device, if known.
    #[serde(default)]
    pub self_device_id: Option<String>,
}

/// POST /api/devices/logout-others body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LogoutOthersRequest {
    /// Owner of the devices.
    #[validate(length(min = 1, max = 256, message = "user_id is required"))]
    pub user_id: String,
    /// Device that stays signed in.
    #[validate(length(min = 1, max = 256, message = "self_device_id is required"))]
    pub self_device_id: String,
}

/// GET /api/devices/notice query.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NoticeQuery {
    /// Owner of the device.
    #[validate(length(min = 1, max = 256, message = "user_id is required"))]
    pub user_id: String,
    /// Device asking whether it was signed out.
    #[validate(length(min = 1, max = 256, message = "device_id is required"))]
    pub device_id: String,
}
