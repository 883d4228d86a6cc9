//! Response DTOs.

use serde::{Deserialize, Serialize};

use devicegate_entity::{DeviceView, EvictionNotice};

/// GET /api/devices response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevicesResponse {
    /// Devices ordered by first registration.
    pub devices: Vec<DeviceView>,
}

/// POST /api/devices/logout-others response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutOthersResponse {
    /// Number of sessions removed.
    pub removed_count: usize,
}

/// GET /api/devices/notice response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoticeResponse {
    /// The pending notice, if this device was signed out remotely.
    pub notice: Option<EvictionNotice>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
    /// Whether the last snapshot write succeeded.
    pub store_available: bool,
    /// Configured device limit.
    pub max_devices: u32,
}
