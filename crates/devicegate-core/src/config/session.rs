//! Device session configuration.

use serde::{Deserialize, Serialize};

use crate::types::DeviceLimit;

/// Device session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Maximum number of concurrently admitted devices per user.
    #[serde(default)]
    pub max_devices: DeviceLimit,
    /// Label used when a client registers without a device name.
    #[serde(default = "default_device_name")]
    pub default_device_name: String,
    /// How long an eviction notice waits for its device, in seconds.
    #[serde(default = "default_notice_ttl")]
    pub notice_ttl_seconds: u64,
    /// Upper bound on pending eviction notices held in memory.
    #[serde(default = "default_notice_capacity")]
    pub notice_capacity: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_devices: DeviceLimit::default(),
            default_device_name: default_device_name(),
            notice_ttl_seconds: default_notice_ttl(),
            notice_capacity: default_notice_capacity(),
        }
    }
}

fn default_device_name() -> String {
    "Unknown Device".to_string()
}

fn default_notice_ttl() -> u64 {
    86_400
}

fn default_notice_capacity() -> u64 {
    100_000
}
