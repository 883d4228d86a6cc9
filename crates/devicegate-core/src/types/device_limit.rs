//! Per-user device limit.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Maximum number of devices a single user may hold an active session on.
///
/// Always at least one. Set at process start from `session.max_devices`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct DeviceLimit(u32);

impl DeviceLimit {
    /// Default limit when none is configured.
    pub const DEFAULT: u32 = 3;

    /// Create a limit, rejecting zero.
    pub fn new(max: u32) -> Result<Self, AppError> {
        if max == 0 {
            return Err(AppError::configuration(
                "session.max_devices must be at least 1",
            ));
        }
        Ok(Self(max))
    }

    /// Return the numeric limit.
    pub fn max(&self) -> u32 {
        self.0
    }

    /// Check whether a set of `active_count` sessions leaves no room for another.
    pub fn is_reached_by(&self, active_count: usize) -> bool {
        active_count >= self.0 as usize
    }

    /// Number of sessions above the limit (0 when within it).
    pub fn excess(&self, active_count: usize) -> usize {
        active_count.saturating_sub(self.0 as usize)
    }
}

impl Default for DeviceLimit {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<u32> for DeviceLimit {
    type Error = AppError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DeviceLimit> for u32 {
    fn from(limit: DeviceLimit) -> u32 {
        limit.0
    }
}
