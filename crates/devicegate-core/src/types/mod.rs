//! Core type definitions used across the DeviceGate workspace.

pub mod device_limit;
pub mod id;

pub use device_limit::DeviceLimit;
pub use id::{DeviceId, UserId};
