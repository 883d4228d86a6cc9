//! # devicegate-entity
//!
//! Domain entity models for DeviceGate: the per-device [`Session`] record,
//! the [`DeviceView`] listing projection, and the [`EvictionNotice`] handed
//! to a device that was signed out by another one.

pub mod session;

pub use session::{DeviceView, EvictionNotice, EvictionReason, Session};
