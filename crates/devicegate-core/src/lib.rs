//! # devicegate-core
//!
//! Core crate for DeviceGate. Contains configuration schemas, typed
//! identifiers, the device limit type, and the unified error system.
//!
//! This crate has **no** internal dependencies on other DeviceGate crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
