//! Convenience result type alias for DeviceGate.

use crate::error::AppError;

/// A specialized `Result` type for DeviceGate operations.
pub type AppResult<T> = Result<T, AppError>;
