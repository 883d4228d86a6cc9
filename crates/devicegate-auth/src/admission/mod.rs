//! Device admission control.
//!
//! [`AdmissionController`] serializes every decision for a user through
//! [`UserLocks`]; the same registry is shared with the eviction service so
//! logouts cannot interleave with an admission.

pub mod controller;
pub mod locks;
pub mod result;

pub use controller::AdmissionController;
pub use locks::{UserGuard, UserLocks};
pub use result::{AdmissionRequest, AdmissionResult};
