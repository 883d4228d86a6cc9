//! # devicegate-auth
//!
//! Device session admission for DeviceGate.
//!
//! ## Modules
//!
//! - `store`: per-user active session sets (no policy)
//! - `admission`: the admission controller and its per-user lock registry
//! - `eviction`: single-device and logout-others eviction
//! - `query`: read-only device listings
//! - `notice`: one-shot notices for devices evicted by another device
//! - `persistence`: JSON snapshots and store availability
//! - `jwt`: verification of identity provider tokens

pub mod admission;
pub mod eviction;
pub mod jwt;
pub mod notice;
pub mod persistence;
pub mod query;
pub mod store;

pub use admission::{AdmissionController, AdmissionRequest, AdmissionResult, UserLocks};
pub use eviction::{EvictionOutcome, EvictionService};
pub use jwt::{IdentityClaims, IdentityVerifier};
pub use notice::NoticeBoard;
pub use persistence::{SnapshotPersister, StoreHealth};
pub use query::SessionQueryService;
pub use store::{MemorySessionStore, SessionStore};
