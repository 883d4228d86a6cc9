//! Session store trait and implementations.
//!
//! The store is a plain keyed collection: it never checks the device limit
//! and never takes the per-user admission lock itself. Callers that need a
//! read-check-write sequence must hold the user's lock from
//! [`crate::admission::UserLocks`] around it.

pub mod memory;

use std::collections::BTreeMap;

use devicegate_core::types::{DeviceId, UserId};
use devicegate_entity::Session;

pub use memory::MemorySessionStore;

/// Storage for every user's active session set.
///
/// All operations are total. Sets keep insertion order, which is also
/// `created_at` order.
pub trait SessionStore: Send + Sync + std::fmt::Debug {
    /// Returns the user's sessions in insertion order (empty if none).
    fn get(&self, user_id: &UserId) -> Vec<Session>;

    /// Returns the session for one device, if admitted.
    fn find(&self, user_id: &UserId, device_id: &DeviceId) -> Option<Session>;

    /// Refreshes an existing device session or appends a new one.
    fn upsert(&self, user_id: &UserId, device_id: &DeviceId, device_name: &str) -> Session;

    /// Removes one device's session. Returns whether anything was removed.
    fn remove(&self, user_id: &UserId, device_id: &DeviceId) -> bool;

    /// Removes every session except `keep`'s (all of them if `keep` is
    /// `None` or not present) and returns the removed sessions in order.
    fn remove_all_except(&self, user_id: &UserId, keep: Option<&DeviceId>) -> Vec<Session>;

    /// Number of sessions the user holds.
    fn count(&self, user_id: &UserId) -> usize;

    /// Monotonic counter bumped by every mutation.
    fn revision(&self) -> u64;

    /// Copies every non-empty set.
    fn snapshot(&self) -> BTreeMap<UserId, Vec<Session>>;

    /// Replaces the whole content of the store.
    fn restore(&self, users: BTreeMap<UserId, Vec<Session>>);
}
