//! Session snapshot persistence.
//!
//! The store lives in memory; [`SnapshotPersister`] mirrors it to a JSON
//! file so sessions survive a restart. [`StoreHealth`] records whether the
//! last write succeeded and is consulted by admission when running
//! fail-closed.

pub mod health;
pub mod persister;
pub mod snapshot;

pub use health::StoreHealth;
pub use persister::SnapshotPersister;
pub use snapshot::{SNAPSHOT_VERSION, SessionSnapshot};
