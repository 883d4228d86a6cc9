//! On-disk snapshot document.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use devicegate_core::error::{AppError, ErrorKind};
use devicegate_core::result::AppResult;
use devicegate_core::types::{DeviceLimit, UserId};
use devicegate_entity::Session;

use crate::store::SessionStore;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Every user's active sessions at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Format version.
    pub version: u32,
    /// When the snapshot was taken.
    pub saved_at: DateTime<Utc>,
    /// Session sets keyed by user, each in insertion order.
    pub users: BTreeMap<UserId, Vec<Session>>,
}

impl SessionSnapshot {
    /// Copies the current content of a store.
    pub fn capture(store: &dyn SessionStore) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            users: store.snapshot(),
        }
    }

    /// Total number of sessions in the snapshot.
    pub fn session_count(&self) -> usize {
        self.users.values().map(Vec::len).sum()
    }

    /// Repairs sets so they satisfy the current limit.
    ///
    /// Sessions filed under another user are dropped. Duplicate devices keep
    /// their first entry. Sets larger than `limit`
    /// keep the most recently active sessions, in their original order.
    /// Returns the number of sessions dropped.
    pub fn trim_to_limit(&mut self, limit: DeviceLimit) -> usize {
        let mut dropped = 0;

        for (user_id, sessions) in self.users.iter_mut() {
            let before = sessions.len();

            let mut seen = HashSet::new();
            sessions.retain(|s| &s.user_id == user_id && seen.insert(s.device_id.clone()));

            let excess = limit.excess(sessions.len());
            if excess > 0 {
                let mut by_activity: Vec<_> = sessions
                    .iter()
                    .map(|s| (s.last_active, s.device_id.clone()))
                    .collect();
                by_activity.sort();
                let stale: HashSet<_> = by_activity
                    .into_iter()
                    .take(excess)
                    .map(|(_, device_id)| device_id)
                    .collect();
                sessions.retain(|s| !stale.contains(&s.device_id));
            }

            let removed = before - sessions.len();
            if removed > 0 {
                warn!(
                    user_id = %user_id,
                    removed,
                    max = limit.max(),
                    "Trimmed restored session set"
                );
            }
            dropped += removed;
        }

        self.users.retain(|_, sessions| !sessions.is_empty());
        dropped
    }

    /// Reads a snapshot file. A missing file yields `None`.
    pub async fn read(path: &Path) -> AppResult<Option<Self>> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(AppError::storage(
                    format!("Failed to read snapshot {}", path.display()),
                    e,
                ));
            }
        };

        let snapshot: Self = serde_json::from_slice(&bytes).map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                format!("Corrupt snapshot {}", path.display()),
                e,
            )
        })?;

        if snapshot.version != SNAPSHOT_VERSION {
            return Err(AppError::new(
                ErrorKind::Serialization,
                format!(
                    "Unsupported snapshot version {} in {}",
                    snapshot.version,
                    path.display()
                ),
            ));
        }

        Ok(Some(snapshot))
    }

    /// Writes the snapshot atomically: a sibling temp file is written and
    /// then renamed over `path`.
    pub async fn write(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let bytes = serde_json::to_vec_pretty(self)?;
        let tmp = temp_path(path);
        tokio::fs::write(&tmp, &bytes).await?;

        if let Err(e) = tokio::fs::rename(&tmp, path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(AppError::storage(
                format!("Failed to replace snapshot {}", path.display()),
                e,
            ));
        }
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
