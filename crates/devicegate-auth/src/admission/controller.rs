//! Device admission: admit, refresh, reject, or evict-then-admit.

use std::sync::Arc;

use tracing::{debug, info, warn};

use devicegate_core::config::SessionConfig;
use devicegate_core::error::AppError;
use devicegate_core::result::AppResult;
use devicegate_core::types::{DeviceId, DeviceLimit, UserId};
use devicegate_entity::{DeviceView, EvictionReason};

use crate::eviction::EvictionService;
use crate::notice::NoticeBoard;
use crate::persistence::StoreHealth;
use crate::query::project;
use crate::store::SessionStore;

use super::locks::UserLocks;
use super::result::{AdmissionRequest, AdmissionResult};

/// Decides whether a device may hold a session for a user.
///
/// Holds no session state of its own. Every decision is made while holding
/// the user's lock from [`UserLocks`], so two devices racing for the last
/// slot cannot both be admitted.
#[derive(Clone)]
pub struct AdmissionController {
    /// Session sets.
    store: Arc<dyn SessionStore>,
    /// Per-user locks shared with the eviction service.
    locks: Arc<UserLocks>,
    /// Eviction used by forced admissions.
    eviction: Arc<EvictionService>,
    /// Notices cleared when a device comes back.
    notices: Arc<NoticeBoard>,
    /// Snapshot health for fail-closed admission.
    health: Arc<StoreHealth>,
    /// Maximum devices per user.
    limit: DeviceLimit,
    /// Label for devices that register without a name.
    default_device_name: String,
}

impl std::fmt::Debug for AdmissionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdmissionController")
            .field("limit", &self.limit)
            .field("default_device_name", &self.default_device_name)
            .finish()
    }
}

impl AdmissionController {
    /// Creates an admission controller over the eviction service's store,
    /// lock registry and notice board.
    pub fn new(
        eviction: Arc<EvictionService>,
        health: Arc<StoreHealth>,
        config: &SessionConfig,
    ) -> Self {
        Self {
            store: Arc::clone(eviction.store()),
            locks: Arc::clone(eviction.locks()),
            notices: Arc::clone(eviction.notices()),
            eviction,
            health,
            limit: config.max_devices,
            default_device_name: config.default_device_name.clone(),
        }
    }

    /// The configured device limit.
    pub fn limit(&self) -> DeviceLimit {
        self.limit
    }

    /// Runs one admission decision:
    ///
    /// 1. A device that already holds a session is refreshed (`AlreadyAdmitted`).
    /// 2. Below the limit, the device is admitted (`Admitted`).
    /// 3. At the limit without `force`, nothing changes (`LimitExceeded`).
    /// 4. At the limit with `force`, `evict_target` is evicted and the device
    ///    admitted (`EvictedThenAdmitted`). A missing target is invalid input;
    ///    a target that is not in the set yields `LimitExceeded`.
    ///
    /// Lock acquisition is the only await point, so a cancelled call never
    /// leaves a partial mutation behind.
    pub async fn admit(&self, request: AdmissionRequest) -> AppResult<AdmissionResult> {
        let AdmissionRequest {
            user_id,
            device_id,
            device_name,
            force,
            evict_target,
        } = request;
        let device_name = self.resolve_device_name(device_name);

        let _guard = self.locks.acquire(&user_id).await;

        // Step 1: same device again
        if self.store.find(&user_id, &device_id).is_some() {
            let session = self.store.upsert(&user_id, &device_id, &device_name);
            self.notices.clear(&user_id, &device_id);
            debug!(
                user_id = %user_id,
                device_id = %device_id,
                session_id = %session.id,
                "Device already admitted, session refreshed"
            );
            return Ok(AdmissionResult::AlreadyAdmitted {
                session,
                active_set: self.active_set(&user_id, &device_id),
            });
        }

        // Step 2: room left
        let active_count = self.store.count(&user_id);
        if !self.limit.is_reached_by(active_count) {
            self.ensure_store_accepts(&user_id, &device_id)?;
            let session = self.store.upsert(&user_id, &device_id, &device_name);
            self.notices.clear(&user_id, &device_id);
            info!(
                user_id = %user_id,
                device_id = %device_id,
                session_id = %session.id,
                active = active_count + 1,
                max = self.limit.max(),
                "Device admitted"
            );
            return Ok(AdmissionResult::Admitted {
                session,
                active_set: self.active_set(&user_id, &device_id),
            });
        }

        // Step 3: full, caller has not chosen a device to evict
        if !force {
            info!(
                user_id = %user_id,
                device_id = %device_id,
                active = active_count,
                max = self.limit.max(),
                "Device limit reached"
            );
            return Ok(self.limit_exceeded(&user_id, &device_id));
        }

        // Step 4: forced admission
        let target = evict_target
            .ok_or_else(|| AppError::invalid_input("force requires an eviction target"))?;

        self.ensure_store_accepts(&user_id, &device_id)?;

        let Some(evicted) = self.eviction.evict_locked(
            &user_id,
            &target,
            Some(&device_id),
            Some(EvictionReason::ForcedLogin),
        ) else {
            warn!(
                user_id = %user_id,
                device_id = %device_id,
                evict_target = %target,
                "Eviction target is not an active device"
            );
            return Ok(self.limit_exceeded(&user_id, &device_id));
        };

        let session = self.store.upsert(&user_id, &device_id, &device_name);
        self.notices.clear(&user_id, &device_id);
        info!(
            user_id = %user_id,
            device_id = %device_id,
            evicted_device_id = %evicted.device_id,
            session_id = %session.id,
            "Device evicted to admit new device"
        );

        Ok(AdmissionResult::EvictedThenAdmitted {
            session,
            evicted: evicted.to_view(Some(&device_id)),
            active_set: self.active_set(&user_id, &device_id),
        })
    }

    fn resolve_device_name(&self, device_name: Option<String>) -> String {
        match device_name {
            Some(name) if !name.trim().is_empty() => name,
            _ => self.default_device_name.clone(),
        }
    }

    fn ensure_store_accepts(&self, user_id: &UserId, device_id: &DeviceId) -> AppResult<()> {
        if self.health.rejects_new_sessions() {
            warn!(
                user_id = %user_id,
                device_id = %device_id,
                "Refusing new session while session store is unavailable"
            );
            return Err(AppError::store_unavailable(
                "Session store is unavailable; new sessions are temporarily refused",
            ));
        }
        Ok(())
    }

    fn active_set(&self, user_id: &UserId, current: &DeviceId) -> Vec<DeviceView> {
        project(self.store.get(user_id), Some(current))
    }

    fn limit_exceeded(&self, user_id: &UserId, current: &DeviceId) -> AdmissionResult {
        AdmissionResult::LimitExceeded {
            max_devices: self.limit.max(),
            active_set: self.active_set(user_id, current),
        }
    }
}
