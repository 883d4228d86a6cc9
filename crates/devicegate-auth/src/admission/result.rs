//! Admission request and decision types.

use serde::{Deserialize, Serialize};

use devicegate_core::error::AppError;
use devicegate_core::types::{DeviceId, UserId};
use devicegate_entity::{DeviceView, Session};

/// A validated request to admit one device for one user.
#[derive(Debug, Clone)]
pub struct AdmissionRequest {
    /// Verified user.
    pub user_id: UserId,
    /// Device asking to be admitted.
    pub device_id: DeviceId,
    /// Display label; blank means "use the configured default".
    pub device_name: Option<String>,
    /// Evict `evict_target` if the device set is full.
    pub force: bool,
    /// Device to evict when forcing.
    pub evict_target: Option<DeviceId>,
}

impl AdmissionRequest {
    /// Plain (non-forced) admission.
    pub fn new(user_id: UserId, device_id: DeviceId, device_name: Option<String>) -> Self {
        Self {
            user_id,
            device_id,
            device_name,
            force: false,
            evict_target: None,
        }
    }

    /// Forced admission that evicts `target` if the set is full.
    pub fn forcing(mut self, target: DeviceId) -> Self {
        self.force = true;
        self.evict_target = Some(target);
        self
    }

    /// Validate raw caller input.
    ///
    /// Empty identifiers are rejected. An empty `evict_target` is treated as
    /// absent.
    pub fn parse(
        user_id: &str,
        device_id: &str,
        device_name: Option<&str>,
        force: bool,
        evict_target: Option<&str>,
    ) -> Result<Self, AppError> {
        let evict_target = match evict_target.map(str::trim) {
            Some(t) if !t.is_empty() => Some(DeviceId::parse(t)?),
            _ => None,
        };

        Ok(Self {
            user_id: UserId::parse(user_id)?,
            device_id: DeviceId::parse(device_id)?,
            device_name: device_name.map(str::to_string),
            force,
            evict_target,
        })
    }
}

/// Outcome of an admission attempt.
///
/// `LimitExceeded` is a decision, not an error: the caller presents
/// `active_set` and may retry with `force` and an eviction target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AdmissionResult {
    /// A new session was created.
    Admitted {
        /// The new session.
        session: Session,
        /// Active set after admission.
        active_set: Vec<DeviceView>,
    },
    /// The device already had a session; it was refreshed.
    AlreadyAdmitted {
        /// The refreshed session.
        session: Session,
        /// Active set after the refresh.
        active_set: Vec<DeviceView>,
    },
    /// The set is full; nothing changed.
    LimitExceeded {
        /// Configured limit.
        max_devices: u32,
        /// Current, unchanged active set.
        active_set: Vec<DeviceView>,
    },
    /// `evicted` was removed and the device admitted in its place.
    EvictedThenAdmitted {
        /// The new session.
        session: Session,
        /// The device that was evicted.
        evicted: DeviceView,
        /// Active set after admission.
        active_set: Vec<DeviceView>,
    },
}

impl AdmissionResult {
    /// Wire name of the variant.
    pub fn status(&self) -> &'static str {
        match self {
            Self::Admitted { .. } => "admitted",
            Self::AlreadyAdmitted { .. } => "already_admitted",
            Self::LimitExceeded { .. } => "limit_exceeded",
            Self::EvictedThenAdmitted { .. } => "evicted_then_admitted",
        }
    }

    /// The active set carried by every variant.
    pub fn active_set(&self) -> &[DeviceView] {
        match self {
            Self::Admitted { active_set, .. }
            | Self::AlreadyAdmitted { active_set, .. }
            | Self::LimitExceeded { active_set, .. }
            | Self::EvictedThenAdmitted { active_set, .. } => active_set,
        }
    }

    /// The admitted session, if the device holds one now.
    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::Admitted { session, .. }
            | Self::AlreadyAdmitted { session, .. }
            | Self::EvictedThenAdmitted { session, .. } => Some(session),
            Self::LimitExceeded { .. } => None,
        }
    }

    /// Whether the device holds a session after this call.
    pub fn is_admitted(&self) -> bool {
        self.session().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rejects_empty_ids() {
        assert!(AdmissionRequest::parse("", "d", None, false, None).is_err());
        assert!(AdmissionRequest::parse("u", "", None, false, None).is_err());
    }

    #[test]
    fn test_parse_blank_target_is_absent() {
        let req = AdmissionRequest::parse("u", "d", Some("Phone"), true, Some("  ")).unwrap();
        assert!(req.force);
        assert!(req.evict_target.is_none());
    }

    #[test]
    fn test_limit_exceeded_serializes_with_status() {
        let result = AdmissionResult::LimitExceeded {
            max_devices: 3,
            active_set: Vec::new(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "limit_exceeded");
        assert_eq!(json["max_devices"], 3);
        assert_eq!(result.status(), "limit_exceeded");
        assert!(!result.is_admitted());
    }
}
