//! Device session handlers: admit, list, logout, logout-others, notice.
//!
//! Every handler checks that the verified token subject owns the `user_id`
//! it acts on before touching the store.

use axum::Json;
use axum::extract::State;

use devicegate_auth::{AdmissionRequest, AdmissionResult, EvictionOutcome};
use devicegate_core::types::{DeviceId, UserId};

use crate::dto::request::{
    AdmitRequest, ListDevicesQuery, LogoutOthersRequest, LogoutRequest, NoticeQuery,
};
use crate::dto::response::{DevicesResponse, LogoutOthersResponse, NoticeResponse};
use crate::error::ApiResult;
use crate::extractors::{ValidatedJson, ValidatedQuery, VerifiedUser};
use crate::state::AppState;

/// Treats a missing or blank optional device id as absent.
fn optional_device(raw: Option<&str>) -> ApiResult<Option<DeviceId>> {
    match raw.map(str::trim) {
        Some(id) if !id.is_empty() => Ok(Some(DeviceId::parse(id)?)),
        _ => Ok(None),
    }
}

/// POST /api/devices/admit
pub async fn admit(
    State(state): State<AppState>,
    user: VerifiedUser,
    ValidatedJson(req): ValidatedJson<AdmitRequest>,
) -> ApiResult<Json<AdmissionResult>> {
    let request = AdmissionRequest::parse(
        &req.user_id,
        &req.device_id,
        req.device_name.as_deref(),
        req.force,
        req.evict_target.as_deref(),
    )?;
    user.ensure_owns(&request.user_id)?;

    let result = state.admission.admit(request).await?;
    Ok(Json(result))
}

/// GET /api/devices
pub async fn list_devices(
    State(state): State<AppState>,
    user: VerifiedUser,
    ValidatedQuery(query): ValidatedQuery<ListDevicesQuery>,
) -> ApiResult<Json<DevicesResponse>> {
    let user_id = UserId::parse(query.user_id)?;
    user.ensure_owns(&user_id)?;
    let self_device_id = optional_device(query.self_device_id.as_deref())?;

    let devices = state
        .query
        .list_devices(&user_id, self_device_id.as_ref());
    Ok(Json(DevicesResponse { devices }))
}

/// POST /api/devices/logout
pub async fn logout(
    State(state): State<AppState>,
    user: VerifiedUser,
    ValidatedJson(req): ValidatedJson<LogoutRequest>,
) -> ApiResult<Json<EvictionOutcome>> {
    let user_id = UserId::parse(req.user_id)?;
    user.ensure_owns(&user_id)?;
    let device_id = DeviceId::parse(req.device_id)?;
    let self_device_id = optional_device(req.self_device_id.as_deref())?;

    let outcome = state
        .eviction
        .evict_device(&user_id, &device_id, self_device_id.as_ref())
        .await;
    Ok(Json(outcome))
}

/// POST /api/devices/logout-others
pub async fn logout_others(
    State(state): State<AppState>,
    user: VerifiedUser,
    ValidatedJson(req): ValidatedJson<LogoutOthersRequest>,
) -> ApiResult<Json<LogoutOthersResponse>> {
    let user_id = UserId::parse(req.user_id)?;
    user.ensure_owns(&user_id)?;
    let self_device_id = DeviceId::parse(req.self_device_id)?;

    let removed_count = state.eviction.evict_others(&user_id, &self_device_id).await;
    Ok(Json(LogoutOthersResponse { removed_count }))
}

/// GET /api/devices/notice
pub async fn take_notice(
    State(state): State<AppState>,
    user: VerifiedUser,
    ValidatedQuery(query): ValidatedQuery<NoticeQuery>,
) -> ApiResult<Json<NoticeResponse>> {
    let user_id = UserId::parse(query.user_id)?;
    user.ensure_owns(&user_id)?;
    let device_id = DeviceId::parse(query.device_id)?;

    let notice = state.eviction.take_notice(&user_id, &device_id);
    Ok(Json(NoticeResponse { notice }))
}
