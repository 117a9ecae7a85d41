use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::required;
use crate::dispatch::OutboundCredential;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::types::RegistrationStatus;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockRegistrationRequest {
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSettingsRequest {
    pub settings: Option<Value>,
}

/// POST /api/system/lock-registration
pub async fn lock_registration(
    State(state): State<AppState>,
    credential: OutboundCredential,
    payload: Result<Json<LockRegistrationRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(payload) = payload?;
    let user_id = required(payload.user_id).ok_or_else(|| ApiError::bad_request("User ID is required"))?;

    state
        .settings
        .lock_registration(&credential, &user_id)
        .await
        .map_err(|e| ApiError::upstream("Failed to lock registration", e))?;

    Ok(ApiResponse::acknowledged())
}

/// GET /api/system/registration-status
pub async fn registration_status(
    State(state): State<AppState>,
    credential: OutboundCredential,
) -> ApiResult<RegistrationStatus> {
    let status = state
        .settings
        .registration_status(&credential)
        .await
        .map_err(|e| ApiError::upstream("Failed to get registration status", e))?;

    Ok(ApiResponse::success(status))
}

/// GET /api/system/settings
pub async fn get_settings(State(state): State<AppState>, credential: OutboundCredential) -> ApiResult<Value> {
    let settings = state
        .settings
        .settings(&credential)
        .await
        .map_err(|e| ApiError::upstream("Failed to fetch settings", e))?;

    Ok(ApiResponse::success(json!({ "settings": settings })))
}

/// POST /api/system/settings
pub async fn update_settings(
    State(state): State<AppState>,
    credential: OutboundCredential,
    payload: Result<Json<UpdateSettingsRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(payload) = payload?;
    let settings = payload
        .settings
        .ok_or_else(|| ApiError::bad_request("Settings are required"))?;

    state
        .settings
        .update_settings(&credential, settings)
        .await
        .map_err(|e| ApiError::upstream("Failed to update settings", e))?;

    Ok(ApiResponse::acknowledged())
}
