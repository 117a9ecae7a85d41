use axum::{
    extract::{rejection::JsonRejection, State},
    http::header::SET_COOKIE,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use super::required;
use crate::dispatch::OutboundCredential;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /api/auth/login - exchange credentials for a session cookie
pub async fn login(
    State(state): State<AppState>,
    credential: OutboundCredential,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) = payload?;
    let (Some(email), Some(password)) = (required(payload.email), required(payload.password)) else {
        return Err(ApiError::bad_request("Email and password are required"));
    };

    let login = match state.auth_service.login(&credential, &email, &password).await {
        Ok(login) => login,
        Err(e) if e.status() == Some(401) => return Err(ApiError::unauthorized("Invalid credentials")),
        Err(e) => return Err(ApiError::upstream("Failed to login", e)),
    };

    let cookie = state
        .session_cookie
        .issue(&login.access_token)
        .map_err(|e| ApiError::upstream("Failed to login", e))?;

    Ok(([(SET_COOKIE, cookie)], ApiResponse::acknowledged()).into_response())
}

/// POST /api/auth/logout - always clears the auth cookie
pub async fn logout(State(state): State<AppState>, credential: OutboundCredential) -> Result<Response, ApiError> {
    if credential.bearer_token.is_some() {
        // revocation is best effort; the cookie is cleared either way
        if let Err(e) = state.auth_service.logout(&credential).await {
            tracing::warn!("Token revocation failed during logout: {}", e);
        }
    }

    let cookie = state
        .session_cookie
        .clear()
        .map_err(|e| ApiError::upstream("Failed to logout", e))?;

    Ok(([(SET_COOKIE, cookie)], ApiResponse::acknowledged()).into_response())
}

/// POST /api/auth/change-password
pub async fn change_password(
    State(state): State<AppState>,
    credential: OutboundCredential,
    payload: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(payload) = payload?;
    let (Some(old_password), Some(new_password)) = (required(payload.old_password), required(payload.new_password))
    else {
        return Err(ApiError::bad_request("Missing required fields"));
    };

    state
        .auth_service
        .change_password(&credential, &old_password, &new_password)
        .await
        .map_err(|e| ApiError::upstream("Failed to change password", e))?;

    Ok(ApiResponse::acknowledged())
}
