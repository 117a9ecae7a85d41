use axum::{extract::State, Extension};
use serde_json::{json, Value};

use crate::auth::Session;
use crate::dispatch::OutboundCredential;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::tenant::TenantContext;
use crate::AppState;

/// GET /t/:tenant_id - tenant overview with aggregate log statistics
pub async fn overview(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    tenant: TenantContext,
    credential: OutboundCredential,
) -> ApiResult<Value> {
    let statistics = state
        .logs
        .statistics(&credential)
        .await
        .map_err(|e| ApiError::upstream("Failed to load tenant overview", e))?;

    Ok(ApiResponse::success(json!({
        "page": "tenant-overview",
        "tenantId": tenant.tenant_id(),
        "user": { "id": session.user_id },
        "statistics": statistics,
    })))
}

/// GET /t/:tenant_id/logs
pub async fn logs(
    State(state): State<AppState>,
    tenant: TenantContext,
    credential: OutboundCredential,
) -> ApiResult<Value> {
    let logs = state
        .logs
        .list_logs(&credential)
        .await
        .map_err(|e| ApiError::upstream("Failed to load logs", e))?;

    Ok(ApiResponse::success(json!({
        "page": "logs",
        "tenantId": tenant.tenant_id(),
        "logs": logs,
    })))
}

/// GET /t/:tenant_id/settings/encryption
pub async fn encryption_settings(
    State(state): State<AppState>,
    tenant: TenantContext,
    credential: OutboundCredential,
) -> ApiResult<Value> {
    let versions = state
        .settings
        .kek_versions(&credential, tenant.tenant_id())
        .await
        .map_err(|e| ApiError::upstream("Failed to load encryption settings", e))?;

    Ok(ApiResponse::success(json!({
        "page": "encryption-settings",
        "tenantId": tenant.tenant_id(),
        "kekVersions": versions,
    })))
}

/// GET /t/:tenant_id/settings/api-keys
pub async fn api_keys(
    State(state): State<AppState>,
    tenant: TenantContext,
    credential: OutboundCredential,
) -> ApiResult<Value> {
    let keys = state
        .settings
        .api_keys(&credential, tenant.tenant_id())
        .await
        .map_err(|e| ApiError::upstream("Failed to load API keys", e))?;

    Ok(ApiResponse::success(json!({
        "page": "api-keys",
        "tenantId": tenant.tenant_id(),
        "apiKeys": keys,
    })))
}
