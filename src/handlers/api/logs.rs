use axum::extract::{Path, State};
use serde_json::Value;

use crate::dispatch::OutboundCredential;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::tenant::TenantContext;
use crate::AppState;

/// GET /api/logs - log descriptors for the request's tenant
pub async fn list_logs(
    State(state): State<AppState>,
    tenant: TenantContext,
    credential: OutboundCredential,
) -> ApiResult<Value> {
    tenant.require_explicit(state.config.tenant.strict)?;

    let logs = state
        .logs
        .list_logs(&credential)
        .await
        .map_err(|e| ApiError::upstream("Failed to fetch logs", e))?;

    Ok(ApiResponse::success(logs))
}

/// GET /api/logs/:log_slug/statistics
pub async fn log_statistics(
    State(state): State<AppState>,
    Path(log_slug): Path<String>,
    tenant: TenantContext,
    credential: OutboundCredential,
) -> ApiResult<Value> {
    tenant.require_explicit(state.config.tenant.strict)?;

    let statistics = state
        .logs
        .log_statistics(&credential, &log_slug)
        .await
        .map_err(|e| ApiError::upstream("Failed to fetch log statistics", e))?;

    Ok(ApiResponse::success(statistics))
}

/// GET /api/statistics - aggregate statistics across the tenant's logs
pub async fn statistics(
    State(state): State<AppState>,
    tenant: TenantContext,
    credential: OutboundCredential,
) -> ApiResult<Value> {
    tenant.require_explicit(state.config.tenant.strict)?;

    let statistics = state
        .logs
        .statistics(&credential)
        .await
        .map_err(|e| ApiError::upstream("Failed to fetch statistics", e))?;

    Ok(ApiResponse::success(statistics))
}
