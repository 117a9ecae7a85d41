use axum::extract::{Path, State};
use serde_json::Value;

use crate::dispatch::OutboundCredential;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::AppState;

/// POST /api/invitations/:id/use
pub async fn use_invitation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    credential: OutboundCredential,
) -> ApiResult<Value> {
    match state.auth_service.use_invitation(&credential, &id).await {
        Ok(()) => Ok(ApiResponse::acknowledged()),
        Err(e) if matches!(e.status(), Some(400 | 404 | 410)) => {
            tracing::warn!("Invitation '{}' rejected: {}", id, e);
            Err(ApiError::bad_request("Invalid or expired invitation"))
        }
        Err(e) => Err(ApiError::upstream("Failed to use invitation", e)),
    }
}
