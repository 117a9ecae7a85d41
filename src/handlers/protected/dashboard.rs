use axum::{Extension, Json};
use serde_json::{json, Value};

use crate::auth::Session;
use crate::tenant::TenantContext;

/// GET /dashboard
pub async fn dashboard(Extension(session): Extension<Session>, tenant: TenantContext) -> Json<Value> {
    Json(json!({
        "page": "dashboard",
        "user": { "id": session.user_id },
        "tenantId": tenant.tenant_id(),
    }))
}
