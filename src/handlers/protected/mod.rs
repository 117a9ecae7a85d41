// handlers/protected/mod.rs - Pages behind the auth gate
//
// Every route here runs after tenant resolution and the auth gate. Handlers
// can rely on an authenticated `Session` in the request extensions and, under
// /t/:tenant_id, on the caller being a member of that tenant.
pub mod dashboard;
pub mod tenant;

use axum::{middleware, routing::get, Router};

use crate::middleware::auth_gate_middleware;
use crate::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard::dashboard))
        .route("/t/:tenant_id", get(tenant::overview))
        .route("/t/:tenant_id/logs", get(tenant::logs))
        .route("/t/:tenant_id/settings/encryption", get(tenant::encryption_settings))
        .route("/t/:tenant_id/settings/api-keys", get(tenant::api_keys))
        .route_layer(middleware::from_fn_with_state(state, auth_gate_middleware))
}
