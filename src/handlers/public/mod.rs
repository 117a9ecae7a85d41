use axum::{extract::State, response::Json, routing::get, Router};
use serde_json::{json, Value};

use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/login", get(login_page))
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "tenant-gateway",
        "version": version,
        "endpoints": {
            "home": "/ (public)",
            "login": "/login (public)",
            "auth": "/api/auth/* (session cookie or bearer token)",
            "logs": "/api/logs, /api/logs/:log_slug/statistics, /api/statistics (X-Tenant-ID)",
            "system": "/api/system/* (settings store)",
            "pages": "/dashboard, /t/:tenant_id/* (session + tenant membership)",
        }
    }))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
    }))
}

async fn login_page(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "page": "login",
        "authServiceUrl": state.config.backends.auth_service_url,
        "loginEndpoint": "/api/auth/login",
    }))
}
