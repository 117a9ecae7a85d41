pub mod auth;
pub mod invitations;
pub mod logs;
pub mod system;

use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        // Session and account
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/change-password", post(auth::change_password))
        .route("/api/invitations/:id/use", post(invitations::use_invitation))
        // Logs API proxy
        .route("/api/logs", get(logs::list_logs))
        .route("/api/logs/:log_slug/statistics", get(logs::log_statistics))
        .route("/api/statistics", get(logs::statistics))
        // Settings store proxy
        .route("/api/system/lock-registration", post(system::lock_registration))
        .route("/api/system/registration-status", get(system::registration_status))
        .route("/api/system/settings", get(system::get_settings).post(system::update_settings))
}

/// A required string field: present and not blank
pub(crate) fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
