use axum::{
    extract::{Request, State},
    http::{header::RETRY_AFTER, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::auth::{AuthDecision, SessionToken};
use crate::dispatch::OutboundCredential;
use crate::error::ApiError;
use crate::tenant::TenantContext;
use crate::AppState;

/// Gate for protected pages: allow, suspend, or redirect. Runs after tenant resolution.
pub async fn auth_gate_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(tenant) = request.extensions().get::<TenantContext>().cloned() else {
        tracing::error!("Auth gate reached without a resolved tenant");
        return ApiError::internal_server_error("Something went wrong").into_response();
    };

    let SessionToken(token) = SessionToken::from_headers(request.headers());
    let credential = OutboundCredential::new(token, &tenant);
    let path = request.uri().path().to_string();

    match state.gate.authorize(&path, &credential, &tenant).await {
        Ok(AuthDecision::Allow(session)) => {
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        Ok(AuthDecision::Pending) => {
            let mut response = ApiError::service_unavailable("Session is loading").into_response();
            response.headers_mut().insert(RETRY_AFTER, HeaderValue::from_static("1"));
            response
        }
        Ok(AuthDecision::RedirectTo(target)) => Redirect::temporary(target).into_response(),
        Err(e) => {
            tracing::error!("Auth gate failed for {}: {}", path, e);
            ApiError::internal_server_error("Something went wrong").into_response()
        }
    }
}
