pub mod auth;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod tenant;
pub mod types;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, HeaderValue, Method},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::{AuthGate, AuthProvider, HttpAuthProvider, SessionCookie};
use crate::config::AppConfig;
use crate::dispatch::{DispatchError, Dispatcher};
use crate::services::{AuthServiceClient, LogsClient, SettingsClient};

/// Shared, read-only state handed to every handler. Holds no per-request or per-tenant data.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub gate: AuthGate,
    pub auth_service: AuthServiceClient,
    pub logs: LogsClient,
    pub settings: SettingsClient,
    pub session_cookie: SessionCookie,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, DispatchError> {
        let dispatcher = Dispatcher::new(config.backends.clone())?;
        let provider = Arc::new(HttpAuthProvider::new(
            dispatcher.clone(),
            config.session.jwt_secret.as_deref(),
        ));
        Ok(Self::with_provider(config, dispatcher, provider))
    }

    pub fn with_provider(config: AppConfig, dispatcher: Dispatcher, provider: Arc<dyn AuthProvider>) -> Self {
        Self {
            gate: AuthGate::new(provider),
            auth_service: AuthServiceClient::new(dispatcher.clone()),
            logs: LogsClient::new(dispatcher.clone()),
            settings: SettingsClient::new(dispatcher),
            session_cookie: SessionCookie::new(&config.session),
            config: Arc::new(config),
        }
    }
}

/// Build the full router: tenant resolution wraps every route, the auth gate wraps protected pages.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(handlers::public::routes())
        .merge(handlers::api::routes())
        .merge(handlers::protected::routes(state.clone()))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::resolve_tenant_middleware,
        ))
        .layer(DefaultBodyLimit::max(state.config.api.max_request_size_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config)),
        )
        .with_state(state)
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    if !config.security.enable_cors {
        return CorsLayer::new();
    }

    let allowed_headers = [
        header::CONTENT_TYPE,
        header::AUTHORIZATION,
        HeaderName::from_static(tenant::TENANT_HEADER),
    ];

    // credentials cannot be combined with a wildcard origin
    if config.security.allows_any_origin() {
        tracing::warn!("CORS open to any origin; credentialed cross-origin requests are disabled");
        return CorsLayer::new()
            .allow_origin(AllowOrigin::any())
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(allowed_headers);
    }

    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(allowed_headers)
        .allow_credentials(true)
}
