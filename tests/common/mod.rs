#![allow(dead_code)]

use anyhow::{Context, Result};
use serde_json::json;
use tenant_gateway::{app, config::AppConfig, AppState};
use wiremock::matchers::{header, method, path};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

/// Mock backends standing in for the auth service, logs API and settings store
pub struct Backends {
    pub auth: MockServer,
    pub logs: MockServer,
    pub api: MockServer,
}

pub struct TestApp {
    pub base_url: String,
    pub client: reqwest::Client,
    pub backends: Backends,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

pub async fn spawn_app() -> Result<TestApp> {
    spawn_app_with(|_| {}).await
}

/// Serve the real router on an ephemeral port, pointed at fresh mock backends
pub async fn spawn_app_with(configure: impl FnOnce(&mut AppConfig)) -> Result<TestApp> {
    let backends = Backends {
        auth: MockServer::start().await,
        logs: MockServer::start().await,
        api: MockServer::start().await,
    };

    let mut config = AppConfig::development();
    config.backends.auth_service_url = backends.auth.uri();
    config.backends.logs_api_url = backends.logs.uri();
    config.backends.api_url = backends.api.uri();
    config.backends.timeout_secs = 5;
    configure(&mut config);

    let state = AppState::new(config).context("failed to build app state")?;
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("failed to bind test listener")?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        axum::serve(listener, app(state)).await.expect("test server");
    });

    // Redirects are assertions in these tests, never followed
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()?;

    Ok(TestApp {
        base_url: format!("http://{}", addr),
        client,
        backends,
    })
}

/// Matches requests that do not carry the given header
pub struct NoHeader(pub &'static str);

impl Match for NoHeader {
    fn matches(&self, request: &Request) -> bool {
        !request.headers.contains_key(self.0)
    }
}

/// Auth service accepts `token` as user `user_id`
pub async fn mount_session(auth: &MockServer, token: &str, user_id: &str) {
    Mock::given(method("GET"))
        .and(path("/api/auth/session"))
        .and(header("authorization", format!("Bearer {}", token).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "userId": user_id,
            "isAuthenticated": true,
        })))
        .mount(auth)
        .await;
}

pub async fn mount_membership(auth: &MockServer, tenant_id: &str, user_id: &str, is_member: bool) {
    Mock::given(method("GET"))
        .and(path(format!("/api/tenants/{}/members/{}", tenant_id, user_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "isMember": is_member })))
        .mount(auth)
        .await;
}
