//! Authenticated dispatch of outbound calls to backend services.
//!
//! Every call carries the request's tenant as `X-Tenant-ID` and, when the
//! caller has one, its access token as a bearer credential. Calls are never
//! retried; backend failures are handed back to the caller untouched.

use std::time::Duration;

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use reqwest::{Client, Method};
use serde_json::Value;
use url::Url;

use crate::auth::SessionToken;
use crate::config::BackendsConfig;
use crate::error::ApiError;
use crate::tenant::{TenantContext, TENANT_HEADER};

/// Backend services this gateway talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendTarget {
    AuthService,
    LogsApi,
    SettingsStore,
}

impl BackendTarget {
    pub fn base_url<'a>(&self, backends: &'a BackendsConfig) -> &'a str {
        match self {
            BackendTarget::AuthService => &backends.auth_service_url,
            BackendTarget::LogsApi => &backends.logs_api_url,
            BackendTarget::SettingsStore => &backends.api_url,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BackendTarget::AuthService => "auth-service",
            BackendTarget::LogsApi => "logs-api",
            BackendTarget::SettingsStore => "settings-store",
        }
    }
}

/// Credentials attached to one outbound call
#[derive(Debug, Clone)]
pub struct OutboundCredential {
    pub bearer_token: Option<String>,
    pub tenant_header: String,
}

impl OutboundCredential {
    pub fn new(bearer_token: Option<String>, tenant: &TenantContext) -> Self {
        Self {
            bearer_token,
            tenant_header: tenant.tenant_id().to_string(),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for OutboundCredential
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let tenant = TenantContext::from_request_parts(parts, state).await?;
        let SessionToken(token) = SessionToken::from_request_parts(parts, state).await?;
        Ok(Self::new(token, &tenant))
    }
}

#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    pub segments: Vec<String>,
    pub body: Option<Value>,
}

impl OutboundRequest {
    pub fn get<I, T>(segments: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            method: Method::GET,
            segments: segments.into_iter().map(Into::into).collect(),
            body: None,
        }
    }

    pub fn post<I, T>(segments: I, body: Option<Value>) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            method: Method::POST,
            segments: segments.into_iter().map(Into::into).collect(),
            body,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("invalid backend url '{0}'")]
    InvalidUrl(String),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend responded with {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid backend payload: {0}")]
    Decode(#[from] serde_json::Error),
}

impl DispatchError {
    pub fn status(&self) -> Option<u16> {
        match self {
            DispatchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: Client,
    backends: BackendsConfig,
}

impl Dispatcher {
    pub fn new(backends: BackendsConfig) -> Result<Self, DispatchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(backends.timeout_secs))
            .build()?;
        Ok(Self { client, backends })
    }

    pub async fn dispatch(
        &self,
        target: BackendTarget,
        credential: &OutboundCredential,
        request: OutboundRequest,
    ) -> Result<Value, DispatchError> {
        let url = self.url_for(target, &request.segments)?;
        tracing::debug!(
            "Dispatching {} {} to {} for tenant '{}'",
            request.method,
            url.path(),
            target.name(),
            credential.tenant_header
        );

        let mut builder = self
            .client
            .request(request.method, url)
            .header(TENANT_HEADER, &credential.tenant_header);
        if let Some(token) = &credential.bearer_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(DispatchError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Dispatch and decode into a typed response shape
    pub async fn dispatch_as<T>(
        &self,
        target: BackendTarget,
        credential: &OutboundCredential,
        request: OutboundRequest,
    ) -> Result<T, DispatchError>
    where
        T: serde::de::DeserializeOwned,
    {
        let value = self.dispatch(target, credential, request).await?;
        Ok(serde_json::from_value(value)?)
    }

    fn url_for(&self, target: BackendTarget, segments: &[String]) -> Result<Url, DispatchError> {
        let base = target.base_url(&self.backends);
        let mut url = Url::parse(base).map_err(|_| DispatchError::InvalidUrl(base.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| DispatchError::InvalidUrl(base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}
