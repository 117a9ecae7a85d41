pub mod gate;
pub mod provider;
pub mod session_cookie;

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use serde::{Deserialize, Deserializer, Serialize};

use crate::dispatch::{DispatchError, OutboundCredential};
use crate::error::ApiError;

pub use gate::{AuthDecision, AuthGate};
pub use provider::HttpAuthProvider;
pub use session_cookie::{SessionCookie, AUTH_COOKIE_NAME};

/// Session state as reported by the auth provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Empty for anonymous sessions; the auth service may omit it or send null
    #[serde(default, deserialize_with = "null_as_empty")]
    pub user_id: String,
    pub is_authenticated: bool,
    #[serde(default)]
    pub is_loading: bool,
}

impl Session {
    pub fn anonymous() -> Self {
        Self {
            user_id: String::new(),
            is_authenticated: false,
            is_loading: false,
        }
    }

    pub fn authenticated(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            is_authenticated: true,
            is_loading: false,
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("session lookup failed: {0}")]
    Session(#[source] DispatchError),
    #[error("membership check failed: {0}")]
    Membership(#[source] DispatchError),
}

/// External source of sessions and tenant membership
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn session(&self, credential: &OutboundCredential) -> Result<Session, AuthError>;

    async fn is_member(&self, credential: &OutboundCredential, user_id: &str, tenant_id: &str) -> Result<bool, AuthError>;
}

/// Caller's access token, from the bearer header or the auth cookie
#[derive(Debug, Clone, Default)]
pub struct SessionToken(pub Option<String>);

impl SessionToken {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self(bearer_token(headers).or_else(|| cookie_token(headers)))
    }

    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

fn cookie_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == AUTH_COOKIE_NAME)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}
