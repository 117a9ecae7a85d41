use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use super::{AuthError, AuthProvider, Session};
use crate::dispatch::{BackendTarget, DispatchError, Dispatcher, OutboundCredential, OutboundRequest};

/// Claims carried by access tokens minted by the auth service
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    #[serde(default)]
    pub iat: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MembershipPayload {
    is_member: bool,
}

/// Auth provider backed by the external auth service
pub struct HttpAuthProvider {
    dispatcher: Dispatcher,
    decoding_key: Option<DecodingKey>,
}

impl HttpAuthProvider {
    pub fn new(dispatcher: Dispatcher, jwt_secret: Option<&str>) -> Self {
        Self {
            dispatcher,
            decoding_key: jwt_secret.map(|s| DecodingKey::from_secret(s.as_bytes())),
        }
    }

    fn verify_locally(key: &DecodingKey, token: &str) -> Session {
        let validation = Validation::new(Algorithm::HS256);
        match decode::<Claims>(token, key, &validation) {
            Ok(data) if !data.claims.sub.is_empty() => Session::authenticated(data.claims.sub),
            Ok(_) => Session::anonymous(),
            Err(e) => {
                tracing::debug!("Rejected access token: {}", e);
                Session::anonymous()
            }
        }
    }
}

#[async_trait]
impl AuthProvider for HttpAuthProvider {
    async fn session(&self, credential: &OutboundCredential) -> Result<Session, AuthError> {
        let Some(token) = credential.bearer_token.as_deref() else {
            return Ok(Session::anonymous());
        };

        if let Some(key) = &self.decoding_key {
            return Ok(Self::verify_locally(key, token));
        }

        let request = OutboundRequest::get(["api", "auth", "session"]);
        match self
            .dispatcher
            .dispatch_as::<Session>(BackendTarget::AuthService, credential, request)
            .await
        {
            Ok(session) if session.is_authenticated && session.user_id.is_empty() => {
                tracing::warn!("Auth service returned an authenticated session without a user id");
                Ok(Session::anonymous())
            }
            Ok(session) => Ok(session),
            Err(DispatchError::Status { status: 401 | 403, .. }) => Ok(Session::anonymous()),
            Err(e) => Err(AuthError::Session(e)),
        }
    }

    async fn is_member(&self, credential: &OutboundCredential, user_id: &str, tenant_id: &str) -> Result<bool, AuthError> {
        let request = OutboundRequest::get(["api", "tenants", tenant_id, "members", user_id]);
        match self
            .dispatcher
            .dispatch_as::<MembershipPayload>(BackendTarget::AuthService, credential, request)
            .await
        {
            Ok(payload) => Ok(payload.is_member),
            Err(DispatchError::Status { status: 404, .. }) => Ok(false),
            Err(e) => Err(AuthError::Membership(e)),
        }
    }
}
