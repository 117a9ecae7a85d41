use std::sync::Arc;

use super::{AuthError, AuthProvider, Session};
use crate::dispatch::OutboundCredential;
use crate::tenant::{is_tenant_scoped, TenantContext, TenantSource};

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";

/// Outcome of gating one protected navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthDecision {
    Allow(Session),
    /// The provider has not settled the session yet; render nothing.
    Pending,
    RedirectTo(&'static str),
}

/// Decides whether a caller may see a protected page.
///
/// Membership is checked on every tenant-scoped navigation and never cached.
/// Provider errors are returned as-is, without retry.
#[derive(Clone)]
pub struct AuthGate {
    provider: Arc<dyn AuthProvider>,
}

impl AuthGate {
    pub fn new(provider: Arc<dyn AuthProvider>) -> Self {
        Self { provider }
    }

    pub async fn authorize(
        &self,
        path: &str,
        credential: &OutboundCredential,
        tenant: &TenantContext,
    ) -> Result<AuthDecision, AuthError> {
        let session = self.provider.session(credential).await?;

        if session.is_loading {
            return Ok(AuthDecision::Pending);
        }

        if !session.is_authenticated {
            tracing::debug!("Unauthenticated request to {}", path);
            return Ok(AuthDecision::RedirectTo(LOGIN_PATH));
        }

        if is_tenant_scoped(path) {
            // a malformed path segment must not fall back to the header or default tenant
            if tenant.source() != TenantSource::PathSegment {
                tracing::warn!("Malformed tenant segment in {}", path);
                return Ok(AuthDecision::RedirectTo(HOME_PATH));
            }

            let is_member = self
                .provider
                .is_member(credential, &session.user_id, tenant.tenant_id())
                .await?;
            if !is_member {
                tracing::warn!(
                    "User '{}' is not a member of tenant '{}'",
                    session.user_id,
                    tenant.tenant_id()
                );
                return Ok(AuthDecision::RedirectTo(HOME_PATH));
            }
        }

        Ok(AuthDecision::Allow(session))
    }
}
