//! Tenant resolution.
//!
//! Every request gets exactly one [`TenantContext`], resolved from (in order)
//! the `/t/{tenant_id}` path segment, the `X-Tenant-ID` header, or the
//! configured default tenant. The context lives in the request extensions and
//! is dropped with the request.

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use serde::Serialize;

use crate::error::ApiError;

/// `X-Tenant-ID`, in the lowercase form `http` stores header names in
pub const TENANT_HEADER: &str = "x-tenant-id";

/// Path prefix of tenant-scoped pages
pub const TENANT_PATH_PREFIX: &str = "/t/";

const MAX_TENANT_ID_LEN: usize = 128;

/// Where the resolved tenant id came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TenantSource {
    PathSegment,
    Header,
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantContext {
    tenant_id: String,
    source: TenantSource,
}

impl TenantContext {
    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub fn source(&self) -> TenantSource {
        self.source
    }

    pub fn is_default(&self) -> bool {
        self.source == TenantSource::Default
    }

    /// Tenant id for routes that must not run against the fallback tenant in strict mode
    pub fn require_explicit(&self, strict: bool) -> Result<&str, ApiError> {
        if strict && self.is_default() {
            tracing::warn!("Rejecting request without explicit tenant (strict mode)");
            return Err(ApiError::bad_request("Tenant ID is required"));
        }
        Ok(&self.tenant_id)
    }
}

/// Resolve the tenant for a request. Never fails.
pub fn resolve(path: &str, headers: &HeaderMap, default_tenant_id: &str) -> TenantContext {
    if let Some(segment) = tenant_segment(path) {
        match validate_tenant_id(segment) {
            Some(id) => return TenantContext { tenant_id: id, source: TenantSource::PathSegment },
            None => tracing::warn!("Ignoring malformed tenant path segment"),
        }
    }

    if let Some(value) = headers.get(TENANT_HEADER) {
        match value.to_str().ok().and_then(validate_tenant_id) {
            Some(id) => return TenantContext { tenant_id: id, source: TenantSource::Header },
            None => tracing::warn!("Ignoring malformed X-Tenant-ID header"),
        }
    }

    tracing::debug!("No tenant on request, falling back to '{}'", default_tenant_id);
    TenantContext {
        tenant_id: default_tenant_id.to_string(),
        source: TenantSource::Default,
    }
}

/// Raw tenant segment of a tenant-scoped path (`/t/{tenant_id}[/...]`)
pub fn tenant_segment(path: &str) -> Option<&str> {
    let rest = path.strip_prefix(TENANT_PATH_PREFIX)?;
    rest.split('/').next().filter(|s| !s.is_empty())
}

pub fn is_tenant_scoped(path: &str) -> bool {
    tenant_segment(path).is_some()
}

fn validate_tenant_id(raw: &str) -> Option<String> {
    let id = raw.trim();
    let valid = !id.is_empty()
        && id.len() <= MAX_TENANT_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    valid.then(|| id.to_string())
}

#[async_trait]
impl<S> FromRequestParts<S> for TenantContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<TenantContext>().cloned().ok_or_else(|| {
            tracing::error!("Tenant context missing; resolver middleware not installed");
            ApiError::internal_server_error("Tenant context not resolved")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_tenant(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(TENANT_HEADER, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn falls_back_to_default_without_sources() {
        let ctx = resolve("/api/logs", &HeaderMap::new(), "default");
        assert_eq!(ctx.tenant_id(), "default");
        assert_eq!(ctx.source(), TenantSource::Default);
    }

    #[test]
    fn header_is_used_off_tenant_paths() {
        let ctx = resolve("/api/logs", &headers_with_tenant("acme"), "default");
        assert_eq!(ctx.tenant_id(), "acme");
        assert_eq!(ctx.source(), TenantSource::Header);
    }

    #[test]
    fn path_segment_wins_over_header() {
        let ctx = resolve("/t/globex/logs", &headers_with_tenant("acme"), "default");
        assert_eq!(ctx.tenant_id(), "globex");
        assert_eq!(ctx.source(), TenantSource::PathSegment);
    }

    #[test]
    fn malformed_header_falls_through() {
        let ctx = resolve("/api/logs", &headers_with_tenant("acme/../root"), "default");
        assert_eq!(ctx.tenant_id(), "default");

        let ctx = resolve("/api/logs", &headers_with_tenant("   "), "default");
        assert!(ctx.is_default());
    }

    #[test]
    fn header_value_is_trimmed() {
        let ctx = resolve("/api/logs", &headers_with_tenant(" acme "), "default");
        assert_eq!(ctx.tenant_id(), "acme");
    }

    #[test]
    fn tenant_segment_parsing() {
        assert_eq!(tenant_segment("/t/acme"), Some("acme"));
        assert_eq!(tenant_segment("/t/acme/settings/encryption"), Some("acme"));
        assert_eq!(tenant_segment("/t/"), None);
        assert_eq!(tenant_segment("/tenants/acme"), None);
        assert!(!is_tenant_scoped("/dashboard"));
    }

    #[test]
    fn strict_mode_rejects_default_tenant() {
        let ctx = resolve("/api/logs", &HeaderMap::new(), "default");
        assert!(ctx.require_explicit(true).is_err());
        assert_eq!(ctx.require_explicit(false).unwrap(), "default");

        let ctx = resolve("/api/logs", &headers_with_tenant("acme"), "default");
        assert_eq!(ctx.require_explicit(true).unwrap(), "acme");
    }
}
