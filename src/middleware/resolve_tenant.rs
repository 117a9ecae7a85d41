use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::tenant::{self, TenantContext};
use crate::AppState;

/// Resolve the request's tenant once and store it in the request extensions
pub async fn resolve_tenant_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if request.extensions().get::<TenantContext>().is_none() {
        let context = tenant::resolve(
            request.uri().path(),
            request.headers(),
            &state.config.tenant.default_tenant_id,
        );
        tracing::debug!("Resolved tenant '{}' from {:?}", context.tenant_id(), context.source());
        request.extensions_mut().insert(context);
    }

    next.run(request).await
}
