pub mod auth_gate;
pub mod resolve_tenant;
pub mod response;

pub use auth_gate::auth_gate_middleware;
pub use resolve_tenant::resolve_tenant_middleware;
pub use response::{ApiResponse, ApiResult};
