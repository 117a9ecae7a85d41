// handlers/mod.rs - handler tiers
//
// Public (no session) → Api (backend proxy routes, credentials forwarded as-is)
// → Protected (pages behind the auth gate)
pub mod api; // /api/* proxy routes
pub mod protected; // /dashboard, /t/:tenant_id/*
pub mod public; // /, /health, /login
