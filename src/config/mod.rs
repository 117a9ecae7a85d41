use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

/// Sentinel tenant used when neither the path nor the `X-Tenant-ID` header names one.
pub const DEFAULT_TENANT_ID: &str = "default";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub backends: BackendsConfig,
    pub tenant: TenantConfig,
    pub session: SessionConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendsConfig {
    pub auth_service_url: String,
    pub logs_api_url: String,
    pub api_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantConfig {
    pub default_tenant_id: String,
    /// Reject default-sourced tenants on tenant-scoped data routes
    pub strict: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub secure_cookie: bool,
    pub max_age_secs: u64,
    /// When set, bearer tokens are verified locally as HS256 JWTs
    pub jwt_secret: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

impl SecurityConfig {
    /// `*` among the origins opens CORS to every origin (without credentials)
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|origin| origin == "*")
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_overrides(&lookup)
    }

    fn with_overrides<F>(mut self, lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // Backend overrides
        if let Some(v) = lookup("NEXT_PUBLIC_AUTH_SERVICE_URL").or_else(|| lookup("AUTH_SERVICE_URL")) {
            self.backends.auth_service_url = v;
        }
        if let Some(v) = lookup("LOGS_API_URL") {
            self.backends.logs_api_url = v;
        }
        if let Some(v) = lookup("API_URL") {
            self.backends.api_url = v;
        }
        if let Some(v) = lookup("BACKEND_TIMEOUT_SECS") {
            self.backends.timeout_secs = v.parse().unwrap_or(self.backends.timeout_secs);
        }

        // Tenant overrides
        if let Some(v) = lookup("NEXT_PUBLIC_DEFAULT_TENANT_ID") {
            if !v.trim().is_empty() {
                self.tenant.default_tenant_id = v.trim().to_string();
            }
        }
        if let Some(v) = lookup("TENANT_STRICT") {
            self.tenant.strict = v.parse().unwrap_or(self.tenant.strict);
        }

        // Session overrides
        if let Some(v) = lookup("SESSION_SECURE_COOKIE") {
            self.session.secure_cookie = v.parse().unwrap_or(self.session.secure_cookie);
        }
        if let Some(v) = lookup("SESSION_MAX_AGE_SECS") {
            self.session.max_age_secs = v.parse().unwrap_or(self.session.max_age_secs);
        }
        if let Some(v) = lookup("AUTH_JWT_SECRET") {
            self.session.jwt_secret = Some(v).filter(|s| !s.is_empty());
        }

        // API overrides
        if let Some(v) = lookup("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        // Security overrides
        if let Some(v) = lookup("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Some(v) = lookup("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            backends: BackendsConfig {
                auth_service_url: "http://localhost:4000".to_string(),
                logs_api_url: "http://localhost:4100".to_string(),
                api_url: "http://localhost:4200".to_string(),
                timeout_secs: 30,
            },
            tenant: TenantConfig {
                default_tenant_id: DEFAULT_TENANT_ID.to_string(),
                strict: false,
            },
            session: SessionConfig {
                secure_cookie: false,
                max_age_secs: 60 * 60 * 24 * 7, // 1 week
                jwt_secret: None,
            },
            api: ApiConfig {
                max_request_size_bytes: 1024 * 1024, // 1MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            backends: BackendsConfig {
                auth_service_url: "http://auth-service:4000".to_string(),
                logs_api_url: "http://logs-api:4100".to_string(),
                api_url: "http://api:4200".to_string(),
                timeout_secs: 15,
            },
            tenant: TenantConfig {
                default_tenant_id: DEFAULT_TENANT_ID.to_string(),
                strict: false,
            },
            session: SessionConfig {
                secure_cookie: true,
                max_age_secs: 60 * 60 * 24,
                jwt_secret: None,
            },
            api: ApiConfig {
                max_request_size_bytes: 512 * 1024,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            backends: BackendsConfig {
                auth_service_url: "http://auth-service:4000".to_string(),
                logs_api_url: "http://logs-api:4100".to_string(),
                api_url: "http://api:4200".to_string(),
                timeout_secs: 10,
            },
            tenant: TenantConfig {
                default_tenant_id: DEFAULT_TENANT_ID.to_string(),
                strict: false,
            },
            session: SessionConfig {
                secure_cookie: true,
                max_age_secs: 60 * 60 * 8,
                jwt_secret: None,
            },
            api: ApiConfig {
                max_request_size_bytes: 256 * 1024,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_production {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Production)
    };
}
