pub mod auth_service;
pub mod logs_service;
pub mod settings_service;

pub use auth_service::AuthServiceClient;
pub use logs_service::LogsClient;
pub use settings_service::SettingsClient;
