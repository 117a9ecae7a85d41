use serde::de::Error as _;
use serde_json::{json, Map, Value};

use crate::dispatch::{BackendTarget, DispatchError, Dispatcher, OutboundCredential, OutboundRequest};
use crate::types::{ApiKey, KekVersion, RegistrationStatus};

/// Typed calls against the settings store (`API_URL`)
#[derive(Debug, Clone)]
pub struct SettingsClient {
    dispatcher: Dispatcher,
}

impl SettingsClient {
    const TARGET: BackendTarget = BackendTarget::SettingsStore;

    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub async fn lock_registration(&self, credential: &OutboundCredential, user_id: &str) -> Result<(), DispatchError> {
        let body = json!({ "userId": user_id });
        self.dispatcher
            .dispatch(
                Self::TARGET,
                credential,
                OutboundRequest::post(["api", "system", "lock-registration"], Some(body)),
            )
            .await?;
        Ok(())
    }

    pub async fn registration_status(&self, credential: &OutboundCredential) -> Result<RegistrationStatus, DispatchError> {
        self.dispatcher
            .dispatch_as(Self::TARGET, credential, OutboundRequest::get(["api", "system", "registration-status"]))
            .await
    }

    /// Stored settings; a response without a `settings` key is a shape error
    pub async fn settings(&self, credential: &OutboundCredential) -> Result<Value, DispatchError> {
        let mut payload: Map<String, Value> = self
            .dispatcher
            .dispatch_as(Self::TARGET, credential, OutboundRequest::get(["api", "system", "settings"]))
            .await?;
        payload
            .remove("settings")
            .ok_or_else(|| DispatchError::Decode(serde_json::Error::missing_field("settings")))
    }

    pub async fn update_settings(&self, credential: &OutboundCredential, settings: Value) -> Result<(), DispatchError> {
        let body = json!({ "settings": settings });
        self.dispatcher
            .dispatch(Self::TARGET, credential, OutboundRequest::post(["api", "system", "settings"], Some(body)))
            .await?;
        Ok(())
    }

    pub async fn kek_versions(&self, credential: &OutboundCredential, tenant_id: &str) -> Result<Vec<KekVersion>, DispatchError> {
        self.dispatcher
            .dispatch_as(Self::TARGET, credential, OutboundRequest::get(["api", "tenants", tenant_id, "kek"]))
            .await
    }

    pub async fn api_keys(&self, credential: &OutboundCredential, tenant_id: &str) -> Result<Vec<ApiKey>, DispatchError> {
        self.dispatcher
            .dispatch_as(Self::TARGET, credential, OutboundRequest::get(["api", "tenants", tenant_id, "api-keys"]))
            .await
    }
}
