use serde::Deserialize;
use serde_json::json;

use crate::dispatch::{BackendTarget, DispatchError, Dispatcher, OutboundCredential, OutboundRequest};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
}

/// Typed calls against the auth service
#[derive(Debug, Clone)]
pub struct AuthServiceClient {
    dispatcher: Dispatcher,
}

impl AuthServiceClient {
    const TARGET: BackendTarget = BackendTarget::AuthService;

    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub async fn login(
        &self,
        credential: &OutboundCredential,
        email: &str,
        password: &str,
    ) -> Result<LoginResponse, DispatchError> {
        let body = json!({ "email": email, "password": password });
        self.dispatcher
            .dispatch_as(Self::TARGET, credential, OutboundRequest::post(["api", "auth", "login"], Some(body)))
            .await
    }

    /// Revoke the caller's token upstream
    pub async fn logout(&self, credential: &OutboundCredential) -> Result<(), DispatchError> {
        self.dispatcher
            .dispatch(Self::TARGET, credential, OutboundRequest::post(["api", "auth", "logout"], None))
            .await?;
        Ok(())
    }

    pub async fn change_password(
        &self,
        credential: &OutboundCredential,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), DispatchError> {
        let body = json!({ "oldPassword": old_password, "newPassword": new_password });
        self.dispatcher
            .dispatch(
                Self::TARGET,
                credential,
                OutboundRequest::post(["api", "auth", "change-password"], Some(body)),
            )
            .await?;
        Ok(())
    }

    pub async fn use_invitation(&self, credential: &OutboundCredential, invitation_id: &str) -> Result<(), DispatchError> {
        self.dispatcher
            .dispatch(
                Self::TARGET,
                credential,
                OutboundRequest::post(["api", "invitations", invitation_id, "use"], None),
            )
            .await?;
        Ok(())
    }
}
