use serde_json::Value;

use crate::dispatch::{BackendTarget, DispatchError, Dispatcher, OutboundCredential, OutboundRequest};

/// Calls against the logs API. Payloads are returned verbatim.
#[derive(Debug, Clone)]
pub struct LogsClient {
    dispatcher: Dispatcher,
}

impl LogsClient {
    const TARGET: BackendTarget = BackendTarget::LogsApi;

    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub async fn list_logs(&self, credential: &OutboundCredential) -> Result<Value, DispatchError> {
        self.dispatcher
            .dispatch(Self::TARGET, credential, OutboundRequest::get(["logs"]))
            .await
    }

    pub async fn log_statistics(&self, credential: &OutboundCredential, log_slug: &str) -> Result<Value, DispatchError> {
        self.dispatcher
            .dispatch(Self::TARGET, credential, OutboundRequest::get(["logs", log_slug, "statistics"]))
            .await
    }

    pub async fn statistics(&self, credential: &OutboundCredential) -> Result<Value, DispatchError> {
        self.dispatcher
            .dispatch(Self::TARGET, credential, OutboundRequest::get(["statistics"]))
            .await
    }
}
