use crate::domain::request::PaymentRequest;
use crate::domain::status::SdkStatus;
use crate::error::Result;
use async_trait::async_trait;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
}

/// Performs one request/response exchange with the payment API.
///
/// Implementations classify failures into the transport error variants
/// (`Connectivity`, `Api`, `Deserialization`) and never panic on malformed
/// server output. Calls block only the worker task that issues them.
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    async fn execute(
        &self,
        method: Method,
        url: &str,
        auth_token: &str,
        body: Option<serde_json::Value>,
    ) -> Result<PaymentRequest>;
}

/// Hands a redirect URL to the external mechanism that continues
/// authorization outside this process.
///
/// Returns `true` if an external handler accepted the URL, `false` when no
/// handler is available.
#[async_trait]
pub trait RedirectDispatcher: Send + Sync {
    async fn dispatch(&self, url: &Url) -> bool;
}

/// Caller-supplied observer of public status changes.
///
/// Callbacks run on the machine task, in strict transition order; a listener
/// must not block for a prolonged period.
pub trait StateListener: Send + Sync {
    fn on_state_changed(&self, status: &SdkStatus);
}
