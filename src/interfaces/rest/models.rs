use crate::domain::action::PaymentAction;
use crate::domain::request::PaymentRequest;
use serde::{Deserialize, Serialize};

pub const CHANNEL_IN_APP: &str = "IN_APP";

/// Body of a request-creation call. The idempotency key is generated fresh
/// per call and is only present on creation, never on updates.
#[derive(Debug, Serialize)]
pub struct CreateRequestBody {
    pub idempotency_key: String,
    pub request: RequestData,
}

#[derive(Debug, Serialize)]
pub struct UpdateRequestBody {
    pub request: RequestData,
}

#[derive(Debug, Serialize)]
pub struct RequestData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<&'static str>,
    pub actions: Vec<PaymentAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

/// All successful responses wrap the request snapshot in one envelope.
#[derive(Debug, Deserialize)]
pub struct ResponseEnvelope {
    pub request: PaymentRequest,
}

/// Error body the API reports on non-2xx responses it owns.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub errors: Vec<ApiErrorEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorEntry {
    pub category: String,
    pub code: String,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
}
