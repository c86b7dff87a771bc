use crate::domain::action::PaymentAction;
use crate::interfaces::rest::models::{
    CreateRequestBody, RequestData, UpdateRequestBody, CHANNEL_IN_APP,
};
use uuid::Uuid;

/// Builds the wire body for a request-creation call.
///
/// Generates a fresh idempotency key per call and fills each action's scope
/// with the client identifier when the caller left it unset.
pub fn build_create_body(
    client_id: &str,
    actions: &[PaymentAction],
    redirect_uri: Option<&str>,
) -> CreateRequestBody {
    CreateRequestBody {
        idempotency_key: Uuid::new_v4().to_string(),
        request: RequestData {
            channel: Some(CHANNEL_IN_APP),
            actions: scoped(actions, client_id),
            redirect_url: redirect_uri.map(str::to_string),
        },
    }
}

/// Builds the wire body for a request update. Updates omit the idempotency
/// key and the channel.
pub fn build_update_body(client_id: &str, actions: &[PaymentAction]) -> UpdateRequestBody {
    UpdateRequestBody {
        request: RequestData {
            channel: None,
            actions: scoped(actions, client_id),
            redirect_url: None,
        },
    }
}

pub fn requests_url(base_url: &str) -> String {
    format!("{}/requests", base_url.trim_end_matches('/'))
}

pub fn request_url(base_url: &str, request_id: &str) -> String {
    format!("{}/requests/{}", base_url.trim_end_matches('/'), request_id)
}

fn scoped(actions: &[PaymentAction], client_id: &str) -> Vec<PaymentAction> {
    actions
        .iter()
        .map(|action| action.with_scope_fallback(client_id))
        .collect()
}
