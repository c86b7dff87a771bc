use crate::domain::action::PaymentAction;
use crate::domain::request::PaymentRequest;
use crate::error::{Error, Result};

/// Events processed by the state machine, in strict submission order.
///
/// `*Result` events are produced by background workers; the rest originate
/// from the public facade. `Teardown` is internal: it cancels the active
/// worker when the listener is unregistered.
#[derive(Debug)]
pub enum Event {
    CreateRequest {
        actions: Vec<PaymentAction>,
        redirect_uri: Option<String>,
    },
    CreateResult(Result<PaymentRequest>),
    UpdateRequest {
        actions: Vec<PaymentAction>,
        request_id: String,
    },
    UpdateResult(Result<PaymentRequest>),
    StartExisting {
        request_id: String,
    },
    StartExistingResult(Result<PaymentRequest>),
    PollResult(Result<PaymentRequest>),
    Authorize(PaymentRequest),
    AuthorizeCurrent,
    DeepLinkOutcome(Result<()>),
    IllegalArguments(Error),
    Teardown,
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::CreateRequest { .. } => "CreateRequest",
            Event::CreateResult(_) => "CreateResult",
            Event::UpdateRequest { .. } => "UpdateRequest",
            Event::UpdateResult(_) => "UpdateResult",
            Event::StartExisting { .. } => "StartExisting",
            Event::StartExistingResult(_) => "StartExistingResult",
            Event::PollResult(_) => "PollResult",
            Event::Authorize(_) => "Authorize",
            Event::AuthorizeCurrent => "AuthorizeCurrent",
            Event::DeepLinkOutcome(_) => "DeepLinkOutcome",
            Event::IllegalArguments(_) => "IllegalArguments",
            Event::Teardown => "Teardown",
        }
    }
}
