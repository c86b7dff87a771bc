use crate::domain::action::PaymentAction;
use crate::domain::request::PaymentRequest;
use crate::error::Error;

/// Discriminant of a machine state, used for composite-membership lookups,
/// worker lifecycle decisions, and facade precondition checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateTag {
    NotStarted,
    CreatingRequest,
    ReadyToAuthorize,
    Authorizing,
    DeepLinking,
    Polling,
    UpdatingRequest,
    RetrievingExistingRequest,
    Approved,
    Declined,
    Failed,
}

impl StateTag {
    /// Static composite-membership table: being in a child state implies
    /// being in each listed ancestor.
    pub fn ancestors(self) -> &'static [StateTag] {
        match self {
            StateTag::DeepLinking | StateTag::Polling => &[StateTag::Authorizing],
            _ => &[],
        }
    }
}

/// Internal state of the authorization flow.
///
/// States that have received a server snapshot carry it; the snapshot is
/// replaced wholesale on transition, never mutated. `CreatingRequest` and
/// `UpdatingRequest` carry the pending inputs their workers need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MachineState {
    NotStarted,
    CreatingRequest {
        actions: Vec<PaymentAction>,
        redirect_uri: Option<String>,
    },
    ReadyToAuthorize(PaymentRequest),
    DeepLinking(PaymentRequest),
    Polling(PaymentRequest),
    UpdatingRequest {
        actions: Vec<PaymentAction>,
        request_id: String,
    },
    RetrievingExistingRequest {
        request_id: String,
    },
    Approved(PaymentRequest),
    Declined,
    Failed(Error),
}

impl MachineState {
    pub fn tag(&self) -> StateTag {
        match self {
            MachineState::NotStarted => StateTag::NotStarted,
            MachineState::CreatingRequest { .. } => StateTag::CreatingRequest,
            MachineState::ReadyToAuthorize(_) => StateTag::ReadyToAuthorize,
            MachineState::DeepLinking(_) => StateTag::DeepLinking,
            MachineState::Polling(_) => StateTag::Polling,
            MachineState::UpdatingRequest { .. } => StateTag::UpdatingRequest,
            MachineState::RetrievingExistingRequest { .. } => StateTag::RetrievingExistingRequest,
            MachineState::Approved(_) => StateTag::Approved,
            MachineState::Declined => StateTag::Declined,
            MachineState::Failed(_) => StateTag::Failed,
        }
    }

    /// The state's tag plus its composite ancestors, e.g. `Polling` is also
    /// `Authorizing`.
    pub fn active_tags(&self) -> Vec<StateTag> {
        let tag = self.tag();
        let mut tags = vec![tag];
        tags.extend_from_slice(tag.ancestors());
        tags
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, MachineState::Approved(_) | MachineState::Declined)
    }

    /// The latest server snapshot, for states that have received one.
    pub fn latest_payload(&self) -> Option<&PaymentRequest> {
        match self {
            MachineState::ReadyToAuthorize(request)
            | MachineState::DeepLinking(request)
            | MachineState::Polling(request)
            | MachineState::Approved(request) => Some(request),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::request::RequestStatus;

    fn pending() -> PaymentRequest {
        PaymentRequest {
            id: "req_1".to_string(),
            status: RequestStatus::Pending,
            grants: vec![],
            auth_flow_triggers: None,
        }
    }

    #[test]
    fn test_authorizing_substates_expand_ancestor() {
        let polling = MachineState::Polling(pending());
        assert_eq!(
            polling.active_tags(),
            vec![StateTag::Polling, StateTag::Authorizing]
        );

        let deep_linking = MachineState::DeepLinking(pending());
        assert!(deep_linking.active_tags().contains(&StateTag::Authorizing));

        let ready = MachineState::ReadyToAuthorize(pending());
        assert_eq!(ready.active_tags(), vec![StateTag::ReadyToAuthorize]);
    }

    #[test]
    fn test_terminality() {
        assert!(MachineState::Approved(pending()).is_terminal());
        assert!(MachineState::Declined.is_terminal());
        assert!(!MachineState::Failed(Error::Deserialization).is_terminal());
        assert!(!MachineState::NotStarted.is_terminal());
    }

    #[test]
    fn test_payload_carrying_states() {
        assert!(MachineState::ReadyToAuthorize(pending())
            .latest_payload()
            .is_some());
        assert!(MachineState::NotStarted.latest_payload().is_none());
        assert!(MachineState::CreatingRequest {
            actions: vec![],
            redirect_uri: None
        }
        .latest_payload()
        .is_none());
    }
}
