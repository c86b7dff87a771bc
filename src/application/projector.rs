use crate::application::state::MachineState;
use crate::domain::status::SdkStatus;

/// Flattens the machine's nested internal state onto the stable public
/// status set, carrying the latest snapshot where applicable.
pub fn project(state: &MachineState) -> SdkStatus {
    match state {
        MachineState::NotStarted => SdkStatus::NotStarted,
        MachineState::CreatingRequest { .. } => SdkStatus::CreatingRequest,
        MachineState::ReadyToAuthorize(request) => SdkStatus::ReadyToAuthorize(request.clone()),
        MachineState::DeepLinking(_) => SdkStatus::Authorizing,
        MachineState::Polling(_) => SdkStatus::PollingStatus,
        MachineState::UpdatingRequest { .. } => SdkStatus::UpdatingRequest,
        MachineState::RetrievingExistingRequest { .. } => SdkStatus::RetrievingExisting,
        MachineState::Approved(request) => SdkStatus::Approved(request.clone()),
        MachineState::Declined => SdkStatus::Declined,
        MachineState::Failed(error) => SdkStatus::Failed(error.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::request::{PaymentRequest, RequestStatus};
    use crate::error::Error;

    fn pending() -> PaymentRequest {
        PaymentRequest {
            id: "req_1".to_string(),
            status: RequestStatus::Pending,
            grants: vec![],
            auth_flow_triggers: None,
        }
    }

    #[test]
    fn test_nested_authorizing_states_flatten() {
        assert_eq!(
            project(&MachineState::DeepLinking(pending())),
            SdkStatus::Authorizing
        );
        assert_eq!(
            project(&MachineState::Polling(pending())),
            SdkStatus::PollingStatus
        );
    }

    #[test]
    fn test_payload_carrying_projections() {
        assert_eq!(
            project(&MachineState::ReadyToAuthorize(pending())),
            SdkStatus::ReadyToAuthorize(pending())
        );
        assert_eq!(
            project(&MachineState::Approved(pending())),
            SdkStatus::Approved(pending())
        );
        assert_eq!(
            project(&MachineState::Failed(Error::Deserialization)),
            SdkStatus::Failed(Error::Deserialization)
        );
    }
}
