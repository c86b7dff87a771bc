use crate::domain::request::PaymentRequest;
use crate::error::Error;

/// Public-facing status delivered to the registered listener.
///
/// This is the flat projection of the machine's nested internal state:
/// being in either authorizing sub-state surfaces as `Authorizing` or
/// `PollingStatus`, and payload-carrying states expose the latest snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SdkStatus {
    NotStarted,
    CreatingRequest,
    ReadyToAuthorize(PaymentRequest),
    Authorizing,
    PollingStatus,
    Approved(PaymentRequest),
    Declined,
    UpdatingRequest,
    RetrievingExisting,
    Failed(Error),
}
