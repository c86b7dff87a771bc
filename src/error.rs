use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the SDK.
///
/// The first three variants are synchronous caller-facing failures and never
/// enter the state machine. The transport variants (`Connectivity`, `Api`,
/// `Deserialization`) are produced on worker tasks and are routed into the
/// machine's `Failed` state rather than thrown across the facade boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Caller supplied invalid input (empty action list, missing redirect URL).
    #[error("invalid argument: {0}")]
    Argument(String),
    /// Caller violated the required call order, e.g. authorizing before a
    /// request exists or before registering a listener.
    #[error("integration error: {0}")]
    Integration(String),
    /// Operation attempted after the machine reached a terminal state.
    #[error("illegal state: {0}")]
    IllegalState(String),
    /// The request could not reach the server, timed out, or the server
    /// answered without a usable body.
    #[error("connectivity error: {0}")]
    Connectivity(String),
    /// The server declared an API-level error.
    #[error("api error [{category}/{code}]: {}", .detail.as_deref().unwrap_or("no detail"))]
    Api {
        category: String,
        code: String,
        detail: Option<String>,
        field: Option<String>,
    },
    /// A 2xx response body could not be deserialized.
    #[error("failed to deserialize response body")]
    Deserialization,
    /// Handing the redirect URL to the external mechanism failed.
    #[error("redirect dispatch failed: {0}")]
    Redirect(String),
    /// The server reported a status this SDK cannot decide on.
    #[error("unrecognized request status: {0}")]
    UnrecognizedStatus(String),
}
