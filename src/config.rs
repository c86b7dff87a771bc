use std::time::Duration;

/// Target environment for an SDK instance.
///
/// Besides selecting the API base URL, the environment controls how
/// integration misuse is reported: sandbox instances fail hard so call-order
/// bugs surface during development, production instances log and no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Sandbox,
    Production,
}

impl Environment {
    pub fn base_url(&self) -> &'static str {
        match self {
            Environment::Sandbox => "https://sandbox.api.payauth.dev/customer-request/v1",
            Environment::Production => "https://api.payauth.dev/customer-request/v1",
        }
    }

    /// Whether integration misuse should surface as a hard error.
    pub(crate) fn strict_integration_errors(&self) -> bool {
        matches!(self, Environment::Sandbox)
    }
}

/// Configuration for one SDK instance.
///
/// Polling intervals live here rather than in the machine logic: the fast
/// interval tracks an in-progress authorization, the slow interval is the
/// background freshness check while a request waits to be authorized.
#[derive(Debug, Clone)]
pub struct SdkConfig {
    pub client_id: String,
    pub environment: Environment,
    pub base_url: String,
    pub fast_poll_interval: Duration,
    pub slow_poll_interval: Duration,
    pub request_timeout: Duration,
}

impl SdkConfig {
    pub fn new(client_id: impl Into<String>, environment: Environment) -> Self {
        Self {
            client_id: client_id.into(),
            environment,
            base_url: environment.base_url().to_string(),
            fast_poll_interval: Duration::from_secs(1),
            slow_poll_interval: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_poll_intervals(mut self, fast: Duration, slow: Duration) -> Self {
        self.fast_poll_interval = fast;
        self.slow_poll_interval = slow;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
