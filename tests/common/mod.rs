use async_trait::async_trait;
use payauth::config::{Environment, SdkConfig};
use payauth::domain::ports::{Method, RedirectDispatcher, RequestExecutor, StateListener};
use payauth::domain::request::{AuthFlowTriggers, Grant, PaymentRequest, RequestStatus};
use payauth::domain::status::SdkStatus;
use payauth::error::Result;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use url::Url;

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: Method,
    pub url: String,
    pub body: Option<serde_json::Value>,
}

/// Transport fake that replays a scripted sequence of responses and records
/// every call. When the script runs out it either serves the configured
/// fallback response or parks the worker forever.
pub struct ScriptedExecutor {
    script: Mutex<VecDeque<Result<PaymentRequest>>>,
    fallback: Option<Result<PaymentRequest>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedExecutor {
    pub fn new(script: Vec<Result<PaymentRequest>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            fallback: None,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn with_fallback(
        script: Vec<Result<PaymentRequest>>,
        fallback: Result<PaymentRequest>,
    ) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            fallback: Some(fallback),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RequestExecutor for ScriptedExecutor {
    async fn execute(
        &self,
        method: Method,
        url: &str,
        _auth_token: &str,
        body: Option<serde_json::Value>,
    ) -> Result<PaymentRequest> {
        self.calls.lock().unwrap().push(RecordedCall {
            method,
            url: url.to_string(),
            body,
        });
        let next = self.script.lock().unwrap().pop_front();
        match next.or_else(|| self.fallback.clone()) {
            Some(result) => result,
            None => std::future::pending().await,
        }
    }
}

/// Redirect fake: records dispatched URLs and answers with a fixed verdict.
pub struct FakeDispatcher {
    accept: bool,
    dispatched: Mutex<Vec<String>>,
}

impl FakeDispatcher {
    pub fn accepting() -> Arc<Self> {
        Arc::new(Self {
            accept: true,
            dispatched: Mutex::new(Vec::new()),
        })
    }

    pub fn rejecting() -> Arc<Self> {
        Arc::new(Self {
            accept: false,
            dispatched: Mutex::new(Vec::new()),
        })
    }

    pub fn dispatched(&self) -> Vec<String> {
        self.dispatched.lock().unwrap().clone()
    }
}

#[async_trait]
impl RedirectDispatcher for FakeDispatcher {
    async fn dispatch(&self, url: &Url) -> bool {
        self.dispatched.lock().unwrap().push(url.to_string());
        self.accept
    }
}

/// Listener that forwards every status into a channel the test can await.
pub struct ChannelListener(mpsc::UnboundedSender<SdkStatus>);

impl StateListener for ChannelListener {
    fn on_state_changed(&self, status: &SdkStatus) {
        let _ = self.0.send(status.clone());
    }
}

pub fn listener_channel() -> (Arc<ChannelListener>, UnboundedReceiver<SdkStatus>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Arc::new(ChannelListener(tx)), rx)
}

pub async fn next_status(rx: &mut UnboundedReceiver<SdkStatus>) -> SdkStatus {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for a status callback")
        .expect("listener channel closed")
}

pub fn test_config() -> SdkConfig {
    SdkConfig::new("client_test", Environment::Sandbox)
        .with_base_url("https://api.test/v1")
        .with_poll_intervals(Duration::from_millis(10), Duration::from_secs(60))
}

pub fn request_with_status(status: RequestStatus) -> PaymentRequest {
    PaymentRequest {
        id: "req_1".to_string(),
        status,
        grants: vec![],
        auth_flow_triggers: Some(AuthFlowTriggers {
            redirect_url: Some("payapp://authorize/req_1".to_string()),
            qr_code_url: None,
            refreshes_at: None,
        }),
    }
}

pub fn approved_request() -> PaymentRequest {
    let mut request = request_with_status(RequestStatus::Approved);
    request.grants.push(Grant {
        id: "grant_1".to_string(),
        customer_id: Some("cust_1".to_string()),
        grant_type: Some("ONE_TIME".to_string()),
    });
    request
}
