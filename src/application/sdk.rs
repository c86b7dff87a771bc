use crate::application::events::Event;
use crate::application::machine::{ListenerSlot, Snapshot, StateMachine};
use crate::application::state::StateTag;
use crate::application::workers::WorkerContext;
use crate::config::SdkConfig;
use crate::domain::action::PaymentAction;
use crate::domain::ports::{RedirectDispatcher, RequestExecutor, StateListener};
use crate::domain::request::PaymentRequest;
use crate::error::{Error, Result};
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// The caller-visible entry point for one payment-authorization flow.
///
/// Each instance is single-use: it owns one state machine task and runs
/// until the flow reaches a decided outcome or the instance is dropped. All
/// mutating operations validate synchronously, enqueue an event, and return
/// immediately; the resulting transition and listener callback happen later
/// on the machine task.
pub struct PayAuthSdk {
    config: Arc<SdkConfig>,
    events: UnboundedSender<Event>,
    snapshot: watch::Receiver<Snapshot>,
    listener: ListenerSlot,
    machine_task: JoinHandle<()>,
}

impl PayAuthSdk {
    pub fn new(
        config: SdkConfig,
        executor: Arc<dyn RequestExecutor>,
        redirects: Arc<dyn RedirectDispatcher>,
    ) -> Self {
        let config = Arc::new(config);
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let listener: ListenerSlot = Arc::new(RwLock::new(None));
        let ctx = Arc::new(WorkerContext {
            config: config.clone(),
            executor,
            redirects,
            events: events_tx.clone(),
        });
        let (machine, snapshot) = StateMachine::new(ctx, listener.clone());
        let machine_task = tokio::spawn(machine.run(events_rx));
        Self {
            config,
            events: events_tx,
            snapshot,
            listener,
            machine_task,
        }
    }

    /// Creates a new payment request from the given actions.
    ///
    /// Requires a registered listener and a non-empty action list. The
    /// request is created on a background worker; the listener observes
    /// `CreatingRequest` and then either `ReadyToAuthorize` or `Failed`.
    pub fn create_request(
        &self,
        actions: Vec<PaymentAction>,
        redirect_uri: Option<String>,
    ) -> Result<()> {
        self.ensure_not_finished()?;
        if !self.has_listener() {
            return self.integration_misuse("create_request called before a listener is registered");
        }
        if actions.is_empty() {
            return Err(Error::Argument("actions must not be empty".to_string()));
        }
        self.submit(Event::CreateRequest {
            actions,
            redirect_uri,
        })
    }

    /// Replaces the actions of the active request.
    ///
    /// Only valid while a request exists to update, i.e. the machine is in
    /// `ReadyToAuthorize`, an authorizing sub-state, or `UpdatingRequest`.
    pub fn update_request(
        &self,
        request_id: impl Into<String>,
        actions: Vec<PaymentAction>,
    ) -> Result<()> {
        self.ensure_not_finished()?;
        if !self.has_listener() {
            return self.integration_misuse("update_request called before a listener is registered");
        }
        if actions.is_empty() {
            return Err(Error::Argument("actions must not be empty".to_string()));
        }
        if !self.in_any_state(&[
            StateTag::ReadyToAuthorize,
            StateTag::Authorizing,
            StateTag::UpdatingRequest,
        ]) {
            return Err(Error::Argument(
                "no active payment request to update".to_string(),
            ));
        }
        self.submit(Event::UpdateRequest {
            actions,
            request_id: request_id.into(),
        })
    }

    /// Resumes a flow from a request that already exists on the server.
    pub fn start_with_existing(&self, request_id: impl Into<String>) -> Result<()> {
        self.ensure_not_finished()?;
        if !self.has_listener() {
            return self
                .integration_misuse("start_with_existing called before a listener is registered");
        }
        self.submit(Event::StartExisting {
            request_id: request_id.into(),
        })
    }

    /// Starts authorization using the machine's current snapshot.
    pub fn authorize(&self) -> Result<()> {
        self.ensure_not_finished()?;
        if !self.in_any_state(&[StateTag::ReadyToAuthorize, StateTag::Authorizing]) {
            return self.integration_misuse("authorize called before a request is ready");
        }
        self.submit(Event::AuthorizeCurrent)
    }

    /// Starts authorization from a caller-provided snapshot, which must
    /// carry an authorization-flow redirect URL.
    pub fn authorize_with(&self, request: PaymentRequest) -> Result<()> {
        self.ensure_not_finished()?;
        if request.redirect_url().is_none() {
            return Err(Error::Argument(
                "payload carries no authorization redirect URL".to_string(),
            ));
        }
        self.submit(Event::Authorize(request))
    }

    /// Swaps in the single status listener.
    pub fn register_listener(&self, listener: Arc<dyn StateListener>) {
        *self
            .listener
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(listener);
    }

    /// Removes the listener and cancels any active background worker.
    pub fn unregister_listener(&self) {
        *self
            .listener
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
        let _ = self.events.send(Event::Teardown);
    }

    fn has_listener(&self) -> bool {
        self.listener
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_some()
    }

    fn in_any_state(&self, tags: &[StateTag]) -> bool {
        let active = self.snapshot.borrow().tags.clone();
        tags.iter().any(|tag| active.contains(tag))
    }

    fn ensure_not_finished(&self) -> Result<()> {
        if self.snapshot.borrow().terminal {
            return Err(Error::IllegalState(
                "instance already finished".to_string(),
            ));
        }
        Ok(())
    }

    /// Integration misuse is a hard error in sandbox and a logged no-op in
    /// production.
    fn integration_misuse(&self, message: &str) -> Result<()> {
        if self.config.environment.strict_integration_errors() {
            Err(Error::Integration(message.to_string()))
        } else {
            tracing::error!(error = message, "integration misuse ignored");
            Ok(())
        }
    }

    fn submit(&self, event: Event) -> Result<()> {
        self.events
            .send(event)
            .map_err(|_| Error::IllegalState("state machine is no longer running".to_string()))
    }
}

impl Drop for PayAuthSdk {
    fn drop(&mut self) {
        // Dropping the machine task also drops its active worker handle.
        self.machine_task.abort();
    }
}
