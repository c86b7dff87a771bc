use crate::application::events::Event;
use crate::application::projector;
use crate::application::state::{MachineState, StateTag};
use crate::application::workers::{self, WorkerContext, WorkerHandle};
use crate::domain::ports::StateListener;
use crate::domain::request::{PaymentRequest, RequestStatus};
use crate::error::Error;
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::watch;

/// Single listener slot shared between the facade (swap) and the machine
/// task (read + invoke). Replaced atomically, never mutated in place.
pub type ListenerSlot = Arc<RwLock<Option<Arc<dyn StateListener>>>>;

/// Point-in-time view of the machine published for synchronous facade
/// precondition checks.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub tags: Vec<StateTag>,
    pub terminal: bool,
}

impl Snapshot {
    fn of(state: &MachineState) -> Self {
        Self {
            tags: state.active_tags(),
            terminal: state.is_terminal(),
        }
    }
}

/// Result of applying one event to the current state.
#[derive(Debug)]
pub enum Outcome {
    Next(MachineState),
    /// The `(state, event)` pair is not in the transition table; the event
    /// is dropped. This is the rule that makes stale worker results safe.
    Ignored(&'static str),
}

/// Deterministic transition function over the full `(state, event)` space.
///
/// Decided-status precedence: approved-with-grants is checked before
/// declined. Transport failures from any worker land in `Failed`.
pub fn transition(state: &MachineState, event: Event) -> Outcome {
    use MachineState as S;

    let next = match (state, event) {
        (S::NotStarted, Event::CreateRequest {
            actions,
            redirect_uri,
        }) => S::CreatingRequest {
            actions,
            redirect_uri,
        },
        (S::NotStarted, Event::StartExisting { request_id }) => {
            S::RetrievingExistingRequest { request_id }
        }

        (S::CreatingRequest { .. }, Event::CreateResult(Ok(request))) => {
            S::ReadyToAuthorize(request)
        }
        (S::CreatingRequest { .. }, Event::CreateResult(Err(error))) => S::Failed(error),

        (S::RetrievingExistingRequest { .. }, Event::StartExistingResult(Ok(request))) => {
            decide_existing(request)
        }
        (S::RetrievingExistingRequest { .. }, Event::StartExistingResult(Err(error))) => {
            S::Failed(error)
        }

        (S::ReadyToAuthorize(_), Event::Authorize(request)) => S::DeepLinking(request),
        (S::ReadyToAuthorize(request), Event::AuthorizeCurrent) => S::DeepLinking(request.clone()),
        (S::ReadyToAuthorize(_), Event::PollResult(Ok(request))) => match decide(request) {
            Decision::Approved(request) => S::Approved(request),
            Decision::Declined => S::Declined,
            Decision::Undecided(request) => S::ReadyToAuthorize(request),
        },
        (S::ReadyToAuthorize(_), Event::PollResult(Err(error))) => S::Failed(error),
        (S::ReadyToAuthorize(_), Event::UpdateRequest {
            actions,
            request_id,
        }) => S::UpdatingRequest {
            actions,
            request_id,
        },

        (S::DeepLinking(request), Event::DeepLinkOutcome(Ok(()))) => S::Polling(request.clone()),
        (S::DeepLinking(_), Event::DeepLinkOutcome(Err(error))) => S::Failed(error),

        (S::Polling(_), Event::PollResult(Ok(request))) => match decide(request) {
            Decision::Approved(request) => S::Approved(request),
            Decision::Declined => S::Declined,
            Decision::Undecided(request) => S::Polling(request),
        },
        (S::Polling(_), Event::PollResult(Err(error))) => S::Failed(error),
        (S::Polling(_), Event::Authorize(request)) => S::DeepLinking(request),
        (S::Polling(request), Event::AuthorizeCurrent) => S::DeepLinking(request.clone()),

        (S::UpdatingRequest { .. }, Event::UpdateResult(Ok(request))) => {
            S::ReadyToAuthorize(request)
        }
        (S::UpdatingRequest { .. }, Event::UpdateResult(Err(error))) => S::Failed(error),

        (_, Event::IllegalArguments(error)) => S::Failed(error),

        (_, event) => return Outcome::Ignored(event.name()),
    };
    Outcome::Next(next)
}

enum Decision {
    Approved(PaymentRequest),
    Declined,
    Undecided(PaymentRequest),
}

/// The decided condition for poll results: approved-with-grants wins,
/// declined ends the flow, anything else refreshes the carried snapshot.
fn decide(request: PaymentRequest) -> Decision {
    if request.is_approved_with_grants() {
        Decision::Approved(request)
    } else if request.status == RequestStatus::Declined {
        Decision::Declined
    } else {
        Decision::Undecided(request)
    }
}

/// Routes a freshly retrieved existing request to the state matching its
/// reported status. Statuses outside the decision table (including approved
/// without grants) are a defensive failure, not a crash.
fn decide_existing(request: PaymentRequest) -> MachineState {
    if request.is_approved_with_grants() {
        return MachineState::Approved(request);
    }
    match request.status {
        RequestStatus::Declined => MachineState::Declined,
        RequestStatus::Processing => MachineState::Polling(request),
        RequestStatus::Pending => MachineState::ReadyToAuthorize(request),
        other => MachineState::Failed(Error::UnrecognizedStatus(format!("{other:?}"))),
    }
}

/// The event-processing loop and its side effects.
///
/// Exactly one task runs `run`, owning the current state, the active worker
/// handle, and listener invocation; workers never touch machine state and
/// only feed events back through the queue.
pub struct StateMachine {
    state: MachineState,
    worker: Option<WorkerHandle>,
    ctx: Arc<WorkerContext>,
    listener: ListenerSlot,
    snapshot: watch::Sender<Snapshot>,
}

impl StateMachine {
    pub fn new(ctx: Arc<WorkerContext>, listener: ListenerSlot) -> (Self, watch::Receiver<Snapshot>) {
        let state = MachineState::NotStarted;
        let (snapshot_tx, snapshot_rx) = watch::channel(Snapshot::of(&state));
        (
            Self {
                state,
                worker: None,
                ctx,
                listener,
                snapshot: snapshot_tx,
            },
            snapshot_rx,
        )
    }

    /// Processes events in strict submission order until the facade is
    /// dropped. The loop keeps draining after a terminal state so that late
    /// worker results stay order-safe instead of piling up.
    pub async fn run(mut self, mut events: UnboundedReceiver<Event>) {
        while let Some(event) = events.recv().await {
            self.handle(event);
        }
        self.cancel_worker();
    }

    fn handle(&mut self, event: Event) {
        if matches!(event, Event::Teardown) {
            tracing::debug!("teardown requested, canceling active worker");
            self.cancel_worker();
            return;
        }
        match transition(&self.state, event) {
            Outcome::Next(next) => self.enter(next),
            Outcome::Ignored(event) => {
                tracing::debug!(state = ?self.state.tag(), event, "event ignored in current state");
            }
        }
    }

    /// Applies entry/exit side effects around a state change: when the tag
    /// changes, the outgoing state's worker is canceled unconditionally and
    /// the incoming state's worker is started. Self-transitions keep the
    /// running worker (the poll loop emits repeatedly).
    fn enter(&mut self, next: MachineState) {
        let tag_changed = next.tag() != self.state.tag();
        tracing::debug!(from = ?self.state.tag(), to = ?next.tag(), "state transition");
        if tag_changed {
            self.cancel_worker();
        }
        self.state = next;
        if tag_changed {
            self.worker = workers::start_for(&self.state, &self.ctx);
        }
        let _ = self.snapshot.send(Snapshot::of(&self.state));
        self.notify();
    }

    fn notify(&self) {
        let listener = self
            .listener
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        if let Some(listener) = listener {
            listener.on_state_changed(&projector::project(&self.state));
        }
    }

    fn cancel_worker(&mut self) {
        if let Some(worker) = self.worker.take() {
            worker.cancel();
        }
    }
}
