use crate::application::events::Event;
use crate::application::state::MachineState;
use crate::config::SdkConfig;
use crate::domain::action::PaymentAction;
use crate::domain::ports::{Method, RedirectDispatcher, RequestExecutor};
use crate::domain::request::PaymentRequest;
use crate::error::{Error, Result};
use crate::interfaces::rest::request_builder;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use url::Url;

/// Shared collaborators every worker needs: configuration, the transport,
/// the redirect mechanism, and the sender feeding results back into the
/// machine's event queue.
pub struct WorkerContext {
    pub config: Arc<SdkConfig>,
    pub executor: Arc<dyn RequestExecutor>,
    pub redirects: Arc<dyn RedirectDispatcher>,
    pub events: UnboundedSender<Event>,
}

/// Handle to one cancelable unit of background work.
///
/// Cancellation aborts the task at its next await point; the final event
/// send is synchronous, so an aborted worker either never emits or has
/// already enqueued its complete result. A late result already in the queue
/// is absorbed by the machine's default-ignore rule.
pub struct WorkerHandle {
    kind: &'static str,
    task: JoinHandle<()>,
}

impl WorkerHandle {
    pub fn cancel(self) {
        tracing::trace!(worker = self.kind, "canceling worker");
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Entry side-effect table: starts the worker bound to the given state, if
/// the state has one. Called by the transition executor whenever the state
/// tag changes.
pub fn start_for(state: &MachineState, ctx: &Arc<WorkerContext>) -> Option<WorkerHandle> {
    match state {
        MachineState::CreatingRequest {
            actions,
            redirect_uri,
        } => Some(spawn_create(
            ctx.clone(),
            actions.clone(),
            redirect_uri.clone(),
        )),
        MachineState::UpdatingRequest {
            actions,
            request_id,
        } => Some(spawn_update(
            ctx.clone(),
            actions.clone(),
            request_id.clone(),
        )),
        MachineState::RetrievingExistingRequest { request_id } => {
            Some(spawn_retrieve(ctx.clone(), request_id.clone()))
        }
        MachineState::ReadyToAuthorize(request) => Some(spawn_poll(
            ctx.clone(),
            request.id.clone(),
            ctx.config.slow_poll_interval,
        )),
        MachineState::Polling(request) => Some(spawn_poll(
            ctx.clone(),
            request.id.clone(),
            ctx.config.fast_poll_interval,
        )),
        MachineState::DeepLinking(request) => Some(spawn_deep_link(ctx.clone(), request.clone())),
        _ => None,
    }
}

fn spawn_create(
    ctx: Arc<WorkerContext>,
    actions: Vec<PaymentAction>,
    redirect_uri: Option<String>,
) -> WorkerHandle {
    let task = tokio::spawn(async move {
        let body = request_builder::build_create_body(
            &ctx.config.client_id,
            &actions,
            redirect_uri.as_deref(),
        );
        let url = request_builder::requests_url(&ctx.config.base_url);
        let result = execute_json(&ctx, Method::Post, &url, Some(&body)).await;
        let _ = ctx.events.send(Event::CreateResult(result));
    });
    WorkerHandle {
        kind: "create-request",
        task,
    }
}

fn spawn_update(
    ctx: Arc<WorkerContext>,
    actions: Vec<PaymentAction>,
    request_id: String,
) -> WorkerHandle {
    let task = tokio::spawn(async move {
        let body = request_builder::build_update_body(&ctx.config.client_id, &actions);
        let url = request_builder::request_url(&ctx.config.base_url, &request_id);
        let result = execute_json(&ctx, Method::Patch, &url, Some(&body)).await;
        let _ = ctx.events.send(Event::UpdateResult(result));
    });
    WorkerHandle {
        kind: "update-request",
        task,
    }
}

fn spawn_retrieve(ctx: Arc<WorkerContext>, request_id: String) -> WorkerHandle {
    let task = tokio::spawn(async move {
        let result = fetch_request(&ctx, &request_id).await;
        let _ = ctx.events.send(Event::StartExistingResult(result));
    });
    WorkerHandle {
        kind: "retrieve-existing",
        task,
    }
}

fn spawn_poll(ctx: Arc<WorkerContext>, request_id: String, interval: Duration) -> WorkerHandle {
    let task = tokio::spawn(async move {
        loop {
            tokio::time::sleep(interval).await;
            let result = fetch_request(&ctx, &request_id).await;
            if ctx.events.send(Event::PollResult(result)).is_err() {
                break;
            }
        }
    });
    WorkerHandle {
        kind: "poll-status",
        task,
    }
}

fn spawn_deep_link(ctx: Arc<WorkerContext>, request: PaymentRequest) -> WorkerHandle {
    let task = tokio::spawn(async move {
        let outcome = dispatch_redirect(&ctx, &request).await;
        let _ = ctx.events.send(Event::DeepLinkOutcome(outcome));
    });
    WorkerHandle {
        kind: "deep-link",
        task,
    }
}

async fn dispatch_redirect(ctx: &WorkerContext, request: &PaymentRequest) -> Result<()> {
    let raw = request
        .redirect_url()
        .ok_or_else(|| Error::Redirect("payload carries no redirect URL".to_string()))?;
    let url = Url::parse(raw)
        .map_err(|e| Error::Redirect(format!("unparsable redirect URL {raw:?}: {e}")))?;
    if ctx.redirects.dispatch(&url).await {
        Ok(())
    } else {
        Err(Error::Redirect(format!(
            "no external handler accepted {url}"
        )))
    }
}

async fn fetch_request(ctx: &WorkerContext, request_id: &str) -> Result<PaymentRequest> {
    let url = request_builder::request_url(&ctx.config.base_url, request_id);
    ctx.executor
        .execute(Method::Get, &url, &ctx.config.client_id, None)
        .await
}

async fn execute_json<B: Serialize>(
    ctx: &WorkerContext,
    method: Method,
    url: &str,
    body: Option<&B>,
) -> Result<PaymentRequest> {
    let body = match body {
        Some(body) => Some(serde_json::to_value(body).map_err(|_| Error::Deserialization)?),
        None => None,
    };
    ctx.executor
        .execute(method, url, &ctx.config.client_id, body)
        .await
}
