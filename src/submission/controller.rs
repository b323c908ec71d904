//! Submission controller: drives one request at a time and broadcasts
//! state changes to the presentation layer.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, info, warn};

use super::request::OutboundRequest;
use super::transport::{ClassifierTransport, interpret_reply};
use super::types::{
    ProcessingResult, SubmissionEvent, SubmissionState, SubmissionToken, transition,
};
use crate::error::RequestError;
use crate::form::NormalizedPayload;

/// Default broadcast channel capacity.
const DEFAULT_BROADCAST_CAPACITY: usize = 64;

/// Cap on recorded transitions.
const MAX_TRANSITIONS: usize = 100;

/// Events observed by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    StateChanged {
        token: SubmissionToken,
        state: SubmissionState,
    },
    /// One-shot request to open the error dialog.
    ShowError {
        token: SubmissionToken,
        message: String,
    },
}

/// A recorded state change.
#[derive(Debug, Clone, Serialize)]
pub struct StateTransition {
    pub token: SubmissionToken,
    pub from: &'static str,
    pub to: &'static str,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Inner {
    state: SubmissionState,
    latest: Option<SubmissionToken>,
    issued: u64,
    error_dialog_open: bool,
    transitions: Vec<StateTransition>,
}

impl Inner {
    fn apply(&mut self, token: SubmissionToken, next: SubmissionState) {
        self.transitions.push(StateTransition {
            token,
            from: self.state.label(),
            to: next.label(),
            timestamp: Utc::now(),
        });
        if self.transitions.len() > MAX_TRANSITIONS {
            let drain_count = self.transitions.len() - MAX_TRANSITIONS;
            self.transitions.drain(..drain_count);
        }
        self.state = next;
    }
}

/// Owns the submission lifecycle for one form.
///
/// A second `submit` while one is in flight is not rejected; the presentation
/// layer is expected to disable submitting while `Loading`. If it happens
/// anyway, only the newest submission's outcome is kept.
pub struct SubmissionController {
    transport: Arc<dyn ClassifierTransport>,
    inner: RwLock<Inner>,
    tx: broadcast::Sender<ControllerEvent>,
}

impl SubmissionController {
    pub fn new(transport: Arc<dyn ClassifierTransport>) -> Arc<Self> {
        let (tx, _rx) = broadcast::channel(DEFAULT_BROADCAST_CAPACITY);
        Arc::new(Self {
            transport,
            inner: RwLock::new(Inner::default()),
            tx,
        })
    }

    /// Subscribe to state changes and error notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<ControllerEvent> {
        self.tx.subscribe()
    }

    pub async fn state(&self) -> SubmissionState {
        self.inner.read().await.state.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.inner.read().await.state.is_loading()
    }

    /// Whether the error dialog is showing. Independent of the `Failed` state.
    pub async fn error_dialog_open(&self) -> bool {
        self.inner.read().await.error_dialog_open
    }

    /// Close the error dialog. The stored error message is kept.
    pub async fn dismiss_error(&self) {
        self.inner.write().await.error_dialog_open = false;
    }

    /// Recorded transitions, oldest first.
    pub async fn transitions(&self) -> Vec<StateTransition> {
        self.inner.read().await.transitions.clone()
    }

    /// Submit a payload and wait for the outcome to be applied.
    ///
    /// All failures end up as `Failed`; nothing is returned to the caller
    /// except the token identifying this submission.
    pub async fn submit(&self, payload: NormalizedPayload) -> SubmissionToken {
        let token = self.begin().await;
        self.finish(token, payload).await;
        token
    }

    /// Send the payload for a submission already started with [`begin`] and
    /// apply the outcome. Returns `false` if `token` went stale meanwhile.
    ///
    /// [`begin`]: Self::begin
    pub async fn finish(&self, token: SubmissionToken, payload: NormalizedPayload) -> bool {
        info!(%token, kind = payload.kind(), "Submitting email for classification");
        let outcome = self.run(payload).await;
        self.complete(token, outcome).await
    }

    /// Start a submission: issue a fresh token and move to `Loading`,
    /// dropping any previous result or error.
    pub async fn begin(&self) -> SubmissionToken {
        let token;
        {
            let mut inner = self.inner.write().await;
            inner.issued += 1;
            token = SubmissionToken(inner.issued);
            inner.latest = Some(token);
            inner.error_dialog_open = false;
            let next = transition(&inner.state, SubmissionEvent::Submitted);
            inner.apply(token, next);
        }

        let _ = self.tx.send(ControllerEvent::StateChanged {
            token,
            state: SubmissionState::Loading,
        });
        token
    }

    /// Apply the outcome of submission `token`. Returns `false` when the
    /// token is stale (a newer submission has started) and nothing changed.
    pub async fn complete(
        &self,
        token: SubmissionToken,
        outcome: Result<ProcessingResult, RequestError>,
    ) -> bool {
        let mut inner = self.inner.write().await;

        if inner.latest != Some(token) {
            debug!(%token, latest = ?inner.latest, "Discarding stale submission result");
            return false;
        }

        match &outcome {
            Ok(result) => info!(%token, classification = %result.classification, "Email classified"),
            Err(e) => warn!(%token, status = ?e.status(), error = %e, "Email submission failed"),
        }

        let next = transition(&inner.state, SubmissionEvent::Completed(outcome));
        if next == inner.state {
            return false;
        }
        inner.apply(token, next.clone());
        let show_error = next.error().map(str::to_string);
        if show_error.is_some() {
            inner.error_dialog_open = true;
        }
        drop(inner);

        // `StateChanged` always precedes `ShowError`.
        let _ = self.tx.send(ControllerEvent::StateChanged { token, state: next });
        if let Some(message) = show_error {
            let _ = self.tx.send(ControllerEvent::ShowError { token, message });
        }
        true
    }

    async fn run(&self, payload: NormalizedPayload) -> Result<ProcessingResult, RequestError> {
        let request = OutboundRequest::from_payload(payload).await?;
        let reply = self.transport.post_email(request).await?;
        interpret_reply(reply)
    }
}
