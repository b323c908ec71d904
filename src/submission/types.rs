//! Submission lifecycle types and the pure transition function.

use serde::{Deserialize, Serialize};

use crate::error::RequestError;

/// Fallback shown when an error response carries no usable `detail`.
pub const GENERIC_ERROR_MESSAGE: &str = "Erro desconhecido ao processar o e-mail.";

/// Label the service assigns to an email.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    /// Needs action or a reply.
    Produtivo,
    /// No action required.
    Improdutivo,
    /// Any other label, e.g. "Desconhecido" when the service could not decide.
    #[serde(untagged)]
    Other(String),
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Produtivo => "Produtivo",
            Self::Improdutivo => "Improdutivo",
            Self::Other(label) => label.as_str(),
        };
        write!(f, "{s}")
    }
}

/// Successful response body of `POST /api/v1/process-email`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub classification: Classification,
    pub suggested_response: String,
}

/// Lifecycle of the current submission. Exactly one is active.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Loading,
    Succeeded(ProcessingResult),
    Failed(String),
}

impl SubmissionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn result(&self) -> Option<&ProcessingResult> {
        match self {
            Self::Succeeded(r) => Some(r),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    /// Variant name without payload, for logs and history.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Succeeded(_) => "succeeded",
            Self::Failed(_) => "failed",
        }
    }
}

impl std::fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Monotonic identifier of one `submit` call. Only the latest one may
/// change state when it completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SubmissionToken(pub u64);

impl std::fmt::Display for SubmissionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Input to the state machine.
#[derive(Debug, Clone)]
pub enum SubmissionEvent {
    /// A new submission started.
    Submitted,
    /// The outstanding request finished.
    Completed(Result<ProcessingResult, RequestError>),
}

/// Compute the next state. Pure; the controller owns where the state lives.
///
/// `Submitted` moves any state to `Loading`. A completion only lands on
/// `Loading`; anywhere else it leaves the state untouched.
pub fn transition(state: &SubmissionState, event: SubmissionEvent) -> SubmissionState {
    match event {
        SubmissionEvent::Submitted => SubmissionState::Loading,
        SubmissionEvent::Completed(_) if !state.is_loading() => state.clone(),
        SubmissionEvent::Completed(Ok(result)) => SubmissionState::Succeeded(result),
        SubmissionEvent::Completed(Err(e)) => SubmissionState::Failed(e.to_string()),
    }
}
