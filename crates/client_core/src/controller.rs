//! Interaction controller: user actions in, session updates and render instructions out.
//!
//! Issuing a call ([`handle`]) and folding its result back ([`complete`]) are
//! separate steps so a front end can keep several calls in flight while the
//! session still has a single writer.

use serde::{Deserialize, Serialize};
use shared::{
    domain::{ExplanationResult, HistoryEntry, InputText, PredictionResult},
    error::{ClientError, ErrorKind},
};
use tracing::{debug, info};

use crate::{session::SessionState, SentimentApi};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubmitAction {
    Predict,
    Explain,
}

impl SubmitAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Predict => "predict",
            Self::Explain => "explain",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClearMode {
    #[default]
    Immediate,
    /// Input is emptied on the next [`UserAction::Refresh`].
    Deferred,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    EditInput(String),
    SelectExample(String),
    Submit(SubmitAction),
    Clear,
    Refresh,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiCall {
    pub action: SubmitAction,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CallOutcome {
    Predicted {
        text: String,
        result: Result<PredictionResult, ClientError>,
    },
    Explained(Result<ExplanationResult, ClientError>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub kind: ErrorKind,
    pub status: Option<u16>,
    pub message: String,
}

impl Notice {
    pub fn validation() -> Self {
        Self {
            level: NoticeLevel::Warning,
            kind: ErrorKind::Validation,
            status: None,
            message: "Please enter some text.".to_string(),
        }
    }

    pub fn from_error(err: &ClientError) -> Self {
        let message = match err {
            ClientError::Validation => return Self::validation(),
            ClientError::Timeout => "API error: request timed out".to_string(),
            ClientError::Api { status } => format!("API error: {status}"),
            ClientError::MalformedResponse { status, .. } => {
                format!("API error: {status} (malformed response body)")
            }
            ClientError::Unreachable { reason } => format!("API unreachable: {reason}"),
        };
        Self {
            level: NoticeLevel::Error,
            kind: err.kind(),
            status: err.status(),
            message,
        }
    }
}

/// What the front end should draw after an action.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Unchanged,
    InputChanged,
    ClearPending,
    Notice(Notice),
    Prediction(PredictionResult),
    Explanation(ExplanationResult),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Done(Outcome),
    Call(ApiCall),
}

/// Applies one action to the session. Submissions with text come back as
/// [`Step::Call`]; run them with [`perform`] and pass the result to [`complete`].
pub fn handle(session: &mut SessionState, action: UserAction, clear_mode: ClearMode) -> Step {
    if !matches!(action, UserAction::Clear | UserAction::Refresh) {
        session.apply_pending_clear();
    }

    match action {
        UserAction::EditInput(text) | UserAction::SelectExample(text) => {
            session.set_input(InputText::truncated(text));
            Step::Done(Outcome::InputChanged)
        }
        UserAction::Submit(action) => {
            if session.input().is_empty() {
                debug!(action = action.as_str(), "submission rejected: empty input");
                return Step::Done(Outcome::Notice(Notice::validation()));
            }
            Step::Call(ApiCall {
                action,
                text: session.input().as_str().to_string(),
            })
        }
        UserAction::Clear => match clear_mode {
            ClearMode::Immediate => {
                session.clear_input();
                Step::Done(Outcome::InputChanged)
            }
            ClearMode::Deferred => {
                session.request_clear();
                Step::Done(Outcome::ClearPending)
            }
        },
        UserAction::Refresh => {
            if session.apply_pending_clear() {
                Step::Done(Outcome::InputChanged)
            } else {
                Step::Done(Outcome::Unchanged)
            }
        }
    }
}

pub async fn perform<A>(api: &A, call: ApiCall) -> CallOutcome
where
    A: SentimentApi + ?Sized,
{
    match call.action {
        SubmitAction::Predict => {
            let result = api.predict(&call.text).await;
            CallOutcome::Predicted {
                text: call.text,
                result,
            }
        }
        SubmitAction::Explain => CallOutcome::Explained(api.explain(&call.text).await),
    }
}

/// Folds a finished call into the session. History only grows on a fully
/// decoded prediction.
pub fn complete(session: &mut SessionState, outcome: CallOutcome) -> Outcome {
    match outcome {
        CallOutcome::Predicted {
            text,
            result: Ok(result),
        } => {
            session.push_history(HistoryEntry::from_prediction(text, &result));
            info!(
                sentiment = %result.sentiment,
                confidence = result.confidence,
                history_len = session.history().len(),
                "prediction recorded"
            );
            Outcome::Prediction(result)
        }
        CallOutcome::Explained(Ok(result)) => Outcome::Explanation(result),
        CallOutcome::Predicted { result: Err(err), .. } | CallOutcome::Explained(Err(err)) => {
            Outcome::Notice(Notice::from_error(&err))
        }
    }
}

/// Convenience wrapper for callers that await each action inline.
pub struct Controller<A> {
    api: A,
    clear_mode: ClearMode,
}

impl<A: SentimentApi> Controller<A> {
    pub fn new(api: A, clear_mode: ClearMode) -> Self {
        Self { api, clear_mode }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn clear_mode(&self) -> ClearMode {
        self.clear_mode
    }

    pub fn handle(&self, session: &mut SessionState, action: UserAction) -> Step {
        handle(session, action, self.clear_mode)
    }

    pub async fn dispatch(&self, session: &mut SessionState, action: UserAction) -> Outcome {
        match handle(session, action, self.clear_mode) {
            Step::Done(outcome) => outcome,
            Step::Call(call) => {
                let outcome = perform(&self.api, call).await;
                complete(session, outcome)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
