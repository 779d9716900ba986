//! Events flowing from the backend worker to the UI thread.

use client_core::CallOutcome;

pub enum UiEvent {
    Info(String),
    BackendFailed(String),
    CallCompleted(CallOutcome),
}
