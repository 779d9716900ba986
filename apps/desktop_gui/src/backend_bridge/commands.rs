//! Backend commands queued from UI to backend worker.

use client_core::ApiCall;

pub enum BackendCommand {
    Submit(ApiCall),
    Shutdown,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Submit(call) => call.action.as_str(),
            BackendCommand::Shutdown => "shutdown",
        }
    }
}
