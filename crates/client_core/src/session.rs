use std::collections::HashMap;

use shared::domain::{HistoryEntry, InputText, SessionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    PendingClear,
}

/// Everything one user session owns. Only the controller mutates it.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    input: InputText,
    history: Vec<HistoryEntry>,
    pending_clear: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &InputText {
        &self.input
    }

    /// Oldest first.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn phase(&self) -> SessionPhase {
        if self.pending_clear {
            SessionPhase::PendingClear
        } else {
            SessionPhase::Idle
        }
    }

    pub(crate) fn set_input(&mut self, input: InputText) {
        self.input = input;
    }

    pub(crate) fn clear_input(&mut self) {
        self.input.clear();
        self.pending_clear = false;
    }

    pub(crate) fn request_clear(&mut self) {
        self.pending_clear = true;
    }

    /// Returns whether a clear was pending. Calling it again is a no-op.
    pub(crate) fn apply_pending_clear(&mut self) -> bool {
        if !self.pending_clear {
            return false;
        }
        self.clear_input();
        true
    }

    pub(crate) fn push_history(&mut self, entry: HistoryEntry) {
        self.history.push(entry);
    }
}

/// Per-session states for hosts that serve more than one user.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<SessionId, SessionState>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self) -> SessionId {
        let id = SessionId::new();
        self.sessions.insert(id, SessionState::new());
        tracing::debug!(session = %id, "session opened");
        id
    }

    pub fn get(&self, id: SessionId) -> Option<&SessionState> {
        self.sessions.get(&id)
    }

    pub fn get_mut(&mut self, id: SessionId) -> Option<&mut SessionState> {
        self.sessions.get_mut(&id)
    }

    /// Tears the session down and hands back its final state.
    pub fn end(&mut self, id: SessionId) -> Option<SessionState> {
        let state = self.sessions.remove(&id);
        if state.is_some() {
            tracing::debug!(session = %id, "session ended");
        }
        state
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
