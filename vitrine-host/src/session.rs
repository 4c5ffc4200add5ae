use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use vitrine_core::SessionState;

use crate::context::ContainerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        SessionId(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Snapshot of one mount of the render host.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSession {
    pub id: SessionId,
    pub record_id: String,
    pub container: ContainerId,
    pub state: SessionState,
    /// Last height applied to the container, after clamping.
    pub height: Option<u32>,
    pub last_error: Option<String>,
}

impl RenderSession {
    pub fn new(record_id: impl Into<String>, container: ContainerId) -> Self {
        Self {
            id: SessionId::new(),
            record_id: record_id.into(),
            container,
            state: SessionState::Initializing,
            height: None,
            last_error: None,
        }
    }

    /// Move to `next` if the state machine allows it. Returns whether it moved.
    pub fn transition(&mut self, next: SessionState) -> bool {
        if self.state.can_transition_to(next) {
            self.state = next;
            true
        } else {
            log::debug!(
                "session {}: ignoring transition {} -> {}",
                self.id,
                self.state,
                next
            );
            false
        }
    }

    /// Record a failure and move to `Errored`.
    pub fn fail(&mut self, error: impl Into<String>) -> bool {
        if self.transition(SessionState::Errored) {
            self.last_error = Some(error.into());
            true
        } else {
            false
        }
    }
}
