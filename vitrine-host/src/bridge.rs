//! Host side of the Autosize Bridge.
//!
//! The script injected by the synthesizer posts `{type: "resize", height}` to
//! its parent. Isolated contexts have an opaque origin, so a message is only
//! attributed to a session when its source is the very context that session
//! owns.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::context::{same_context, IsolatedContext};
use crate::session::SessionId;

/// Messages an isolated document may post to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BridgeMessage {
    Resize { height: f64 },
}

/// A validated height report for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeReport {
    pub session: SessionId,
    pub height: u32,
}

/// Round up and clamp to `[0, max]`. Non-finite heights are rejected.
pub fn clamp_height(height: f64, max: u32) -> Option<u32> {
    if !height.is_finite() {
        return None;
    }
    Some(height.ceil().clamp(0.0, f64::from(max)) as u32)
}

/// Registry of per-session listeners keyed by the context each one owns.
pub struct AutosizeBridge {
    listeners: DashMap<SessionId, Arc<dyn IsolatedContext>>,
    max_height: u32,
}

impl AutosizeBridge {
    pub fn new(max_height: u32) -> Self {
        Self {
            listeners: DashMap::new(),
            max_height,
        }
    }

    pub fn max_height(&self) -> u32 {
        self.max_height
    }

    pub fn attach(&self, session: SessionId, context: Arc<dyn IsolatedContext>) {
        self.listeners.insert(session, context);
    }

    /// Remove a session's listener. Returns false when none was attached.
    pub fn detach(&self, session: SessionId) -> bool {
        self.listeners.remove(&session).is_some()
    }

    pub fn is_attached(&self, session: SessionId) -> bool {
        self.listeners.contains_key(&session)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn owner_of(&self, source: &Arc<dyn IsolatedContext>) -> Option<SessionId> {
        self.listeners
            .iter()
            .find(|entry| same_context(entry.value(), source))
            .map(|entry| *entry.key())
    }

    /// Attribute and validate one posted message.
    ///
    /// Returns `None` for messages from unknown sources (forged, or from a
    /// context whose session was already torn down) and for malformed
    /// payloads.
    pub fn route(&self, source: &Arc<dyn IsolatedContext>, data: &Value) -> Option<ResizeReport> {
        let Some(session) = self.owner_of(source) else {
            log::warn!("discarding bridge message from an unrecognized context");
            return None;
        };

        let message: BridgeMessage = match serde_json::from_value(data.clone()) {
            Ok(m) => m,
            Err(e) => {
                log::debug!("session {}: ignoring malformed bridge message: {}", session, e);
                return None;
            }
        };

        match message {
            BridgeMessage::Resize { height } => match clamp_height(height, self.max_height) {
                Some(px) => Some(ResizeReport {
                    session,
                    height: px,
                }),
                None => {
                    log::debug!("session {}: ignoring non-finite height", session);
                    None
                }
            },
        }
    }
}
