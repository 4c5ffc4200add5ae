//! Isolated Render Host: one isolated context per mounted preview.
//!
//! Mounting never fails from the caller's point of view. Context creation
//! errors, document load errors, script errors and load timeouts all end in
//! `Errored` and are reported through [`HostEvent`]s.

use dashmap::DashMap;
use serde_json::Value;
use std::sync::{Arc, PoisonError, RwLock, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use vitrine_core::{PreviewConfig, SessionState};

use crate::bridge::AutosizeBridge;
use crate::context::{Container, ContainerId, ContextFactory, IsolatedContext};
use crate::error::HostResult;
use crate::policy::CapabilityPolicy;
use crate::session::{RenderSession, SessionId};

#[derive(Debug, Clone, PartialEq)]
pub struct HostSettings {
    pub policy: CapabilityPolicy,
    pub load_timeout: Duration,
    pub max_content_height: u32,
}

impl Default for HostSettings {
    fn default() -> Self {
        Self::from_config(&PreviewConfig::default())
    }
}

impl HostSettings {
    pub fn from_config(config: &PreviewConfig) -> Self {
        Self {
            policy: CapabilityPolicy::isolated(),
            load_timeout: Duration::from_millis(config.load_timeout_ms),
            max_content_height: config.max_content_height,
        }
    }
}

/// Lifecycle notifications, delivered synchronously in the order they happen.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    StateChanged {
        session: SessionId,
        container: ContainerId,
        record_id: String,
        state: SessionState,
    },
    Resized {
        session: SessionId,
        container: ContainerId,
        height: u32,
    },
}

pub trait SessionObserver: Send + Sync {
    fn on_event(&self, event: &HostEvent);
}

struct SessionSlot {
    session: RenderSession,
    context: Option<Arc<dyn IsolatedContext>>,
    container: Arc<dyn Container>,
    timer: Option<JoinHandle<()>>,
}

struct HostInner {
    factory: Arc<dyn ContextFactory>,
    settings: HostSettings,
    bridge: AutosizeBridge,
    sessions: DashMap<SessionId, SessionSlot>,
    by_container: DashMap<ContainerId, SessionId>,
    observers: RwLock<Vec<Weak<dyn SessionObserver>>>,
}

impl HostInner {
    fn notify(&self, event: &HostEvent) {
        let observers: Vec<Arc<dyn SessionObserver>> = self
            .observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter_map(Weak::upgrade)
            .collect();
        for observer in observers {
            observer.on_event(event);
        }
    }

    fn state_event(session: &RenderSession) -> HostEvent {
        HostEvent::StateChanged {
            session: session.id,
            container: session.container.clone(),
            record_id: session.record_id.clone(),
            state: session.state,
        }
    }

    /// Apply a transition (to `Errored` when `error` is set) and cancel the
    /// load timer once the session has settled.
    fn transition(&self, id: SessionId, next: SessionState, error: Option<String>) -> bool {
        let event = {
            let Some(mut slot) = self.sessions.get_mut(&id) else {
                log::debug!("session {}: event after teardown ignored", id);
                return false;
            };
            let moved = match error {
                Some(e) => slot.session.fail(e),
                None => slot.session.transition(next),
            };
            if !moved {
                return false;
            }
            if let Some(timer) = slot.timer.take() {
                timer.abort();
            }
            Self::state_event(&slot.session)
        };
        self.notify(&event);
        true
    }

    fn expire(&self, id: SessionId) {
        let message = format!(
            "document did not load within {}ms",
            self.settings.load_timeout.as_millis()
        );
        if self.transition(id, SessionState::Errored, Some(message)) {
            log::warn!("session {}: load timed out", id);
        }
    }
}

/// Cheap to clone; all clones drive the same sessions.
#[derive(Clone)]
pub struct RenderHost {
    inner: Arc<HostInner>,
}

impl RenderHost {
    /// Fails only when the settings carry a policy that would expose the host page.
    pub fn new(factory: Arc<dyn ContextFactory>, settings: HostSettings) -> HostResult<Self> {
        settings.policy.validate()?;
        Ok(Self {
            inner: Arc::new(HostInner {
                factory,
                bridge: AutosizeBridge::new(settings.max_content_height),
                settings,
                sessions: DashMap::new(),
                by_container: DashMap::new(),
                observers: RwLock::new(Vec::new()),
            }),
        })
    }

    pub fn settings(&self) -> &HostSettings {
        &self.inner.settings
    }

    /// Register an observer. The host only keeps a weak reference; dropping
    /// the observer unregisters it.
    pub fn observe(&self, observer: &Arc<dyn SessionObserver>) {
        let mut observers = self
            .inner
            .observers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        observers.retain(|o| o.strong_count() > 0);
        observers.push(Arc::downgrade(observer));
    }

    /// Create an isolated context in `container` and load `document` into it.
    ///
    /// Any session already mounted in the same container is torn down first.
    /// Returns immediately; completion arrives through [`handle_load`],
    /// [`handle_script_error`] or the load timeout.
    ///
    /// [`handle_load`]: RenderHost::handle_load
    /// [`handle_script_error`]: RenderHost::handle_script_error
    pub fn mount(&self, container: Arc<dyn Container>, record_id: &str, document: &str) -> SessionId {
        let container_id = container.id();
        let previous = self
            .inner
            .by_container
            .get(&container_id)
            .map(|entry| *entry.value());
        if let Some(previous) = previous {
            log::debug!("container {}: replacing session {}", container_id, previous);
            self.unmount(previous);
        }

        let session = RenderSession::new(record_id, container_id.clone());
        let id = session.id;
        let created = self
            .inner
            .factory
            .create(container.as_ref(), &self.inner.settings.policy);

        let initial = HostInner::state_event(&session);
        self.inner.sessions.insert(
            id,
            SessionSlot {
                session,
                context: None,
                container,
                timer: None,
            },
        );
        self.inner.by_container.insert(container_id, id);
        self.inner.notify(&initial);

        let context = match created {
            Ok(context) => context,
            Err(e) => {
                log::warn!("session {}: {}", id, e);
                self.inner.transition(id, SessionState::Errored, Some(e.to_string()));
                return id;
            }
        };

        if let Some(mut slot) = self.inner.sessions.get_mut(&id) {
            slot.context = Some(Arc::clone(&context));
        }
        self.inner.bridge.attach(id, Arc::clone(&context));
        self.arm_load_timeout(id);

        if let Err(e) = context.load_document(document) {
            log::warn!("session {}: {}", id, e);
            self.inner.transition(id, SessionState::Errored, Some(e.to_string()));
        }
        id
    }

    fn arm_load_timeout(&self, id: SessionId) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            log::debug!("session {}: no tokio runtime, load timeout disabled", id);
            return;
        };
        let inner: Weak<HostInner> = Arc::downgrade(&self.inner);
        let timeout = self.inner.settings.load_timeout;
        let timer = runtime.spawn(async move {
            tokio::time::sleep(timeout).await;
            if let Some(inner) = inner.upgrade() {
                inner.expire(id);
            }
        });
        match self.inner.sessions.get_mut(&id) {
            Some(mut slot) if slot.session.state == SessionState::Initializing => {
                slot.timer = Some(timer)
            }
            _ => timer.abort(),
        }
    }

    /// Tear a session down: listener first, then timer, then the context.
    /// Unknown or already destroyed sessions return `None`.
    pub fn unmount(&self, id: SessionId) -> Option<RenderSession> {
        self.inner.bridge.detach(id);
        let (_, mut slot) = self.inner.sessions.remove(&id)?;
        self.inner
            .by_container
            .remove_if(&slot.session.container, |_, current| *current == id);
        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }
        if let Some(context) = slot.context.take() {
            context.detach();
        }
        slot.session.transition(SessionState::Destroyed);
        log::debug!("session {}: destroyed", id);
        self.inner.notify(&HostInner::state_event(&slot.session));
        Some(slot.session)
    }

    /// The platform saw the context's load event.
    pub fn handle_load(&self, id: SessionId) -> bool {
        self.inner.transition(id, SessionState::Loaded, None)
    }

    /// The platform saw a script error inside the context.
    pub fn handle_script_error(&self, id: SessionId, message: &str) -> bool {
        let moved = self
            .inner
            .transition(id, SessionState::Errored, Some(message.to_string()));
        if moved {
            log::warn!("session {}: script error: {}", id, message);
        }
        moved
    }

    /// A message was posted to the host window by `source`.
    ///
    /// Returns whether it was accepted and applied as a resize.
    pub fn handle_message(&self, source: &Arc<dyn IsolatedContext>, data: &Value) -> bool {
        let Some(report) = self.inner.bridge.route(source, data) else {
            return false;
        };
        let (container, container_id) = {
            let Some(mut slot) = self.inner.sessions.get_mut(&report.session) else {
                return false;
            };
            slot.session.height = Some(report.height);
            (Arc::clone(&slot.container), slot.session.container.clone())
        };
        container.set_height(report.height);
        self.inner.notify(&HostEvent::Resized {
            session: report.session,
            container: container_id,
            height: report.height,
        });
        true
    }

    pub fn session(&self, id: SessionId) -> Option<RenderSession> {
        self.inner.sessions.get(&id).map(|slot| slot.session.clone())
    }

    pub fn session_for_container(&self, container: &ContainerId) -> Option<SessionId> {
        self.inner.by_container.get(container).map(|entry| *entry.value())
    }

    /// Sessions currently holding an isolated context.
    pub fn session_count(&self) -> usize {
        self.inner.sessions.len()
    }

    pub fn listener_count(&self) -> usize {
        self.inner.bridge.listener_count()
    }

    pub fn has_pending_timeout(&self, id: SessionId) -> bool {
        self.inner
            .sessions
            .get(&id)
            .is_some_and(|slot| slot.timer.is_some())
    }
}
