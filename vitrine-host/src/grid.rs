//! Preview grid: the mount/unmount API the catalog views call per card.
//!
//! Each card is keyed by its container. The grid keeps the card's decision
//! in sync with its session and broadcasts [`DecisionChanged`] so the view
//! can show the expand affordance only while a live render is active.
//! Live sessions are capped; cards over the cap show their static fallback
//! and are promoted in arrival order as live cards go away. A session that
//! errors gives its slot back: the card keeps its fallback and the context
//! is released.

use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;
use vitrine_core::{
    normalize, resolve, resolve_static, synthesize, ComponentRecord, NormalizedContent,
    PlaceholderMap, PreviewConfig, RenderDecision, SessionState, SynthesisOptions,
};

use crate::context::{Container, ContainerId};
use crate::host::{HostEvent, RenderHost, SessionObserver};
use crate::session::SessionId;

const DECISION_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub struct DecisionChanged {
    pub container: ContainerId,
    pub record_id: String,
    pub decision: RenderDecision,
}

struct Card {
    record: ComponentRecord,
    content: NormalizedContent,
    container: Arc<dyn Container>,
    session: Option<SessionId>,
    decision: RenderDecision,
}

struct GridState {
    host: RenderHost,
    options: SynthesisOptions,
    placeholders: PlaceholderMap,
    max_live_sessions: usize,
    cards: DashMap<ContainerId, Card>,
    by_session: DashMap<SessionId, ContainerId>,
    deferred: Mutex<VecDeque<ContainerId>>,
    decisions: broadcast::Sender<DecisionChanged>,
}

impl GridState {
    fn publish(&self, change: DecisionChanged) {
        log::debug!(
            "container {}: decision {:?}",
            change.container,
            change.decision
        );
        let _ = self.decisions.send(change);
    }

    /// Store a new decision for a card, publishing it if it differs.
    fn update_decision(&self, container: &ContainerId, decision: RenderDecision) {
        let change = {
            let Some(mut card) = self.cards.get_mut(container) else {
                return;
            };
            if card.decision == decision {
                return;
            }
            card.decision = decision.clone();
            DecisionChanged {
                container: container.clone(),
                record_id: card.record.identifier.clone(),
                decision,
            }
        };
        self.publish(change);
    }

    fn deferred(&self) -> MutexGuard<'_, VecDeque<ContainerId>> {
        self.deferred.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn live_session_count(&self) -> usize {
        self.cards
            .iter()
            .filter(|card| card.session.is_some())
            .count()
    }

    fn session_state(&self, session: SessionId) -> SessionState {
        self.host
            .session(session)
            .map(|s| s.state)
            .unwrap_or(SessionState::Destroyed)
    }

    /// Mount a session for content that is known to be non-empty.
    fn start_session(
        &self,
        container: &Arc<dyn Container>,
        record: &ComponentRecord,
        content: &NormalizedContent,
    ) -> SessionId {
        let document = synthesize(content, &self.options.for_record(record));
        self.host
            .mount(Arc::clone(container), &record.identifier, &document)
    }

    /// Start following a card's session. Catches up with any transition the
    /// session made before it was tracked.
    fn track(&self, container: &ContainerId, session: SessionId) {
        self.by_session.insert(session, container.clone());
        self.apply_state(container, session, self.session_state(session));
    }

    fn apply_state(&self, container: &ContainerId, session: SessionId, state: SessionState) {
        let decision = match self.cards.get(container) {
            Some(card) if card.session == Some(session) => {
                resolve(&card.record, state, &self.placeholders)
            }
            _ => return,
        };
        self.update_decision(container, decision);
        if state == SessionState::Errored {
            self.release(container, session);
        }
    }

    /// Drop an errored session: the card keeps its fallback decision and its
    /// slot goes to the next deferred card.
    fn release(&self, container: &ContainerId, session: SessionId) {
        self.by_session.remove(&session);
        if let Some(mut card) = self.cards.get_mut(container) {
            if card.session == Some(session) {
                card.session = None;
            }
        }
        log::debug!("container {}: releasing errored session {}", container, session);
        self.host.unmount(session);
        self.promote_deferred();
    }

    fn promote_deferred(&self) {
        while self.live_session_count() < self.max_live_sessions {
            let Some(next) = self.deferred().pop_front() else {
                break;
            };
            let pending = self
                .cards
                .get(&next)
                .filter(|card| card.session.is_none())
                .map(|card| {
                    (
                        Arc::clone(&card.container),
                        card.record.clone(),
                        card.content.clone(),
                    )
                });
            let Some((container, record, content)) = pending else {
                continue;
            };

            log::debug!("container {}: promoted to live render", next);
            let sid = self.start_session(&container, &record, &content);
            match self.cards.get_mut(&next) {
                Some(mut card) => card.session = Some(sid),
                None => {
                    self.host.unmount(sid);
                    continue;
                }
            }
            self.track(&next, sid);
        }
    }
}

impl SessionObserver for GridState {
    fn on_event(&self, event: &HostEvent) {
        if let HostEvent::StateChanged { session, state, .. } = event {
            let container = self.by_session.get(session).map(|entry| entry.value().clone());
            if let Some(container) = container {
                self.apply_state(&container, *session, *state);
            }
        }
    }
}

pub struct PreviewGrid {
    state: Arc<GridState>,
}

impl PreviewGrid {
    pub fn new(
        host: RenderHost,
        options: SynthesisOptions,
        placeholders: PlaceholderMap,
        max_live_sessions: usize,
    ) -> Self {
        let (decisions, _) = broadcast::channel(DECISION_CHANNEL_CAPACITY);
        let state = Arc::new(GridState {
            host,
            options,
            placeholders,
            max_live_sessions: max_live_sessions.max(1),
            cards: DashMap::new(),
            by_session: DashMap::new(),
            deferred: Mutex::new(VecDeque::new()),
            decisions,
        });
        let observer: Arc<dyn SessionObserver> = state.clone();
        state.host.observe(&observer);
        Self { state }
    }

    pub fn from_config(host: RenderHost, config: &PreviewConfig) -> Self {
        Self::new(
            host,
            config.synthesis_options(),
            config.placeholder_map(),
            config.max_live_sessions,
        )
    }

    pub fn host(&self) -> &RenderHost {
        &self.state.host
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DecisionChanged> {
        self.state.decisions.subscribe()
    }

    /// Show `record` in `container`.
    ///
    /// Re-mounting the same record identifier is a no-op. A different record
    /// replaces the previous card, tearing its session down first.
    pub fn mount_card(&self, container: Arc<dyn Container>, record: ComponentRecord) -> RenderDecision {
        let id = container.id();
        if let Some(card) = self.state.cards.get(&id) {
            if card.record.identifier == record.identifier {
                return card.decision.clone();
            }
        }
        self.unmount_card(&id);

        let content = normalize(&record);
        let mut session = None;
        let decision = if content.is_empty() {
            resolve_static(&record, &self.state.placeholders)
        } else if self.state.live_session_count() >= self.state.max_live_sessions {
            log::debug!("container {}: live session cap reached, deferring", id);
            self.state.deferred().push_back(id.clone());
            resolve_static(&record, &self.state.placeholders)
        } else {
            let sid = self.state.start_session(&container, &record, &content);
            session = Some(sid);
            resolve(&record, self.state.session_state(sid), &self.state.placeholders)
        };

        self.state.cards.insert(
            id.clone(),
            Card {
                record: record.clone(),
                content,
                container,
                session,
                decision: decision.clone(),
            },
        );
        self.state.publish(DecisionChanged {
            container: id.clone(),
            record_id: record.identifier,
            decision,
        });
        if let Some(sid) = session {
            self.state.track(&id, sid);
        }
        self.decision(&id).unwrap_or(RenderDecision::EmptyPlaceholder)
    }

    /// Remove a card. Returns false when the container had none.
    pub fn unmount_card(&self, id: &ContainerId) -> bool {
        let Some((_, card)) = self.state.cards.remove(id) else {
            return false;
        };
        self.state.deferred().retain(|c| c != id);
        if let Some(sid) = card.session {
            self.state.by_session.remove(&sid);
            self.state.host.unmount(sid);
            self.state.promote_deferred();
        }
        true
    }

    pub fn decision(&self, id: &ContainerId) -> Option<RenderDecision> {
        self.state.cards.get(id).map(|card| card.decision.clone())
    }

    pub fn session(&self, id: &ContainerId) -> Option<SessionId> {
        self.state.cards.get(id).and_then(|card| card.session)
    }

    pub fn is_deferred(&self, id: &ContainerId) -> bool {
        self.state.deferred().contains(id)
    }

    pub fn card_count(&self) -> usize {
        self.state.cards.len()
    }

    /// Cards currently holding a session (initializing or loaded).
    pub fn live_session_count(&self) -> usize {
        self.state.live_session_count()
    }
}

impl Drop for PreviewGrid {
    fn drop(&mut self) {
        let sessions: Vec<SessionId> = self
            .state
            .cards
            .iter()
            .filter_map(|card| card.session)
            .collect();
        self.state.cards.clear();
        self.state.by_session.clear();
        self.state.deferred().clear();
        for sid in sessions {
            self.state.host.unmount(sid);
        }
    }
}
