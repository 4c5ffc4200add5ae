use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use vitrine_core::{
    document_for, Category, ComponentRecord, MarkupPayload, PlaceholderMap, PreviewConfig,
    RenderDecision, SessionState, SynthesisOptions,
};
use vitrine_host::{
    CapabilityPolicy, Container, ContainerId, ContextFactory, HostError, HostEvent, HostResult,
    HostSettings, InspectOverlay, IsolatedContext, PreviewGrid, RenderHost, SessionObserver,
};

// Platform stubs

struct StubContainer {
    id: ContainerId,
    heights: Mutex<Vec<u32>>,
}

impl StubContainer {
    fn new(id: &str) -> Arc<Self> {
        Arc::new(Self {
            id: ContainerId::new(id),
            heights: Mutex::new(Vec::new()),
        })
    }

    fn heights(&self) -> Vec<u32> {
        self.heights.lock().unwrap().clone()
    }
}

impl Container for StubContainer {
    fn id(&self) -> ContainerId {
        self.id.clone()
    }

    fn set_height(&self, height_px: u32) {
        self.heights.lock().unwrap().push(height_px);
    }
}

#[derive(Default)]
struct StubContext {
    documents: Mutex<Vec<String>>,
    detached: AtomicBool,
    fail_load: bool,
}

impl StubContext {
    fn document(&self) -> String {
        self.documents.lock().unwrap().last().cloned().unwrap_or_default()
    }

    fn is_detached(&self) -> bool {
        self.detached.load(Ordering::SeqCst)
    }
}

impl IsolatedContext for StubContext {
    fn load_document(&self, document: &str) -> HostResult<()> {
        if self.fail_load {
            return Err(HostError::DocumentLoad("srcdoc rejected".to_string()));
        }
        self.documents.lock().unwrap().push(document.to_string());
        Ok(())
    }

    fn detach(&self) {
        self.detached.store(true, Ordering::SeqCst);
    }
}

#[derive(Default)]
struct StubFactory {
    created: Mutex<Vec<Arc<StubContext>>>,
    tokens: Mutex<Vec<String>>,
    fail_create: bool,
    fail_load: bool,
}

impl StubFactory {
    fn context(&self, index: usize) -> Arc<StubContext> {
        Arc::clone(&self.created.lock().unwrap()[index])
    }

    fn source(&self, index: usize) -> Arc<dyn IsolatedContext> {
        self.context(index)
    }

    fn created_count(&self) -> usize {
        self.created.lock().unwrap().len()
    }
}

impl ContextFactory for StubFactory {
    fn create(
        &self,
        _container: &dyn Container,
        policy: &CapabilityPolicy,
    ) -> HostResult<Arc<dyn IsolatedContext>> {
        self.tokens.lock().unwrap().push(policy.sandbox_tokens());
        if self.fail_create {
            return Err(HostError::ContextCreation("no document body".to_string()));
        }
        let context = Arc::new(StubContext {
            fail_load: self.fail_load,
            ..StubContext::default()
        });
        self.created.lock().unwrap().push(Arc::clone(&context));
        let handle: Arc<dyn IsolatedContext> = context;
        Ok(handle)
    }
}

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<HostEvent>>,
}

impl SessionObserver for Recorder {
    fn on_event(&self, event: &HostEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

fn host_with(factory: StubFactory) -> (RenderHost, Arc<StubFactory>) {
    let factory = Arc::new(factory);
    let host = RenderHost::new(factory.clone(), HostSettings::default()).unwrap();
    (host, factory)
}

fn stub_host() -> (RenderHost, Arc<StubFactory>) {
    host_with(StubFactory::default())
}

fn live_record(id: &str) -> ComponentRecord {
    ComponentRecord::new(id, MarkupPayload::text("<div class=\"card\">x</div>"))
        .with_language("HTML")
}

fn resize(height: f64) -> serde_json::Value {
    json!({ "type": "resize", "height": height })
}

// Capability policy

#[test]
fn test_contexts_get_scripts_only() {
    let (host, factory) = stub_host();
    host.mount(StubContainer::new("card-0"), "rec", "<p></p>");
    assert_eq!(*factory.tokens.lock().unwrap(), vec!["allow-scripts".to_string()]);
}

#[test]
fn test_unsafe_policy_is_refused() {
    let settings = HostSettings {
        policy: CapabilityPolicy {
            allow_same_origin: true,
            ..CapabilityPolicy::isolated()
        },
        ..HostSettings::default()
    };
    let result = RenderHost::new(Arc::new(StubFactory::default()), settings);
    assert!(matches!(result, Err(HostError::UnsafePolicy(msg)) if msg.contains("same-origin")));
}

#[test]
fn test_settings_from_config() {
    let config =
        PreviewConfig::from_yaml_str("load_timeout_ms: 250\nmax_content_height: 600\n").unwrap();
    let settings = HostSettings::from_config(&config);
    assert_eq!(settings.load_timeout, Duration::from_millis(250));
    assert_eq!(settings.max_content_height, 600);
    assert_eq!(settings.policy, CapabilityPolicy::isolated());

    let factory = Arc::new(StubFactory::default());
    let host = RenderHost::new(factory.clone(), settings).unwrap();
    let container = StubContainer::new("card-0");
    host.mount(container.clone(), "rec", "<p></p>");
    host.handle_message(&factory.source(0), &resize(900.0));
    assert_eq!(container.heights(), vec![600]);
}

// Session lifecycle

#[test]
fn test_mount_then_load() {
    let (host, factory) = stub_host();
    let id = host.mount(StubContainer::new("card-0"), "rec", "<p>doc</p>");

    assert_eq!(host.session(id).unwrap().state, SessionState::Initializing);
    assert_eq!(factory.context(0).document(), "<p>doc</p>");

    assert!(host.handle_load(id));
    assert_eq!(host.session(id).unwrap().state, SessionState::Loaded);
    assert!(!host.handle_script_error(id, "too late"));
    assert_eq!(host.session(id).unwrap().state, SessionState::Loaded);
}

#[test]
fn test_script_error_before_load() {
    let (host, _) = stub_host();
    let id = host.mount(StubContainer::new("card-0"), "rec", "<p></p>");
    assert!(host.handle_script_error(id, "ReferenceError: foo is not defined"));

    let session = host.session(id).unwrap();
    assert_eq!(session.state, SessionState::Errored);
    assert_eq!(
        session.last_error.as_deref(),
        Some("ReferenceError: foo is not defined")
    );
    assert!(!host.handle_load(id));
}

#[test]
fn test_context_creation_failure_is_errored() {
    let (host, _) = host_with(StubFactory {
        fail_create: true,
        ..StubFactory::default()
    });
    let id = host.mount(StubContainer::new("card-0"), "rec", "<p></p>");

    let session = host.session(id).unwrap();
    assert_eq!(session.state, SessionState::Errored);
    assert!(session.last_error.unwrap().contains("no document body"));
    assert_eq!(host.listener_count(), 0);
}

#[test]
fn test_document_load_failure_is_errored() {
    let (host, _) = host_with(StubFactory {
        fail_load: true,
        ..StubFactory::default()
    });
    let id = host.mount(StubContainer::new("card-0"), "rec", "<p></p>");
    assert_eq!(host.session(id).unwrap().state, SessionState::Errored);
}

#[tokio::test(start_paused = true)]
async fn test_load_timeout_errors_session() {
    let (host, _) = stub_host();
    let id = host.mount(StubContainer::new("card-0"), "rec", "<p></p>");
    assert!(host.has_pending_timeout(id));

    tokio::time::sleep(Duration::from_secs(6)).await;

    let session = host.session(id).unwrap();
    assert_eq!(session.state, SessionState::Errored);
    assert!(session.last_error.unwrap().contains("5000ms"));
    assert!(!host.has_pending_timeout(id));
}

#[tokio::test(start_paused = true)]
async fn test_load_cancels_timeout() {
    let (host, _) = stub_host();
    let id = host.mount(StubContainer::new("card-0"), "rec", "<p></p>");
    assert!(host.handle_load(id));
    assert!(!host.has_pending_timeout(id));

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(host.session(id).unwrap().state, SessionState::Loaded);
}

#[test]
fn test_no_runtime_means_no_timeout() {
    let (host, _) = stub_host();
    let id = host.mount(StubContainer::new("card-0"), "rec", "<p></p>");
    assert!(!host.has_pending_timeout(id));
    assert_eq!(host.session(id).unwrap().state, SessionState::Initializing);
}

#[test]
fn test_remount_same_container_tears_down_previous() {
    let (host, factory) = stub_host();
    let container = StubContainer::new("card-0");
    let first = host.mount(container.clone(), "a", "<p>a</p>");
    let second = host.mount(container.clone(), "b", "<p>b</p>");

    assert!(factory.context(0).is_detached());
    assert!(!factory.context(1).is_detached());
    assert_eq!(host.session(first), None);
    assert_eq!(host.session_for_container(&container.id()), Some(second));
    assert_eq!(host.session_count(), 1);
    assert_eq!(host.listener_count(), 1);
}

#[test]
fn test_unmount_returns_destroyed_session() {
    let (host, factory) = stub_host();
    let container = StubContainer::new("card-0");
    let id = host.mount(container.clone(), "rec", "<p></p>");

    let session = host.unmount(id).unwrap();
    assert_eq!(session.state, SessionState::Destroyed);
    assert!(factory.context(0).is_detached());
    assert_eq!(host.session_for_container(&container.id()), None);
    assert_eq!(host.unmount(id), None);
}

#[test]
fn test_observer_sees_events_in_order() {
    let (host, factory) = stub_host();
    let recorder = Arc::new(Recorder::default());
    let observer: Arc<dyn SessionObserver> = recorder.clone();
    host.observe(&observer);

    let container = StubContainer::new("card-0");
    let id = host.mount(container.clone(), "rec", "<p></p>");
    host.handle_load(id);
    host.handle_message(&factory.source(0), &resize(120.0));
    host.unmount(id);

    let state = |state| HostEvent::StateChanged {
        session: id,
        container: container.id(),
        record_id: "rec".to_string(),
        state,
    };
    assert_eq!(
        *recorder.events.lock().unwrap(),
        vec![
            state(SessionState::Initializing),
            state(SessionState::Loaded),
            HostEvent::Resized {
                session: id,
                container: container.id(),
                height: 120,
            },
            state(SessionState::Destroyed),
        ]
    );
}

#[test]
fn test_dropped_observer_is_not_called() {
    let (host, _) = stub_host();
    let recorder = Arc::new(Recorder::default());
    {
        let observer: Arc<dyn SessionObserver> = recorder.clone();
        host.observe(&observer);
    }
    drop(recorder);
    host.mount(StubContainer::new("card-0"), "rec", "<p></p>");
    assert_eq!(host.session_count(), 1);
}

// Autosize bridge

#[test]
fn test_synthesized_document_reports_height() {
    let (host, factory) = stub_host();
    let container = StubContainer::new("card-0");
    let record = live_record("btn");
    let id = host.mount(
        container.clone(),
        &record.identifier,
        &document_for(&record, &SynthesisOptions::default()),
    );
    host.handle_load(id);

    // What the injected script posts on load.
    let document = factory.context(0).document();
    assert!(document.contains("window.parent.postMessage"));
    assert!(document.contains("type: 'resize'"));

    assert!(host.handle_message(&factory.source(0), &resize(312.4)));
    assert_eq!(container.heights(), vec![313]);
    assert_eq!(host.session(id).unwrap().height, Some(313));
}

#[test]
fn test_height_is_clamped() {
    let (host, factory) = stub_host();
    let container = StubContainer::new("card-0");
    let id = host.mount(container.clone(), "rec", "<p></p>");

    assert!(host.handle_message(&factory.source(0), &resize(5000.0)));
    assert!(host.handle_message(&factory.source(0), &resize(-40.0)));
    assert_eq!(container.heights(), vec![1000, 0]);
    assert_eq!(host.session(id).unwrap().height, Some(0));
}

#[test]
fn test_forged_message_is_discarded() {
    let (host, _) = stub_host();
    let container = StubContainer::new("card-0");
    host.mount(container.clone(), "rec", "<p></p>");

    let forged: Arc<dyn IsolatedContext> = Arc::new(StubContext::default());
    assert!(!host.handle_message(&forged, &resize(400.0)));
    assert!(container.heights().is_empty());
}

#[test]
fn test_malformed_message_is_ignored() {
    let (host, factory) = stub_host();
    let container = StubContainer::new("card-0");
    host.mount(container.clone(), "rec", "<p></p>");

    assert!(!host.handle_message(&factory.source(0), &json!({"type": "resize", "height": "9e9px"})));
    assert!(!host.handle_message(&factory.source(0), &json!({"height": 10})));
    assert!(container.heights().is_empty());
}

#[test]
fn test_messages_after_unmount_are_ignored() {
    let (host, factory) = stub_host();
    let container = StubContainer::new("card-0");
    let id = host.mount(container.clone(), "rec", "<p></p>");
    let source = factory.source(0);

    host.unmount(id);
    assert_eq!(host.listener_count(), 0);
    assert!(!host.handle_message(&source, &resize(200.0)));
    assert!(!host.handle_load(id));
    assert!(container.heights().is_empty());
}

#[test]
fn test_messages_route_to_their_own_session() {
    let (host, factory) = stub_host();
    let a = StubContainer::new("card-a");
    let b = StubContainer::new("card-b");
    host.mount(a.clone(), "a", "<p></p>");
    host.mount(b.clone(), "b", "<p></p>");

    host.handle_message(&factory.source(1), &resize(80.0));
    host.handle_message(&factory.source(0), &resize(40.0));
    assert_eq!(a.heights(), vec![40]);
    assert_eq!(b.heights(), vec![80]);
}

// Preview grid

fn grid(host: &RenderHost, max_live: usize) -> PreviewGrid {
    PreviewGrid::new(
        host.clone(),
        SynthesisOptions::default(),
        PlaceholderMap::default(),
        max_live,
    )
}

#[test]
fn test_grid_falls_back_after_error() {
    let (host, _) = stub_host();
    let grid = grid(&host, 8);
    let mut decisions = grid.subscribe();
    let container = StubContainer::new("card-0");
    let record = live_record("btn").with_images(vec!["https://cdn.example.com/btn.png".to_string()]);

    assert_eq!(grid.mount_card(container.clone(), record), RenderDecision::LiveRender);
    let sid = grid.session(&container.id()).unwrap();
    host.handle_script_error(sid, "boom");

    let fallback = RenderDecision::StaticImage("https://cdn.example.com/btn.png".to_string());
    assert_eq!(grid.decision(&container.id()), Some(fallback.clone()));
    assert_eq!(decisions.try_recv().unwrap().decision, RenderDecision::LiveRender);
    let change = decisions.try_recv().unwrap();
    assert_eq!(change.record_id, "btn");
    assert_eq!(change.decision, fallback);
    assert!(decisions.try_recv().is_err());
}

#[test]
fn test_grid_load_does_not_rebroadcast() {
    let (host, _) = stub_host();
    let grid = grid(&host, 8);
    let mut decisions = grid.subscribe();
    let container = StubContainer::new("card-0");
    grid.mount_card(container.clone(), live_record("btn"));
    host.handle_load(grid.session(&container.id()).unwrap());

    assert_eq!(decisions.try_recv().unwrap().decision, RenderDecision::LiveRender);
    assert!(decisions.try_recv().is_err());
}

#[test]
fn test_grid_empty_content_never_mounts() {
    let (host, factory) = stub_host();
    let grid = grid(&host, 8);
    let container = StubContainer::new("card-0");
    let record = ComponentRecord::new("empty", MarkupPayload::Missing).with_category(Category::Forms);

    assert_eq!(
        grid.mount_card(container.clone(), record),
        RenderDecision::CategoryPlaceholder("/img/placeholders/forms.svg".to_string())
    );
    assert_eq!(grid.session(&container.id()), None);
    assert_eq!(factory.created_count(), 0);
}

#[test]
fn test_grid_same_record_is_noop() {
    let (host, factory) = stub_host();
    let grid = grid(&host, 8);
    let container = StubContainer::new("card-0");
    grid.mount_card(container.clone(), live_record("btn"));
    let first = grid.session(&container.id());
    grid.mount_card(container.clone(), live_record("btn"));

    assert_eq!(grid.session(&container.id()), first);
    assert_eq!(factory.created_count(), 1);
}

#[test]
fn test_grid_new_record_replaces_session() {
    let (host, factory) = stub_host();
    let grid = grid(&host, 8);
    let container = StubContainer::new("card-0");
    grid.mount_card(container.clone(), live_record("a"));
    grid.mount_card(container.clone(), live_record("b"));

    assert!(factory.context(0).is_detached());
    assert_eq!(host.session_count(), 1);
    assert_eq!(grid.card_count(), 1);
}

#[test]
fn test_grid_cap_defers_and_promotes() {
    let (host, _) = stub_host();
    let grid = grid(&host, 2);
    let mut decisions = grid.subscribe();
    let cards: Vec<_> = (0..3)
        .map(|i| StubContainer::new(&format!("card-{}", i)))
        .collect();
    let deferred_record =
        live_record("c").with_images(vec!["https://cdn.example.com/c.png".to_string()]);

    grid.mount_card(cards[0].clone(), live_record("a"));
    grid.mount_card(cards[1].clone(), live_record("b"));
    assert_eq!(
        grid.mount_card(cards[2].clone(), deferred_record),
        RenderDecision::StaticImage("https://cdn.example.com/c.png".to_string())
    );
    assert!(grid.is_deferred(&cards[2].id()));
    assert_eq!(grid.live_session_count(), 2);
    assert_eq!(host.session_count(), 2);
    for _ in 0..3 {
        decisions.try_recv().unwrap();
    }

    assert!(grid.unmount_card(&cards[0].id()));
    assert!(!grid.is_deferred(&cards[2].id()));
    assert!(grid.session(&cards[2].id()).is_some());
    assert_eq!(grid.decision(&cards[2].id()), Some(RenderDecision::LiveRender));

    let promoted = decisions.try_recv().unwrap();
    assert_eq!(promoted.container, cards[2].id());
    assert_eq!(promoted.decision, RenderDecision::LiveRender);
}

#[test]
fn test_grid_errored_session_frees_its_slot() {
    let (host, factory) = stub_host();
    let grid = grid(&host, 1);
    let a = StubContainer::new("card-a");
    let b = StubContainer::new("card-b");
    let failing = live_record("a").with_images(vec!["https://cdn.example.com/a.png".to_string()]);

    grid.mount_card(a.clone(), failing);
    grid.mount_card(b.clone(), live_record("b"));
    assert!(grid.is_deferred(&b.id()));

    let sid = grid.session(&a.id()).unwrap();
    host.handle_script_error(sid, "TypeError: x is undefined");

    assert_eq!(
        grid.decision(&a.id()),
        Some(RenderDecision::StaticImage("https://cdn.example.com/a.png".to_string()))
    );
    assert_eq!(grid.session(&a.id()), None);
    assert!(factory.context(0).is_detached());

    assert!(!grid.is_deferred(&b.id()));
    assert!(grid.session(&b.id()).is_some());
    assert_eq!(grid.decision(&b.id()), Some(RenderDecision::LiveRender));
    assert_eq!(grid.live_session_count(), 1);
    assert_eq!(host.session_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_grid_timed_out_session_frees_its_slot() {
    let (host, _) = stub_host();
    let grid = grid(&host, 1);
    let a = StubContainer::new("card-a");
    let b = StubContainer::new("card-b");
    grid.mount_card(a.clone(), live_record("a"));
    grid.mount_card(b.clone(), live_record("b"));

    tokio::time::sleep(Duration::from_secs(6)).await;

    assert_eq!(grid.session(&a.id()), None);
    assert_eq!(grid.decision(&a.id()), Some(RenderDecision::EmptyPlaceholder));
    assert_eq!(grid.decision(&b.id()), Some(RenderDecision::LiveRender));
    assert!(!grid.is_deferred(&b.id()));
}

#[test]
fn test_grid_context_failure_holds_no_slot() {
    let (host, _) = host_with(StubFactory {
        fail_create: true,
        ..StubFactory::default()
    });
    let grid = grid(&host, 1);
    let mut decisions = grid.subscribe();
    let container = StubContainer::new("card-0");
    let record = live_record("a").with_category(Category::Media);

    assert_eq!(
        grid.mount_card(container.clone(), record),
        RenderDecision::CategoryPlaceholder("/img/placeholders/media.svg".to_string())
    );
    assert_eq!(grid.session(&container.id()), None);
    assert_eq!(grid.live_session_count(), 0);
    assert_eq!(host.session_count(), 0);
    assert!(!decisions.try_recv().unwrap().decision.is_live());
    assert!(decisions.try_recv().is_err());
}

#[test]
fn test_grid_unmount_deferred_card() {
    let (host, _) = stub_host();
    let grid = grid(&host, 1);
    let a = StubContainer::new("card-a");
    let b = StubContainer::new("card-b");
    grid.mount_card(a.clone(), live_record("a"));
    grid.mount_card(b.clone(), live_record("b"));
    assert!(grid.is_deferred(&b.id()));

    assert!(grid.unmount_card(&b.id()));
    assert!(!grid.is_deferred(&b.id()));
    assert!(!grid.unmount_card(&b.id()));
    assert_eq!(grid.live_session_count(), 1);
}

#[test]
fn test_grid_drop_unmounts_sessions() {
    let (host, factory) = stub_host();
    {
        let grid = grid(&host, 8);
        grid.mount_card(StubContainer::new("card-0"), live_record("a"));
        grid.mount_card(StubContainer::new("card-1"), live_record("b"));
        assert_eq!(host.session_count(), 2);
    }
    assert_eq!(host.session_count(), 0);
    assert!(factory.context(0).is_detached());
    assert!(factory.context(1).is_detached());
}

// Inspect overlay

fn overlay(host: &RenderHost) -> InspectOverlay {
    InspectOverlay::new(host.clone(), SynthesisOptions::default(), PlaceholderMap::default())
}

#[test]
fn test_overlay_is_single_instance() {
    let (host, factory) = stub_host();
    let overlay = overlay(&host);
    let first = overlay.open(StubContainer::new("overlay-a"), &live_record("a"));
    let second = overlay.open(StubContainer::new("overlay-b"), &live_record("b"));

    assert_eq!(host.session(first.session.unwrap()), None);
    assert!(factory.context(0).is_detached());
    assert_eq!(host.session_count(), 1);
    assert_eq!(overlay.current().unwrap().record_id, "b");
    assert_eq!(second.decision, RenderDecision::LiveRender);
}

#[test]
fn test_overlapping_opens_leave_one_session() {
    let (host, factory) = stub_host();
    let overlay = overlay(&host);
    let barrier = std::sync::Barrier::new(8);

    std::thread::scope(|scope| {
        for i in 0..8 {
            let overlay = &overlay;
            let barrier = &barrier;
            scope.spawn(move || {
                barrier.wait();
                overlay.open(
                    StubContainer::new(&format!("overlay-{}", i)),
                    &live_record(&format!("r{}", i)),
                );
            });
        }
    });

    assert_eq!(factory.created_count(), 8);
    assert_eq!(host.session_count(), 1);
    let current = overlay.current().unwrap();
    assert!(host.session(current.session.unwrap()).is_some());
    let detached = (0..8).filter(|i| factory.context(*i).is_detached()).count();
    assert_eq!(detached, 7);
}

#[test]
fn test_overlay_code_panes() {
    let (host, _) = stub_host();
    let overlay = overlay(&host);
    let record = ComponentRecord::new("pair", MarkupPayload::pair("<b>hi</b>", "b{color:red}"))
        .with_title("Bold");
    let view = overlay.open(StubContainer::new("overlay"), &record);

    assert_eq!(view.title, "Bold");
    assert_eq!(view.code.html.source, "<b>hi</b>");
    assert_eq!(view.code.css.as_ref().unwrap().source, "b{color:red}");
    assert!(!view.code.to_html().contains("<b>"));
}

#[test]
fn test_overlay_empty_content_mounts_nothing() {
    let (host, factory) = stub_host();
    let overlay = overlay(&host);
    let record = ComponentRecord::new("empty", MarkupPayload::Missing);
    let view = overlay.open(StubContainer::new("overlay"), &record);

    assert_eq!(view.session, None);
    assert_eq!(view.decision, RenderDecision::EmptyPlaceholder);
    assert_eq!(factory.created_count(), 0);
}

#[test]
fn test_overlay_decision_follows_session() {
    let (host, _) = stub_host();
    let overlay = overlay(&host);
    let record = live_record("a").with_images(vec!["https://cdn.example.com/a.png".to_string()]);
    let view = overlay.open(StubContainer::new("overlay"), &record);

    host.handle_script_error(view.session.unwrap(), "boom");
    assert_eq!(
        overlay.decision(),
        Some(RenderDecision::StaticImage("https://cdn.example.com/a.png".to_string()))
    );
}

#[test]
fn test_overlay_close() {
    let (host, factory) = stub_host();
    let overlay = overlay(&host);
    overlay.open(StubContainer::new("overlay"), &live_record("a"));

    assert!(overlay.close());
    assert!(!overlay.close());
    assert!(!overlay.is_open());
    assert_eq!(host.session_count(), 0);
    assert!(factory.context(0).is_detached());
}
