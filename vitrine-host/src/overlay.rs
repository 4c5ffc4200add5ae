//! Expand/Inspect overlay.
//!
//! One overlay at a time: a larger live render of a record through the same
//! synthesizer and host as the grid, next to a read-only code view of the
//! normalized source.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use vitrine_core::{
    normalize, resolve, synthesize, ComponentRecord, NormalizedContent, PlaceholderMap,
    PreviewConfig, RenderDecision, SessionState, SynthesisOptions,
};

use crate::context::Container;
use crate::highlight::{escape_html, highlight, highlight_css};
use crate::host::RenderHost;
use crate::session::SessionId;

/// One highlighted source pane.
#[derive(Debug, Clone, PartialEq)]
pub struct CodePane {
    pub language: String,
    pub source: String,
    /// `hl-` classed spans; every character of `source` is escaped.
    pub highlighted: String,
}

impl CodePane {
    pub fn new(language: &str, source: &str) -> Self {
        Self {
            language: language.to_string(),
            source: source.to_string(),
            highlighted: highlight(language, source),
        }
    }

    fn to_html(&self) -> String {
        format!(
            "<pre class=\"vitrine-code\" data-language=\"{}\"><code>{}</code></pre>",
            escape_html(&self.language),
            self.highlighted
        )
    }
}

/// Read-only code panes: HTML always, CSS when the content is a pair.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeView {
    pub html: CodePane,
    pub css: Option<CodePane>,
}

impl CodeView {
    pub fn from_content(content: &NormalizedContent) -> Self {
        Self {
            html: CodePane::new("html", &content.html),
            css: content
                .is_paired()
                .then(|| CodePane::new("css", &content.css)),
        }
    }

    pub fn stylesheet() -> &'static str {
        highlight_css()
    }

    /// Markup for the panes. Contains no executable elements or handlers.
    pub fn to_html(&self) -> String {
        let mut out = self.html.to_html();
        if let Some(css) = &self.css {
            out.push_str(&css.to_html());
        }
        out
    }
}

/// What the overlay is currently showing.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlaySession {
    pub record_id: String,
    pub title: String,
    /// `None` when the content was empty and nothing was mounted.
    pub session: Option<SessionId>,
    pub decision: RenderDecision,
    pub code: CodeView,
}

struct OpenOverlay {
    record: ComponentRecord,
    view: OverlaySession,
}

pub struct InspectOverlay {
    host: RenderHost,
    options: SynthesisOptions,
    placeholders: PlaceholderMap,
    current: Mutex<Option<OpenOverlay>>,
}

impl InspectOverlay {
    pub fn new(host: RenderHost, options: SynthesisOptions, placeholders: PlaceholderMap) -> Self {
        Self {
            host,
            options,
            placeholders,
            current: Mutex::new(None),
        }
    }

    pub fn from_config(host: RenderHost, config: &PreviewConfig) -> Self {
        Self::new(host, config.synthesis_options(), config.placeholder_map())
    }

    fn current_guard(&self) -> MutexGuard<'_, Option<OpenOverlay>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn state_of(&self, session: Option<SessionId>) -> SessionState {
        session
            .and_then(|id| self.host.session(id))
            .map(|s| s.state)
            .unwrap_or(SessionState::Destroyed)
    }

    /// Show `record` in `container`, closing any overlay already open.
    ///
    /// The current slot stays locked from teardown to store, so overlapping
    /// calls cannot leave an unreachable session mounted.
    pub fn open(&self, container: Arc<dyn Container>, record: &ComponentRecord) -> OverlaySession {
        let mut current = self.current_guard();
        if let Some(previous) = current.take() {
            self.teardown(previous);
        }

        let content = normalize(record);
        let session = if content.is_empty() {
            None
        } else {
            let document = synthesize(&content, &self.options.for_record(record));
            Some(self.host.mount(container, &record.identifier, &document))
        };
        let decision = resolve(record, self.state_of(session), &self.placeholders);
        log::debug!("overlay opened for {}: {:?}", record.identifier, decision);

        let view = OverlaySession {
            record_id: record.identifier.clone(),
            title: record.title.clone(),
            session,
            decision,
            code: CodeView::from_content(&content),
        };
        *current = Some(OpenOverlay {
            record: record.clone(),
            view: view.clone(),
        });
        view
    }

    fn teardown(&self, open: OpenOverlay) {
        if let Some(id) = open.view.session {
            self.host.unmount(id);
        }
        log::debug!("overlay closed for {}", open.view.record_id);
    }

    /// Close the overlay. Returns false when none was open.
    pub fn close(&self) -> bool {
        let Some(open) = self.current_guard().take() else {
            return false;
        };
        self.teardown(open);
        true
    }

    pub fn is_open(&self) -> bool {
        self.current_guard().is_some()
    }

    /// The open overlay with its decision recomputed from the session state.
    pub fn current(&self) -> Option<OverlaySession> {
        let (record, mut view) = {
            let guard = self.current_guard();
            let open = guard.as_ref()?;
            (open.record.clone(), open.view.clone())
        };
        view.decision = resolve(&record, self.state_of(view.session), &self.placeholders);
        Some(view)
    }

    pub fn decision(&self) -> Option<RenderDecision> {
        self.current().map(|view| view.decision)
    }
}

impl Drop for InspectOverlay {
    fn drop(&mut self) {
        self.close();
    }
}
