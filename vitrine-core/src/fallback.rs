//! Fallback Resolver: decides what a card actually shows.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::normalize::normalize;
use crate::record::{Category, ComponentRecord};

/// Lifecycle state of one render session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Initializing,
    Loaded,
    Errored,
    Destroyed,
}

impl SessionState {
    /// Allowed transitions. `Destroyed` is terminal.
    pub fn can_transition_to(self, next: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (self, next),
            (Initializing, Loaded)
                | (Initializing, Errored)
                | (Initializing, Destroyed)
                | (Loaded, Destroyed)
                | (Errored, Destroyed)
        )
    }

    /// A live render is still plausible in this state.
    pub fn is_live(self) -> bool {
        matches!(self, SessionState::Initializing | SessionState::Loaded)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::Initializing => "initializing",
            SessionState::Loaded => "loaded",
            SessionState::Errored => "errored",
            SessionState::Destroyed => "destroyed",
        };
        f.write_str(s)
    }
}

/// What a card shows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "url", rename_all = "snake_case")]
pub enum RenderDecision {
    LiveRender,
    StaticImage(String),
    CategoryPlaceholder(String),
    EmptyPlaceholder,
}

impl RenderDecision {
    pub fn is_live(&self) -> bool {
        matches!(self, RenderDecision::LiveRender)
    }

    /// Image to display for non-live decisions.
    pub fn image_url(&self) -> Option<&str> {
        match self {
            RenderDecision::StaticImage(url) | RenderDecision::CategoryPlaceholder(url) => {
                Some(url)
            }
            _ => None,
        }
    }
}

/// Category → placeholder image URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderMap {
    urls: HashMap<Category, String>,
}

impl Default for PlaceholderMap {
    fn default() -> Self {
        let urls = Category::ALL
            .into_iter()
            .map(|c| (c, format!("/img/placeholders/{}.svg", c.slug())))
            .collect();
        Self { urls }
    }
}

impl PlaceholderMap {
    pub fn empty() -> Self {
        Self {
            urls: HashMap::new(),
        }
    }

    /// Defaults with the given slug → url overrides applied. Unknown slugs
    /// are ignored.
    pub fn with_overrides(overrides: &HashMap<String, String>) -> Self {
        let mut map = Self::default();
        for (slug, url) in overrides {
            match Category::parse(slug) {
                Some(category) => {
                    map.urls.insert(category, url.clone());
                }
                None => log::warn!("ignoring placeholder for unknown category '{}'", slug),
            }
        }
        map
    }

    pub fn insert(&mut self, category: Category, url: impl Into<String>) {
        self.urls.insert(category, url.into());
    }

    pub fn get(&self, category: Category) -> Option<&str> {
        self.urls.get(&category).map(String::as_str)
    }
}

/// Pick the decision for a record in the given session state.
pub fn resolve(
    record: &ComponentRecord,
    state: SessionState,
    placeholders: &PlaceholderMap,
) -> RenderDecision {
    if state.is_live() && !normalize(record).is_empty() {
        return RenderDecision::LiveRender;
    }
    if state == SessionState::Errored {
        if let Some(url) = record.first_preview_image() {
            return RenderDecision::StaticImage(url.to_string());
        }
    }
    resolve_static(record, placeholders)
}

/// Decision for a card that will not get a live render at all.
pub fn resolve_static(record: &ComponentRecord, placeholders: &PlaceholderMap) -> RenderDecision {
    if let Some(url) = record.first_preview_image() {
        return RenderDecision::StaticImage(url.to_string());
    }
    record
        .category
        .and_then(|c| placeholders.get(c))
        .map(|url| RenderDecision::CategoryPlaceholder(url.to_string()))
        .unwrap_or(RenderDecision::EmptyPlaceholder)
}
