//! Content Normalizer: every payload shape becomes one `{html, css}` pair.
//!
//! This runs for every card in a grid, so it must not fail. Bad input
//! degrades to empty strings and the Fallback Resolver picks something else
//! to show.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::record::{ComponentRecord, MarkupPayload};

/// Canonical renderable content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NormalizedContent {
    pub html: String,
    pub css: String,
}

impl NormalizedContent {
    pub fn new(html: impl Into<String>, css: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            css: css.into(),
        }
    }

    fn trimmed(html: &str, css: &str) -> Self {
        Self::new(html.trim(), css.trim())
    }

    /// True when there is nothing to render live.
    pub fn is_empty(&self) -> bool {
        self.html.is_empty() && self.css.is_empty()
    }

    /// True when the content carries its own stylesheet.
    pub fn is_paired(&self) -> bool {
        !self.css.is_empty()
    }
}

/// Whether the language hint says the payload may be a combined HTML+CSS pair.
pub fn is_css_paired_language(language: &str) -> bool {
    language.to_ascii_lowercase().contains("css")
}

/// Normalize a record's payload. Pure and total.
pub fn normalize(record: &ComponentRecord) -> NormalizedContent {
    match &record.markup {
        MarkupPayload::Missing => NormalizedContent::default(),
        MarkupPayload::Structured { html, css } => NormalizedContent::trimmed(
            html.as_deref().unwrap_or_default(),
            css.as_deref().unwrap_or_default(),
        ),
        MarkupPayload::Text { source } => {
            if is_css_paired_language(&record.language) {
                if let Some(pair) = parse_legacy_pair(source) {
                    return pair;
                }
            }
            NormalizedContent::trimmed(source, "")
        }
    }
}

/// Legacy records stored `{"html": .., "css": ..}` serialized into a string.
/// Both keys must be present and be strings.
fn parse_legacy_pair(source: &str) -> Option<NormalizedContent> {
    let value: Value = serde_json::from_str(source.trim()).ok()?;
    let obj = value.as_object()?;
    let html = obj.get("html")?.as_str()?;
    let css = obj.get("css")?.as_str()?;
    Some(NormalizedContent::trimmed(html, css))
}
