//! Document Synthesizer: turns a normalized `{html, css}` pair into one
//! self-contained HTML document for an isolated context's `srcdoc`.
//!
//! The output depends only on the content and the options passed in. No
//! host-origin URL and no data from another record can end up in it.

use serde::{Deserialize, Serialize};
use std::fmt::Write;

use crate::assets::{self, FrameworkAsset, KEYFRAMES_CSS, RESET_CSS};
use crate::normalize::NormalizedContent;
use crate::record::ComponentRecord;
use crate::theme::{self, ThemeMode};

/// Id of the wrapper element the caller's html is placed in.
pub const ROOT_ELEMENT_ID: &str = "vitrine-root";

/// Default debounce for mutation/resize driven height reports.
pub const DEFAULT_MUTATION_DEBOUNCE_MS: u32 = 100;

/// Options recognized by [`synthesize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisOptions {
    pub theme: ThemeMode,
    /// Author-chosen background that overrides the theme background.
    pub background: Option<String>,
    pub include_utility_frameworks: bool,
    pub frameworks: Vec<FrameworkAsset>,
    pub enable_animation_polyfills: bool,
    pub mutation_debounce_ms: u32,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            theme: ThemeMode::Dark,
            background: None,
            include_utility_frameworks: false,
            frameworks: assets::default_frameworks(),
            enable_animation_polyfills: true,
            mutation_debounce_ms: DEFAULT_MUTATION_DEBOUNCE_MS,
        }
    }
}

impl SynthesisOptions {
    pub fn with_theme(mut self, theme: ThemeMode) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        self.background = Some(background.into());
        self
    }

    pub fn with_frameworks(mut self, include: bool) -> Self {
        self.include_utility_frameworks = include;
        self
    }

    pub fn with_animation_polyfills(mut self, enable: bool) -> Self {
        self.enable_animation_polyfills = enable;
        self
    }

    /// Copy of these options adjusted for one record: markup authored
    /// against Tailwind gets the frameworks loaded.
    pub fn for_record(&self, record: &ComponentRecord) -> Self {
        let mut options = self.clone();
        if record.language.to_ascii_lowercase().contains("tailwind") {
            options.include_utility_frameworks = true;
        }
        options
    }
}

/// Build the complete preview document.
pub fn synthesize(content: &NormalizedContent, options: &SynthesisOptions) -> String {
    let mut head_tags = String::new();
    if options.include_utility_frameworks {
        for asset in &options.frameworks {
            if asset.is_remote() {
                head_tags.push_str(&asset.to_tag());
                head_tags.push('\n');
            } else {
                log::warn!("skipping framework asset with non-https url: {}", asset.url);
            }
        }
    }

    let mut css = String::with_capacity(
        RESET_CSS.len() + KEYFRAMES_CSS.len() + content.css.len() + 512,
    );
    css.push_str(RESET_CSS);
    css.push_str(&theme::theme_css(options.theme, options.background.as_deref()));
    if options.enable_animation_polyfills {
        css.push_str(KEYFRAMES_CSS);
    }
    css.push_str(&escape_style_content(&content.css));

    let script = assets::bridge_script(
        options.mutation_debounce_ms,
        options.enable_animation_polyfills,
    );

    let mut doc = String::with_capacity(css.len() + content.html.len() + script.len() + 512);
    let _ = write!(
        doc,
        r#"<!DOCTYPE html>
<html lang="en" data-theme="{theme}">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
{head_tags}<style>{css}</style>
<script>{script}</script>
</head>
<body>
<div id="{root}" class="vitrine-center">
{html}
</div>
</body>
</html>
"#,
        theme = options.theme.as_str(),
        head_tags = head_tags,
        css = css,
        root = ROOT_ELEMENT_ID,
        html = content.html,
        script = script,
    );
    doc
}

/// Keep component css from closing the style element early.
fn escape_style_content(css: &str) -> String {
    const NEEDLE: &[u8] = b"</style";
    let bytes = css.as_bytes();
    let mut out = String::with_capacity(css.len());
    let mut last = 0;
    let mut i = 0;
    while i + NEEDLE.len() <= bytes.len() {
        if bytes[i..i + NEEDLE.len()].eq_ignore_ascii_case(NEEDLE) {
            out.push_str(&css[last..i]);
            out.push_str("<\\/");
            last = i + 2;
            i += NEEDLE.len();
        } else {
            i += 1;
        }
    }
    out.push_str(&css[last..]);
    out
}
