//! Static pieces of every synthesized document: reset, keyframes, framework
//! tags and the in-document autosize script.

use serde::{Deserialize, Serialize};

/// Reset applied before theme and component styles.
pub const RESET_CSS: &str = "*,*::before,*::after{box-sizing:border-box;}\
html,body{margin:0;padding:0;}\
body{min-height:0;font-family:Inter,system-ui,-apple-system,'Segoe UI',sans-serif;line-height:1.5;-webkit-font-smoothing:antialiased;text-rendering:optimizeLegibility;}\
img,svg,video,canvas{display:block;max-width:100%;}\
button,input,select,textarea{font:inherit;color:inherit;}\
.vitrine-center{display:flex;align-items:center;justify-content:center;flex-direction:column;min-height:100%;padding:16px;}";

/// Baseline animation keyframes and utility classes.
pub const KEYFRAMES_CSS: &str = "@keyframes spin{from{transform:rotate(0deg);}to{transform:rotate(360deg);}}\
@keyframes pulse{0%,100%{opacity:1;}50%{opacity:.5;}}\
@keyframes bounce{0%,100%{transform:translateY(-25%);animation-timing-function:cubic-bezier(.8,0,1,1);}50%{transform:none;animation-timing-function:cubic-bezier(0,0,.2,1);}}\
@keyframes fade-in{from{opacity:0;}to{opacity:1;}}\
@keyframes slide-in{from{transform:translateY(12px);opacity:0;}to{transform:none;opacity:1;}}\
.animate-spin{animation:spin 1s linear infinite;}\
.animate-pulse{animation:pulse 2s cubic-bezier(.4,0,.6,1) infinite;}\
.animate-bounce{animation:bounce 1s infinite;}\
.animate-fade-in{animation:fade-in .5s ease-out both;}\
.animate-slide-in{animation:slide-in .5s ease-out both;}";

const BRIDGE_TEMPLATE: &str = include_str!("bridge.js");

/// Render the autosize/animation-kick script for one document.
pub fn bridge_script(debounce_ms: u32, kick_animations: bool) -> String {
    BRIDGE_TEMPLATE
        .replace("__VITRINE_DEBOUNCE_MS__", &debounce_ms.to_string())
        .replace(
            "__VITRINE_KICK_ANIMATIONS__",
            if kick_animations { "true" } else { "false" },
        )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Script,
    Stylesheet,
}

/// A hosted utility framework loaded inside each isolated context.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameworkAsset {
    pub kind: AssetKind,
    pub url: String,
}

impl FrameworkAsset {
    pub fn script(url: impl Into<String>) -> Self {
        Self {
            kind: AssetKind::Script,
            url: url.into(),
        }
    }

    pub fn stylesheet(url: impl Into<String>) -> Self {
        Self {
            kind: AssetKind::Stylesheet,
            url: url.into(),
        }
    }

    /// Only absolute https URLs may be referenced; anything else could
    /// resolve against the host page's origin.
    pub fn is_remote(&self) -> bool {
        let url = self.url.trim();
        url.len() > "https://".len()
            && url
                .get(..8)
                .is_some_and(|scheme| scheme.eq_ignore_ascii_case("https://"))
            && !url.contains(['"', '<', '>', ' '])
    }

    pub fn to_tag(&self) -> String {
        match self.kind {
            AssetKind::Script => format!(r#"<script src="{}"></script>"#, self.url.trim()),
            AssetKind::Stylesheet => {
                format!(r#"<link rel="stylesheet" href="{}">"#, self.url.trim())
            }
        }
    }
}

/// Tailwind Play CDN and the daisyUI component stylesheet.
pub fn default_frameworks() -> Vec<FrameworkAsset> {
    vec![
        FrameworkAsset::script("https://cdn.tailwindcss.com"),
        FrameworkAsset::stylesheet(
            "https://cdn.jsdelivr.net/npm/daisyui@4.12.10/dist/full.min.css",
        ),
    ]
}
