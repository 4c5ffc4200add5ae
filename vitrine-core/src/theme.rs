use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Color scheme of the synthesized preview document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Dark => "dark",
            ThemeMode::Light => "light",
        }
    }

    pub fn palette(&self) -> Palette {
        match self {
            ThemeMode::Dark => Palette {
                background: "#09090b",
                foreground: "#e4e4e7",
                muted: "#a1a1aa",
                accent: "#f59e0b",
                border: "#3f3f46",
            },
            ThemeMode::Light => Palette {
                background: "#ffffff",
                foreground: "#18181b",
                muted: "#52525b",
                accent: "#d97706",
                border: "#e4e4e7",
            },
        }
    }
}

/// Default colors for one theme mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: &'static str,
    pub foreground: &'static str,
    pub muted: &'static str,
    pub accent: &'static str,
    pub border: &'static str,
}

/// Strip characters that could close a declaration, a rule or the style
/// element, and comment delimiters. Returns `None` when nothing usable is left.
pub fn sanitize_css_value(value: &str) -> Option<String> {
    let mut cleaned: String = value
        .chars()
        .filter(|c| !matches!(c, ';' | '{' | '}' | '<' | '>' | '"' | '\'' | '\\'))
        .collect();
    // Removing one delimiter can join the halves of another ("//**" -> "/*").
    while cleaned.contains("/*") || cleaned.contains("*/") {
        cleaned = cleaned.replace("/*", "").replace("*/", "");
    }
    let cleaned = cleaned.trim();
    (!cleaned.is_empty()).then(|| cleaned.to_string())
}

/// Theme stylesheet: `--vitrine-*` custom properties plus literal fallbacks,
/// so markup that ignores the variables still gets sane colors.
pub fn theme_css(mode: ThemeMode, background: Option<&str>) -> String {
    let palette = mode.palette();
    let background = background
        .and_then(sanitize_css_value)
        .unwrap_or_else(|| palette.background.to_string());

    let mut css = String::new();
    let _ = write!(
        css,
        ":root{{color-scheme:{scheme};--vitrine-bg:{bg};--vitrine-fg:{fg};--vitrine-muted:{muted};--vitrine-accent:{accent};--vitrine-border:{border};}}",
        scheme = mode.as_str(),
        bg = background,
        fg = palette.foreground,
        muted = palette.muted,
        accent = palette.accent,
        border = palette.border,
    );
    let _ = write!(
        css,
        "html,body{{background:{bg};background:var(--vitrine-bg);color:{fg};color:var(--vitrine-fg);}}",
        bg = background,
        fg = palette.foreground,
    );
    let _ = write!(
        css,
        "a{{color:{accent};color:var(--vitrine-accent);}}hr{{border-color:{border};border-color:var(--vitrine-border);}}",
        accent = palette.accent,
        border = palette.border,
    );
    css
}
