//! Read-only syntax highlighting for the inspect overlay's code panes.
//!
//! Output is class-based (`hl-` prefixed spans) so the overlay can ship one
//! cached stylesheet for every pane.

use std::sync::OnceLock;
use syntect::highlighting::ThemeSet;
use syntect::html::{css_for_theme_with_class_style, ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

const PREFERRED_THEMES: &[&str] = &["base16-ocean.dark", "InspiredGitHub"];

static SYNTAXES: OnceLock<SyntaxSet> = OnceLock::new();
static HIGHLIGHT_CSS: OnceLock<String> = OnceLock::new();

fn syntaxes() -> &'static SyntaxSet {
    SYNTAXES.get_or_init(SyntaxSet::load_defaults_newlines)
}

/// Prefix keeps highlight classes clear of the preview's own CSS.
fn class_style() -> ClassStyle {
    ClassStyle::SpacedPrefixed { prefix: "hl-" }
}

/// Map a language label to a syntect token.
fn syntax_token(language: &str) -> &str {
    let lower = language.to_ascii_lowercase();
    if lower.contains("css") && !lower.contains("html") {
        "css"
    } else if lower.contains("js") || lower.contains("javascript") {
        "js"
    } else {
        "html"
    }
}

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Highlighted HTML for `source`. Falls back to escaped plain text if the
/// highlighter fails on any line.
pub fn highlight(language: &str, source: &str) -> String {
    let ss = syntaxes();
    let syntax = ss
        .find_syntax_by_token(syntax_token(language))
        .unwrap_or_else(|| ss.find_syntax_plain_text());

    let mut generator = ClassedHTMLGenerator::new_with_class_style(syntax, ss, class_style());
    for line in LinesWithEndings::from(source) {
        if let Err(e) = generator.parse_html_for_line_which_includes_newline(line) {
            log::debug!("highlighting {} failed, using plain text: {}", language, e);
            return escape_html(source);
        }
    }
    generator.finalize()
}

/// Stylesheet for the `hl-` classes (cached).
pub fn highlight_css() -> &'static str {
    HIGHLIGHT_CSS.get_or_init(|| {
        let themes = ThemeSet::load_defaults();
        let theme = PREFERRED_THEMES
            .iter()
            .find_map(|name| themes.themes.get(*name))
            .or_else(|| themes.themes.values().next());
        match theme {
            Some(theme) => css_for_theme_with_class_style(theme, class_style()).unwrap_or_default(),
            None => String::new(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">&</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_syntax_token() {
        assert_eq!(syntax_token("HTML/CSS"), "html");
        assert_eq!(syntax_token("CSS"), "css");
        assert_eq!(syntax_token("Tailwind"), "html");
        assert_eq!(syntax_token("JavaScript"), "js");
    }

    #[test]
    fn test_highlight_never_emits_raw_markup() {
        let out = highlight("HTML", "<script>alert(1)</script>\n");
        assert!(out.contains("hl-"));
        assert!(!out.contains("<script>"));
        assert!(out.contains("&lt;"));
    }

    #[test]
    fn test_highlight_css_is_prefixed() {
        let css = highlight_css();
        assert!(!css.is_empty());
        assert!(css.contains(".hl-"));
    }
}
