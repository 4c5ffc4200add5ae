//! The Component Record handed over by the catalog layer.
//!
//! Catalog JSON arrives in several historical shapes (`htmlCode` vs `content`,
//! `preview_images` vs `previewImages`, numeric ids, ...). All of them are
//! folded into [`ComponentRecord`] here, once, when the record is built.
//! Nothing downstream looks at raw field names again.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

const IDENTIFIER_KEYS: &[&str] = &["identifier", "id", "_id"];
const TITLE_KEYS: &[&str] = &["title", "name"];
const LANGUAGE_KEYS: &[&str] = &["language", "lang"];
const PAYLOAD_KEYS: &[&str] = &[
    "markup",
    "markupPayload",
    "markup_payload",
    "htmlCode",
    "html_code",
    "code",
    "content",
];
const IMAGE_KEYS: &[&str] = &[
    "staticPreviewImages",
    "static_preview_images",
    "previewImages",
    "preview_images",
    "images",
];

/// Marketplace category. Only used to pick a placeholder image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Navigation,
    Layout,
    Forms,
    #[serde(rename = "Data Display")]
    DataDisplay,
    #[serde(rename = "User Interface")]
    UserInterface,
    Content,
    Media,
    Interactive,
    Widgets,
    Sections,
    Other,
}

impl Category {
    pub const ALL: [Category; 11] = [
        Category::Navigation,
        Category::Layout,
        Category::Forms,
        Category::DataDisplay,
        Category::UserInterface,
        Category::Content,
        Category::Media,
        Category::Interactive,
        Category::Widgets,
        Category::Sections,
        Category::Other,
    ];

    /// Lenient lookup: case-insensitive, spaces, dashes and underscores are interchangeable.
    pub fn parse(value: &str) -> Option<Category> {
        let key: String = value
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        Category::ALL
            .into_iter()
            .find(|c| c.slug().replace('-', "") == key)
    }

    /// Kebab-case key used in config files and placeholder paths.
    pub fn slug(&self) -> &'static str {
        match self {
            Category::Navigation => "navigation",
            Category::Layout => "layout",
            Category::Forms => "forms",
            Category::DataDisplay => "data-display",
            Category::UserInterface => "user-interface",
            Category::Content => "content",
            Category::Media => "media",
            Category::Interactive => "interactive",
            Category::Widgets => "widgets",
            Category::Sections => "sections",
            Category::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Navigation => "Navigation",
            Category::Layout => "Layout",
            Category::Forms => "Forms",
            Category::DataDisplay => "Data Display",
            Category::UserInterface => "User Interface",
            Category::Content => "Content",
            Category::Media => "Media",
            Category::Interactive => "Interactive",
            Category::Widgets => "Widgets",
            Category::Sections => "Sections",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The renderable part of a record, in whichever shape the catalog stored it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarkupPayload {
    /// Null, absent, or a value that is neither a string nor an object.
    #[default]
    Missing,
    /// A string: plain HTML, or a JSON-encoded `{html, css}` pair for legacy records.
    Text { source: String },
    /// An object already split into html/css. Either side may be absent.
    Structured {
        html: Option<String>,
        css: Option<String>,
    },
}

impl MarkupPayload {
    pub fn text(source: impl Into<String>) -> Self {
        MarkupPayload::Text {
            source: source.into(),
        }
    }

    pub fn pair(html: impl Into<String>, css: impl Into<String>) -> Self {
        MarkupPayload::Structured {
            html: Some(html.into()),
            css: Some(css.into()),
        }
    }

    fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => MarkupPayload::text(s.as_str()),
            Value::Object(obj) => {
                let structured = MarkupPayload::Structured {
                    html: string_field(obj, &["html"]),
                    css: string_field(obj, &["css"]),
                };
                if !obj.contains_key("kind") {
                    return structured;
                }
                // Catalog objects may carry their own `kind` ("button", ...);
                // only our serialized shape is taken as tagged.
                match serde_json::from_value(value.clone()) {
                    Ok(MarkupPayload::Missing)
                        if obj.contains_key("html") || obj.contains_key("css") =>
                    {
                        structured
                    }
                    Ok(payload) => payload,
                    Err(_) => structured,
                }
            }
            _ => MarkupPayload::Missing,
        }
    }
}

/// Canonical, read-only view of one marketplace item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct ComponentRecord {
    pub identifier: String,
    pub title: String,
    pub category: Option<Category>,
    pub markup: MarkupPayload,
    pub language: String,
    pub static_preview_images: Vec<String>,
}

impl ComponentRecord {
    pub fn new(identifier: impl Into<String>, markup: MarkupPayload) -> Self {
        Self {
            identifier: identifier.into(),
            markup,
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_images(mut self, images: Vec<String>) -> Self {
        self.static_preview_images = images;
        self
    }

    /// Build a record from raw catalog JSON. Never fails: anything unusable
    /// becomes an empty field.
    pub fn from_json(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };

        let markup = match first_present(obj, PAYLOAD_KEYS) {
            Some(v) => MarkupPayload::from_value(v),
            None => top_level_markup(obj),
        };

        Self {
            identifier: first_present(obj, IDENTIFIER_KEYS)
                .and_then(scalar_to_string)
                .unwrap_or_default(),
            title: string_field(obj, TITLE_KEYS).unwrap_or_default(),
            category: string_field(obj, &["category"])
                .as_deref()
                .and_then(Category::parse),
            markup,
            language: string_field(obj, LANGUAGE_KEYS).unwrap_or_default(),
            static_preview_images: first_present(obj, IMAGE_KEYS)
                .map(image_list)
                .unwrap_or_default(),
        }
    }

    /// Parse a JSON document into a record. Invalid JSON yields an empty record.
    pub fn from_json_str(source: &str) -> Self {
        serde_json::from_str::<Value>(source)
            .map(|v| Self::from_json(&v))
            .unwrap_or_default()
    }

    pub fn first_preview_image(&self) -> Option<&str> {
        self.static_preview_images.first().map(String::as_str)
    }
}

impl From<Value> for ComponentRecord {
    fn from(value: Value) -> Self {
        Self::from_json(&value)
    }
}

/// Records that carry `html` (and maybe `css`) at the top level instead of a payload field.
fn top_level_markup(obj: &Map<String, Value>) -> MarkupPayload {
    match (obj.get("html"), obj.get("css")) {
        (Some(Value::String(html)), Some(Value::String(css))) => {
            MarkupPayload::pair(html.as_str(), css.as_str())
        }
        (Some(html), _) => MarkupPayload::from_value(html),
        _ => MarkupPayload::Missing,
    }
}

fn first_present<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find(|v| !v.is_null())
}

fn string_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    first_present(obj, keys)
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn image_list(value: &Value) -> Vec<String> {
    let non_blank = |s: &str| {
        let s = s.trim();
        (!s.is_empty()).then(|| s.to_string())
    };
    match value {
        Value::String(s) => non_blank(s.as_str()).into_iter().collect(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .filter_map(non_blank)
            .collect(),
        _ => Vec::new(),
    }
}
