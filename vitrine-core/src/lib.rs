//! # Vitrine core
//!
//! Host-agnostic half of the sandboxed preview renderer for marketplace
//! components. Everything here is pure: no browser, no timers, no shared
//! state.
//!
//! ## Pipeline
//! - [`record`] folds raw catalog JSON into a [`ComponentRecord`]
//! - [`normalize`] turns any payload shape into a [`NormalizedContent`] pair
//! - [`synthesize`](synthesize::synthesize) wraps the pair into a self-contained
//!   document (reset, theme, keyframes, frameworks, autosize script)
//! - [`fallback`] decides between live render, static image and placeholders
//!
//! ## Example
//! ```ignore
//! use vitrine_core::{normalize, synthesize, ComponentRecord, SynthesisOptions};
//!
//! let record = ComponentRecord::from_json_str(r#"{
//!   "id": "btn-1",
//!   "language": "HTML/CSS",
//!   "markupPayload": "{\"html\":\"<button>Hi</button>\",\"css\":\"button{color:red}\"}"
//! }"#);
//!
//! let content = normalize(&record);
//! let document = synthesize(&content, &SynthesisOptions::default().for_record(&record));
//! ```

pub mod assets;
pub mod config;
pub mod error;
pub mod fallback;
pub mod normalize;
pub mod record;
pub mod synthesize;
pub mod theme;

pub use assets::{AssetKind, FrameworkAsset};
pub use config::PreviewConfig;
pub use error::{PreviewError, PreviewResult};
pub use fallback::{resolve, resolve_static, PlaceholderMap, RenderDecision, SessionState};
pub use normalize::{normalize, NormalizedContent};
pub use record::{Category, ComponentRecord, MarkupPayload};
pub use synthesize::{synthesize, SynthesisOptions};
pub use theme::ThemeMode;

/// Normalize and synthesize in one step, adjusting options for the record.
pub fn document_for(record: &ComponentRecord, options: &SynthesisOptions) -> String {
    synthesize(&normalize(record), &options.for_record(record))
}
