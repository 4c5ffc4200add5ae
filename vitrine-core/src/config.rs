use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::assets::{self, FrameworkAsset};
use crate::error::{PreviewError, PreviewResult};
use crate::fallback::PlaceholderMap;
use crate::synthesize::{SynthesisOptions, DEFAULT_MUTATION_DEBOUNCE_MS};
use crate::theme::ThemeMode;

pub const DEFAULT_LOAD_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_MAX_CONTENT_HEIGHT: u32 = 1_000;
pub const DEFAULT_MAX_LIVE_SESSIONS: usize = 48;

/// Page-level preview configuration, usually loaded from YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub theme: ThemeMode,
    pub background: Option<String>,
    pub include_utility_frameworks: bool,
    pub enable_animation_polyfills: bool,
    pub frameworks: Vec<FrameworkAsset>,
    pub mutation_debounce_ms: u32,
    pub load_timeout_ms: u64,
    pub max_content_height: u32,
    pub max_live_sessions: usize,
    /// Category slug → placeholder URL, merged over the defaults.
    pub placeholders: HashMap<String, String>,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            theme: ThemeMode::Dark,
            background: None,
            include_utility_frameworks: false,
            enable_animation_polyfills: true,
            frameworks: assets::default_frameworks(),
            mutation_debounce_ms: DEFAULT_MUTATION_DEBOUNCE_MS,
            load_timeout_ms: DEFAULT_LOAD_TIMEOUT_MS,
            max_content_height: DEFAULT_MAX_CONTENT_HEIGHT,
            max_live_sessions: DEFAULT_MAX_LIVE_SESSIONS,
            placeholders: HashMap::new(),
        }
    }
}

impl PreviewConfig {
    pub fn from_yaml_str(yaml: &str) -> PreviewResult<Self> {
        let config: PreviewConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> PreviewResult<Self> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path).map_err(|e| PreviewError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_yaml_str(&yaml)
    }

    pub fn validate(&self) -> PreviewResult<()> {
        if self.load_timeout_ms == 0 {
            return Err(invalid("load_timeout_ms", "must be greater than zero"));
        }
        if self.max_content_height == 0 {
            return Err(invalid("max_content_height", "must be greater than zero"));
        }
        if self.max_live_sessions == 0 {
            return Err(invalid("max_live_sessions", "must be greater than zero"));
        }
        Ok(())
    }

    pub fn synthesis_options(&self) -> SynthesisOptions {
        SynthesisOptions {
            theme: self.theme,
            background: self.background.clone(),
            include_utility_frameworks: self.include_utility_frameworks,
            frameworks: self.frameworks.clone(),
            enable_animation_polyfills: self.enable_animation_polyfills,
            mutation_debounce_ms: self.mutation_debounce_ms,
        }
    }

    pub fn placeholder_map(&self) -> PlaceholderMap {
        PlaceholderMap::with_overrides(&self.placeholders)
    }
}

fn invalid(key: &str, reason: &str) -> PreviewError {
    PreviewError::InvalidConfig {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
