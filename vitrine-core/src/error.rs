use thiserror::Error;

pub type PreviewResult<T> = Result<T, PreviewError>;

/// Errors raised while loading configuration or reading record files.
///
/// The rendering path itself (normalize, synthesize, resolve) never returns
/// these; it degrades to empty content instead.
#[derive(Error, Debug, Clone)]
pub enum PreviewError {
    #[error("I/O error reading '{path}': {message}")]
    Io { path: String, message: String },

    #[error("YAML error: {0}")]
    YamlError(String),

    #[error("JSON error: {0}")]
    JsonError(String),

    #[error("Invalid config value for '{key}': {reason}")]
    InvalidConfig { key: String, reason: String },
}

impl From<serde_yaml::Error> for PreviewError {
    fn from(err: serde_yaml::Error) -> Self {
        PreviewError::YamlError(err.to_string())
    }
}

impl From<serde_json::Error> for PreviewError {
    fn from(err: serde_json::Error) -> Self {
        PreviewError::JsonError(err.to_string())
    }
}
