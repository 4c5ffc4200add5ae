use thiserror::Error;

pub type HostResult<T> = Result<T, HostError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("Unsafe capability policy: {0}")]
    UnsafePolicy(String),

    #[error("Failed to create isolated context: {0}")]
    ContextCreation(String),

    #[error("Failed to load document into isolated context: {0}")]
    DocumentLoad(String),
}
