//! Seams to the platform that actually owns the DOM.
//!
//! A browser adapter implements these with an iframe and its `contentWindow`;
//! tests implement them with plain structs.

use std::fmt;
use std::sync::Arc;

use crate::error::HostResult;
use crate::policy::CapabilityPolicy;

/// Identifies one card slot in the host layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(pub String);

impl ContainerId {
    pub fn new(id: impl Into<String>) -> Self {
        ContainerId(id.into())
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Host-side element an isolated context is placed in.
pub trait Container: Send + Sync {
    fn id(&self) -> ContainerId;

    /// Apply a height in CSS pixels to the element's style.
    fn set_height(&self, height_px: u32);
}

/// One isolated browsing context. The `Arc` handing it out doubles as the
/// message source reference: messages are attributed by pointer identity.
pub trait IsolatedContext: Send + Sync {
    /// Assign the synthesized document (e.g. as `srcdoc`).
    fn load_document(&self, document: &str) -> HostResult<()>;

    /// Remove the context from the container and drop its document.
    fn detach(&self);
}

/// Creates isolated contexts inside containers with the given sandbox policy.
pub trait ContextFactory: Send + Sync {
    fn create(
        &self,
        container: &dyn Container,
        policy: &CapabilityPolicy,
    ) -> HostResult<Arc<dyn IsolatedContext>>;
}

/// Reference identity of two context handles.
pub fn same_context(a: &Arc<dyn IsolatedContext>, b: &Arc<dyn IsolatedContext>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}
