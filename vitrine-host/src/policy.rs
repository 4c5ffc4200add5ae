//! Capability policy for isolated contexts.
//!
//! Every context the host creates gets its sandbox tokens from one
//! [`CapabilityPolicy`]. The host refuses policies that would let component
//! code reach the host page.

use serde::{Deserialize, Serialize};

use crate::error::{HostError, HostResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CapabilityPolicy {
    pub allow_scripts: bool,
    pub allow_same_origin: bool,
    pub allow_top_navigation: bool,
    pub allow_popups: bool,
}

impl Default for CapabilityPolicy {
    fn default() -> Self {
        Self::isolated()
    }
}

impl CapabilityPolicy {
    /// Scripts run (animation kick and autosize need them); nothing else.
    pub const fn isolated() -> Self {
        Self {
            allow_scripts: true,
            allow_same_origin: false,
            allow_top_navigation: false,
            allow_popups: false,
        }
    }

    /// Fully inert: no scripts at all. Height reporting will not work.
    pub const fn static_only() -> Self {
        Self {
            allow_scripts: false,
            ..Self::isolated()
        }
    }

    pub fn validate(&self) -> HostResult<()> {
        let mut granted = Vec::new();
        if self.allow_same_origin {
            granted.push("same-origin access");
        }
        if self.allow_top_navigation {
            granted.push("top-level navigation");
        }
        if self.allow_popups {
            granted.push("popups");
        }
        if granted.is_empty() {
            Ok(())
        } else {
            Err(HostError::UnsafePolicy(format!(
                "untrusted content may not be granted {}",
                granted.join(", ")
            )))
        }
    }

    /// Sandbox attribute value. An empty string means every capability is denied.
    pub fn sandbox_tokens(&self) -> String {
        let mut tokens = Vec::new();
        if self.allow_scripts {
            tokens.push("allow-scripts");
        }
        if self.allow_same_origin {
            tokens.push("allow-same-origin");
        }
        if self.allow_top_navigation {
            tokens.push("allow-top-navigation");
        }
        if self.allow_popups {
            tokens.push("allow-popups");
        }
        tokens.join(" ")
    }
}
