//! # Vitrine host
//!
//! Stateful half of the preview renderer. Runs one isolated context per
//! visible card, routes height reports from those contexts back to their
//! containers, keeps each card's [`RenderDecision`](vitrine_core::RenderDecision)
//! current and drives the single inspect overlay.
//!
//! The platform that owns the DOM plugs in through [`Container`],
//! [`IsolatedContext`] and [`ContextFactory`], and forwards its load, script
//! error and message events to [`RenderHost`].
//!
//! ## Example
//! ```ignore
//! use std::sync::Arc;
//! use vitrine_core::{ComponentRecord, PreviewConfig};
//! use vitrine_host::{HostSettings, PreviewGrid, RenderHost};
//!
//! let config = PreviewConfig::default();
//! let host = RenderHost::new(Arc::new(IframeFactory), HostSettings::from_config(&config))?;
//! let grid = PreviewGrid::from_config(host.clone(), &config);
//!
//! let decision = grid.mount_card(card_container, ComponentRecord::from_json_str(json));
//! // later, from the platform's message listener:
//! host.handle_message(&source_context, &payload);
//! ```

pub mod bridge;
pub mod context;
pub mod error;
pub mod grid;
pub mod highlight;
pub mod host;
pub mod overlay;
pub mod policy;
pub mod session;

pub use bridge::{clamp_height, AutosizeBridge, BridgeMessage, ResizeReport};
pub use context::{same_context, Container, ContainerId, ContextFactory, IsolatedContext};
pub use error::{HostError, HostResult};
pub use grid::{DecisionChanged, PreviewGrid};
pub use host::{HostEvent, HostSettings, RenderHost, SessionObserver};
pub use overlay::{CodePane, CodeView, InspectOverlay, OverlaySession};
pub use policy::CapabilityPolicy;
pub use session::{RenderSession, SessionId};
