//! Folio Core - Platform-independent logic behind the portfolio site
//!
//! This crate holds everything about the site that can be decided without a
//! browser or a GPU:
//! - Capability classification (narrow viewport, Android user agent)
//! - Render configuration derived from the capability class
//! - Model asset path resolution, load state, and placement presets
//! - Orbit camera math with locked elevation
//! - The failure boundary that contains scene failures
//! - The scene host that ties them together across mount/unmount
//! - Site configuration and static page content

pub mod boundary;
pub mod capability;
pub mod config;
pub mod content;
pub mod host;
pub mod model;
pub mod orbit;
pub mod render_config;

pub use boundary::{BoundaryState, Fallback, FailureBoundary, Rendered, SceneError};
pub use capability::{CapabilityClass, CapabilityDetector, Environment, Subscription};
pub use config::{ConfigError, SiteConfig};
pub use content::{Contact, ContactLink, ContentError, Experience, NavLink, Section, Service, SiteContent, Technology};
pub use host::SceneHost;
pub use model::{LoadTicket, ModelLoadState, ModelLoader, ModelView, Placement, Resolution, ResolveOutcome};
pub use orbit::OrbitController;
pub use render_config::{Damping, FrameLoop, Lighting, PowerPreference, RenderConfiguration};
