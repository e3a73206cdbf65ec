//! Device capability classification
//!
//! A device is treated as low-power when its viewport is narrow or its user
//! agent identifies as Android. The Android flag is read once when the
//! detector mounts; the narrow flag follows a media-query watch for the rest
//! of the session.

use std::sync::{Arc, Mutex};

/// Viewport width (logical pixels) at or below which the viewport is narrow
pub const NARROW_VIEWPORT_MAX_WIDTH: f64 = 500.0;

/// Environment classification used to pick rendering settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CapabilityClass {
    is_narrow_viewport: bool,
    is_android_agent: bool,
}

impl CapabilityClass {
    pub const fn new(is_narrow_viewport: bool, is_android_agent: bool) -> Self {
        Self {
            is_narrow_viewport,
            is_android_agent,
        }
    }

    /// Classify from raw readings. Missing readings count as `false`.
    pub fn detect(user_agent: Option<&str>, viewport_width: Option<f64>, breakpoint: f64) -> Self {
        Self::new(
            viewport_width.is_some_and(|w| is_narrow_width(w, breakpoint)),
            user_agent.is_some_and(is_android_agent),
        )
    }

    pub fn is_narrow_viewport(&self) -> bool {
        self.is_narrow_viewport
    }

    pub fn is_android_agent(&self) -> bool {
        self.is_android_agent
    }

    /// The single decision variable every downstream consumer reads
    pub fn is_low_power_device(&self) -> bool {
        self.is_narrow_viewport || self.is_android_agent
    }

    /// Same class with an updated viewport reading; the agent flag is kept
    pub fn with_narrow_viewport(self, is_narrow_viewport: bool) -> Self {
        Self {
            is_narrow_viewport,
            ..self
        }
    }
}

/// Case-insensitive Android signature match on a user agent string
pub fn is_android_agent(user_agent: &str) -> bool {
    user_agent.to_ascii_lowercase().contains("android")
}

/// Inclusive width check against the breakpoint
pub fn is_narrow_width(width: f64, breakpoint: f64) -> bool {
    width <= breakpoint
}

/// Media query string for a max-width watch
pub fn max_width_query(breakpoint: f64) -> String {
    format!("(max-width: {}px)", breakpoint)
}

/// Guard for a registered viewport listener.
///
/// Dropping the guard runs the unsubscribe action exactly once.
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(unsubscribe: impl FnOnce() + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    /// Explicitly remove the listener now
    pub fn cancel(mut self) {
        self.run();
    }

    fn run(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}

/// The host platform the detector reads from (a browser window in production)
pub trait Environment {
    /// Platform identifier string, if the platform exposes one
    fn user_agent(&self) -> Option<String>;

    /// Current viewport width in logical pixels
    fn viewport_width(&self) -> Option<f64>;

    /// Register `on_change` for match-state changes of `(max-width: <max_width>px)`.
    ///
    /// Returns `None` when the platform has no media-query support.
    fn watch_max_width(&self, max_width: f64, on_change: Box<dyn FnMut(bool)>) -> Option<Subscription>;
}

/// Keeps a [`CapabilityClass`] current for the lifetime of a mount
#[derive(Debug)]
pub struct CapabilityDetector {
    class: CapabilityClass,
    pending: Arc<Mutex<Option<bool>>>,
    subscription: Option<Subscription>,
}

impl CapabilityDetector {
    /// Read the environment once and start watching the viewport
    pub fn mount(env: &dyn Environment, breakpoint: f64) -> Self {
        let user_agent = env.user_agent();
        let width = env.viewport_width();
        let class = CapabilityClass::detect(user_agent.as_deref(), width, breakpoint);

        let pending = Arc::new(Mutex::new(None));
        let slot = pending.clone();
        let subscription = env.watch_max_width(
            breakpoint,
            Box::new(move |matches| {
                if let Ok(mut slot) = slot.lock() {
                    *slot = Some(matches);
                }
            }),
        );

        if subscription.is_none() {
            tracing::debug!("Viewport watch unavailable; narrow flag fixed at {}", class.is_narrow_viewport());
        }
        tracing::info!(
            narrow = class.is_narrow_viewport(),
            android = class.is_android_agent(),
            "Capability detected"
        );

        Self {
            class,
            pending,
            subscription,
        }
    }

    pub fn class(&self) -> CapabilityClass {
        self.class
    }

    pub fn is_watching(&self) -> bool {
        self.subscription.is_some()
    }

    /// Apply the latest viewport change, if any. Returns true when the class changed.
    pub fn poll(&mut self) -> bool {
        if !self.is_watching() {
            return false;
        }

        let latest = match self.pending.lock() {
            Ok(mut slot) => slot.take(),
            Err(_) => None,
        };

        match latest {
            Some(narrow) if narrow != self.class.is_narrow_viewport() => {
                self.class = self.class.with_narrow_viewport(narrow);
                tracing::debug!(narrow, low_power = self.class.is_low_power_device(), "Viewport class changed");
                true
            }
            _ => false,
        }
    }

    /// Remove the viewport listener and drop any unapplied change
    pub fn unmount(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel();
        }
        if let Ok(mut slot) = self.pending.lock() {
            *slot = None;
        }
    }
}
