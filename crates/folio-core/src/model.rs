//! Model asset resolution, load state, and placement
//!
//! The site shows exactly one model. Loading is asynchronous and owned by
//! the platform's asset facility; this module tracks what has been asked for,
//! what came back, and where the result goes. Results are tagged with a
//! ticket so a load that finishes after the host unmounted is dropped.

use crate::boundary::SceneError;
use crate::capability::CapabilityClass;

/// Model location relative to the deployment base path
pub const MODEL_RELATIVE_PATH: &str = "desktop_pc/scene.gltf";

/// Join the deployment base path and a relative asset path with exactly one slash.
///
/// An empty base is treated as `/`.
pub fn resolve_asset_path(base: &str, relative: &str) -> String {
    let base = if base.is_empty() { "/" } else { base };
    let relative = relative.trim_start_matches('/');

    if base.ends_with('/') {
        format!("{}{}", base, relative)
    } else {
        format!("{}/{}", base, relative)
    }
}

/// Scale, position and Euler rotation (XYZ, radians) applied to the model root
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub scale: f32,
    pub position: [f32; 3],
    pub rotation: [f32; 3],
}

impl Placement {
    pub const LOW_POWER: Placement = Placement {
        scale: 0.7,
        position: [0.0, -3.0, -2.2],
        rotation: [-0.01, -0.2, -0.1],
    };

    pub const DEFAULT: Placement = Placement {
        scale: 0.75,
        position: [0.0, -3.25, -1.5],
        rotation: [-0.01, -0.2, -0.1],
    };

    pub fn for_class(class: CapabilityClass) -> Self {
        if class.is_low_power_device() {
            Self::LOW_POWER
        } else {
            Self::DEFAULT
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelLoadState {
    #[default]
    Unloaded,
    Loading,
    Ready,
    /// Resolved, but without a usable scene graph
    Empty,
    Failed,
}

/// Proof that a load was started by a particular mount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

/// What the asset facility handed back
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<S> {
    Scene(S),
    Empty,
    Failed(String),
}

/// What the caller should do after a resolution was applied
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveOutcome {
    /// Spawn the scene with this placement
    Placed(Placement),
    /// Render nothing
    Empty,
    /// Render nothing; the failure has been logged
    Failed(SceneError),
    /// Stale or duplicate result; ignore it
    Discarded,
}

/// What the scene subtree should show right now
#[derive(Debug, PartialEq)]
pub enum ModelView<'a, S> {
    /// Load pending; show the progress placeholder
    Placeholder,
    /// Nothing to draw (not started, empty, or failed)
    Nothing,
    Placed(&'a S, Placement),
}

/// Tracks the single model asset across a mount
#[derive(Debug)]
pub struct ModelLoader<S> {
    path: String,
    generation: u64,
    mounted: bool,
    state: ModelLoadState,
    placed: Option<(S, Placement)>,
}

impl<S> ModelLoader<S> {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            generation: 0,
            mounted: true,
            state: ModelLoadState::Unloaded,
            placed: None,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn state(&self) -> ModelLoadState {
        self.state
    }

    /// Start the load. Returns `None` if a load was already started this mount.
    pub fn begin(&mut self) -> Option<LoadTicket> {
        if !self.mounted || self.state != ModelLoadState::Unloaded {
            return None;
        }
        tracing::info!("Attempting to load model from: {}", self.path);
        self.state = ModelLoadState::Loading;
        Some(LoadTicket {
            generation: self.generation,
        })
    }

    /// Apply a finished load. The placement preset is picked from `class` now.
    pub fn resolve(
        &mut self,
        ticket: LoadTicket,
        resolution: Resolution<S>,
        class: CapabilityClass,
    ) -> ResolveOutcome {
        if !self.mounted || ticket.generation != self.generation || self.state != ModelLoadState::Loading {
            tracing::debug!("Discarding late model result for {}", self.path);
            return ResolveOutcome::Discarded;
        }

        match resolution {
            Resolution::Scene(scene) => {
                let placement = Placement::for_class(class);
                tracing::info!("Model loaded: {}", self.path);
                self.placed = Some((scene, placement));
                self.state = ModelLoadState::Ready;
                ResolveOutcome::Placed(placement)
            }
            Resolution::Empty => {
                tracing::warn!("Model scene is null or empty: {}", self.path);
                self.state = ModelLoadState::Empty;
                ResolveOutcome::Empty
            }
            Resolution::Failed(reason) => {
                let error = SceneError::AssetFailed {
                    path: self.path.clone(),
                    reason,
                };
                tracing::error!(%error, "Error loading model");
                self.state = ModelLoadState::Failed;
                ResolveOutcome::Failed(error)
            }
        }
    }

    pub fn view(&self) -> ModelView<'_, S> {
        match (&self.state, &self.placed) {
            (ModelLoadState::Loading, _) => ModelView::Placeholder,
            (ModelLoadState::Ready, Some((scene, placement))) => ModelView::Placed(scene, *placement),
            _ => ModelView::Nothing,
        }
    }

    /// Drop the asset and invalidate every outstanding ticket
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.generation += 1;
        self.placed = None;
        self.state = ModelLoadState::Unloaded;
    }

    /// Make the loader usable again after an unmount
    pub fn remount(&mut self) {
        self.mounted = true;
    }
}
