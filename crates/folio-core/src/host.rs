//! Adaptive scene host lifecycle
//!
//! Owns the capability detector, the model loader and the failure boundary
//! for one mount of the 3D scene. Rendering configuration is never stored:
//! it is rebuilt from the current class every time it is asked for.

use crate::boundary::FailureBoundary;
use crate::capability::{CapabilityClass, CapabilityDetector, Environment};
use crate::config::SiteConfig;
use crate::model::{LoadTicket, ModelLoader, ModelView, Resolution, ResolveOutcome};
use crate::render_config::{Lighting, RenderConfiguration};

#[derive(Debug)]
pub struct SceneHost<S> {
    breakpoint: f64,
    detector: Option<CapabilityDetector>,
    loader: ModelLoader<S>,
    boundary: FailureBoundary,
}

impl<S> SceneHost<S> {
    pub fn mount(env: &dyn Environment, config: &SiteConfig) -> Self {
        let breakpoint = config.scene.breakpoint_px;
        Self {
            breakpoint,
            detector: Some(CapabilityDetector::mount(env, breakpoint)),
            loader: ModelLoader::new(config.model_asset_path()),
            boundary: FailureBoundary::new("scene", config.scene.fallback.clone()),
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.detector.is_some()
    }

    /// Current class; an unmounted host reports the conservative default
    pub fn class(&self) -> CapabilityClass {
        self.detector
            .as_ref()
            .map(CapabilityDetector::class)
            .unwrap_or_default()
    }

    pub fn render_configuration(&self) -> RenderConfiguration {
        RenderConfiguration::for_class(self.class())
    }

    /// Lighting the scene should have right now; a tripped scene stays dark
    pub fn lighting(&self) -> Lighting {
        if self.boundary.is_tripped() {
            Lighting::OFF
        } else {
            self.render_configuration().lighting
        }
    }

    /// Apply pending viewport changes. Returns true when the class changed.
    pub fn poll_viewport(&mut self) -> bool {
        self.detector.as_mut().is_some_and(CapabilityDetector::poll)
    }

    pub fn loader(&self) -> &ModelLoader<S> {
        &self.loader
    }

    pub fn model_view(&self) -> ModelView<'_, S> {
        self.loader.view()
    }

    pub fn boundary(&self) -> &FailureBoundary {
        &self.boundary
    }

    pub fn boundary_mut(&mut self) -> &mut FailureBoundary {
        &mut self.boundary
    }

    /// Start the model load unless the scene already failed or was unmounted
    pub fn begin_load(&mut self) -> Option<LoadTicket> {
        if self.boundary.is_tripped() || !self.is_mounted() {
            return None;
        }
        self.loader.begin()
    }

    /// Apply a finished load using whatever class is current right now
    pub fn resolve(&mut self, ticket: LoadTicket, resolution: Resolution<S>) -> ResolveOutcome {
        let class = self.class();
        self.loader.resolve(ticket, resolution, class)
    }

    /// Release the viewport subscription and the model
    pub fn unmount(&mut self) {
        if let Some(mut detector) = self.detector.take() {
            detector.unmount();
        }
        self.loader.unmount();
        tracing::info!("Scene host unmounted");
    }

    /// Fresh mount: new detector, loader ready for a new load, boundary healthy
    pub fn remount(&mut self, env: &dyn Environment) {
        self.unmount();
        self.detector = Some(CapabilityDetector::mount(env, self.breakpoint));
        self.loader.remount();
        self.boundary.reset();
    }
}
