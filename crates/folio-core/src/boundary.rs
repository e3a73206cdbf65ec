//! Failure boundary for the scene subtree
//!
//! Every build or update of the 3D scene runs through a [`FailureBoundary`].
//! The first failure, whether an `Err` or a panic, trips the boundary; from
//! then on the supervised closure is never called again and the fallback is
//! returned on every pass. Only [`FailureBoundary::reset`] (a remount) clears it.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("graphics surface unavailable: {0}")]
    SurfaceUnavailable(String),
    #[error("scene entity missing: {0}")]
    MissingEntity(&'static str),
    #[error("model asset failed: {path}: {reason}")]
    AssetFailed { path: String, reason: String },
    #[error("scene panicked: {0}")]
    Panicked(String),
    #[error("{0}")]
    Other(String),
}

impl SceneError {
    fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_string()
        };
        SceneError::Panicked(message)
    }
}

/// What a tripped boundary shows instead of its subtree
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "style", content = "text", rename_all = "lowercase")]
pub enum Fallback {
    /// Empty, see-through region
    #[default]
    Transparent,
    /// Short human-readable notice
    Notice(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum BoundaryState {
    #[default]
    Healthy,
    Tripped(SceneError),
}

/// Output of one supervised pass
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered<T> {
    Subtree(T),
    Fallback(Fallback),
}

#[derive(Debug, Clone)]
pub struct FailureBoundary {
    label: String,
    state: BoundaryState,
    fallback: Fallback,
}

impl FailureBoundary {
    pub fn new(label: impl Into<String>, fallback: Fallback) -> Self {
        Self {
            label: label.into(),
            state: BoundaryState::Healthy,
            fallback,
        }
    }

    pub fn state(&self) -> &BoundaryState {
        &self.state
    }

    pub fn is_tripped(&self) -> bool {
        matches!(self.state, BoundaryState::Tripped(_))
    }

    pub fn fallback(&self) -> &Fallback {
        &self.fallback
    }

    /// Run one supervised pass.
    ///
    /// Panics are only caught where the target unwinds; on `panic = "abort"`
    /// targets the page-level panic hook takes over.
    pub fn render<T>(&mut self, build: impl FnOnce() -> Result<T, SceneError>) -> Rendered<T> {
        if self.is_tripped() {
            return Rendered::Fallback(self.fallback.clone());
        }

        let result = panic::catch_unwind(AssertUnwindSafe(build))
            .unwrap_or_else(|payload| Err(SceneError::from_panic(payload)));

        match result {
            Ok(subtree) => Rendered::Subtree(subtree),
            Err(error) => {
                self.trip(error, "render");
                Rendered::Fallback(self.fallback.clone())
            }
        }
    }

    /// Feed the result of work that ran elsewhere (a piped system, a callback).
    ///
    /// Returns the value while healthy; results arriving after a trip are dropped.
    pub fn observe<T>(&mut self, result: Result<T, SceneError>, context: &str) -> Option<T> {
        if self.is_tripped() {
            return None;
        }
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.trip(error, context);
                None
            }
        }
    }

    /// Move to `Tripped` and report the failure. The first failure is kept.
    pub fn trip(&mut self, error: SceneError, context: &str) {
        if let BoundaryState::Tripped(first) = &self.state {
            tracing::debug!(boundary = %self.label, context, %error, first = %first, "Further failure after trip");
            return;
        }
        tracing::error!(
            boundary = %self.label,
            context,
            error = %error,
            fallback = ?self.fallback,
            "Scene failure contained; showing fallback"
        );
        self.state = BoundaryState::Tripped(error);
    }

    /// Back to `Healthy`. Only a remount of everything the boundary wraps may call this.
    pub fn reset(&mut self) {
        if self.is_tripped() {
            tracing::info!(boundary = %self.label, "Boundary reset by remount");
        }
        self.state = BoundaryState::Healthy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::sync::{Arc, Mutex};
    use tracing::field::{Field, Visit};
    use tracing::Level;
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    /// Collects every event as its level plus `name=value` fields
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<(Level, String)>>>);

    struct Fields(String);

    impl Visit for Fields {
        fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
            self.0.push_str(&format!("{}={:?} ", field.name(), value));
        }
    }

    impl<S: tracing::Subscriber> Layer<S> for Captured {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            let mut fields = Fields(String::new());
            event.record(&mut fields);
            self.0.lock().unwrap().push((*event.metadata().level(), fields.0));
        }
    }

    fn capture_events(f: impl FnOnce()) -> Vec<(Level, String)> {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::registry().with(captured.clone());
        tracing::subscriber::with_default(subscriber, f);
        let events = captured.0.lock().unwrap().clone();
        events
    }

    #[test]
    fn test_healthy_renders_children() {
        let mut boundary = FailureBoundary::new("scene", Fallback::Transparent);
        let rendered = boundary.render(|| Ok::<_, SceneError>(42));
        assert_eq!(rendered, Rendered::Subtree(42));
        assert!(!boundary.is_tripped());
    }

    #[test]
    fn test_error_trips_and_shows_fallback() {
        let notice = Fallback::Notice("3D preview unavailable".into());
        let mut boundary = FailureBoundary::new("scene", notice.clone());
        let rendered: Rendered<()> = boundary.render(|| Err(SceneError::SurfaceUnavailable("no webgl2".into())));

        assert_eq!(rendered, Rendered::Fallback(notice));
        assert_eq!(
            boundary.state(),
            &BoundaryState::Tripped(SceneError::SurfaceUnavailable("no webgl2".into()))
        );
    }

    #[test]
    fn test_panic_is_contained() {
        let mut boundary = FailureBoundary::new("scene", Fallback::Transparent);
        let rendered: Rendered<()> = boundary.render(|| panic!("gpu lost"));
        assert!(matches!(rendered, Rendered::Fallback(Fallback::Transparent)));
        assert_eq!(
            boundary.state(),
            &BoundaryState::Tripped(SceneError::Panicked("gpu lost".into()))
        );
    }

    #[test]
    fn test_tripped_never_renders_children_again() {
        let mut boundary = FailureBoundary::new("scene", Fallback::Transparent);
        let _: Rendered<()> = boundary.render(|| Err(SceneError::MissingEntity("camera")));

        let calls = Cell::new(0);
        for _ in 0..3 {
            let rendered = boundary.render(|| {
                calls.set(calls.get() + 1);
                Ok(())
            });
            assert_eq!(rendered, Rendered::Fallback(Fallback::Transparent));
        }
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_first_failure_is_kept() {
        let mut boundary = FailureBoundary::new("scene", Fallback::Transparent);
        boundary.trip(SceneError::MissingEntity("camera"), "setup");
        boundary.trip(SceneError::Other("later".into()), "update");
        assert_eq!(boundary.state(), &BoundaryState::Tripped(SceneError::MissingEntity("camera")));
    }

    #[test]
    fn test_trip_logs_error_with_label_and_cause() {
        let events = capture_events(|| {
            let mut boundary = FailureBoundary::new("hero", Fallback::Transparent);
            boundary.observe::<()>(Err(SceneError::MissingEntity("main camera")), "scene system");
            boundary.trip(SceneError::Other("second".into()), "update");
        });

        let errors: Vec<&String> = events
            .iter()
            .filter(|(level, _)| *level == Level::ERROR)
            .map(|(_, fields)| fields)
            .collect();
        assert_eq!(errors.len(), 1, "{events:?}");
        assert!(errors[0].contains("boundary=hero"), "{}", errors[0]);
        assert!(errors[0].contains("scene entity missing: main camera"), "{}", errors[0]);
        assert!(errors[0].contains("scene system"), "{}", errors[0]);
    }

    #[test]
    fn test_panic_is_logged_as_error() {
        let events = capture_events(|| {
            let mut boundary = FailureBoundary::new("hero", Fallback::Transparent);
            let _: Rendered<()> = boundary.render(|| panic!("context lost"));
        });
        assert!(events
            .iter()
            .any(|(level, fields)| *level == Level::ERROR && fields.contains("scene panicked: context lost")));
    }

    #[test]
    fn test_observe() {
        let mut boundary = FailureBoundary::new("scene", Fallback::Transparent);
        assert_eq!(boundary.observe(Ok::<_, SceneError>(1), "setup"), Some(1));
        assert_eq!(boundary.observe::<()>(Err(SceneError::Other("boom".into())), "update"), None);
        assert!(boundary.is_tripped());
        assert_eq!(boundary.observe(Ok::<_, SceneError>(2), "update"), None);
    }

    #[test]
    fn test_reset_requires_explicit_remount() {
        let mut boundary = FailureBoundary::new("scene", Fallback::Transparent);
        let _: Rendered<()> = boundary.render(|| Err(SceneError::Other("boom".into())));
        assert!(boundary.is_tripped());

        boundary.reset();
        assert_eq!(boundary.render(|| Ok::<_, SceneError>("back")), Rendered::Subtree("back"));
    }

    #[test]
    fn test_fallback_deserializes_from_config() {
        let notice: Fallback = toml::from_str("style = \"notice\"\ntext = \"No 3D\"").unwrap();
        assert_eq!(notice, Fallback::Notice("No 3D".into()));

        let transparent: Fallback = toml::from_str("style = \"transparent\"").unwrap();
        assert_eq!(transparent, Fallback::Transparent);
    }
}
