//! Browser access: user agent, viewport watch, graphics probe, and the page-level fallback

use folio_core::capability::max_width_query;
use folio_core::{Environment, Fallback, SceneError, Subscription};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, MediaQueryListEvent};

/// CSS class of the element inserted for a notice fallback
const FALLBACK_CLASS: &str = "folio-fallback";

/// [`Environment`] backed by the page's `window`
pub struct BrowserEnvironment {
    window: Option<web_sys::Window>,
}

impl BrowserEnvironment {
    pub fn new() -> Self {
        Self {
            window: web_sys::window(),
        }
    }
}

impl Environment for BrowserEnvironment {
    fn user_agent(&self) -> Option<String> {
        self.window.as_ref()?.navigator().user_agent().ok()
    }

    fn viewport_width(&self) -> Option<f64> {
        self.window.as_ref()?.inner_width().ok()?.as_f64()
    }

    fn watch_max_width(&self, max_width: f64, mut on_change: Box<dyn FnMut(bool)>) -> Option<Subscription> {
        let window = self.window.as_ref()?;
        let query = window.match_media(&max_width_query(max_width)).ok()??;

        let closure = Closure::<dyn FnMut(MediaQueryListEvent)>::new(move |event: MediaQueryListEvent| {
            on_change(event.matches());
        });

        if let Err(e) = query.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref()) {
            tracing::warn!("Failed to watch viewport width: {:?}", e);
            return None;
        }

        Some(Subscription::new(move || {
            if let Err(e) = query.remove_event_listener_with_callback("change", closure.as_ref().unchecked_ref()) {
                tracing::warn!("Failed to remove viewport watch: {:?}", e);
            }
            drop(closure);
        }))
    }
}

/// Check that the canvas exists and the browser can hand out a GPU context.
///
/// The probe uses a detached canvas so the real one stays free for the renderer.
pub fn probe_graphics_surface(canvas_selector: &str) -> Result<(), SceneError> {
    let window = web_sys::window().ok_or_else(|| SceneError::SurfaceUnavailable("no window".to_string()))?;
    let document = window
        .document()
        .ok_or_else(|| SceneError::SurfaceUnavailable("no document".to_string()))?;

    match document.query_selector(canvas_selector) {
        Ok(Some(_)) => {}
        _ => {
            return Err(SceneError::SurfaceUnavailable(format!(
                "canvas {} not found",
                canvas_selector
            )))
        }
    }

    probe_context(&window, &document)
}

#[cfg(feature = "webgl2")]
fn probe_context(_window: &web_sys::Window, document: &web_sys::Document) -> Result<(), SceneError> {
    let canvas: web_sys::HtmlCanvasElement = document
        .create_element("canvas")
        .ok()
        .and_then(|el| el.dyn_into().ok())
        .ok_or_else(|| SceneError::SurfaceUnavailable("cannot create probe canvas".to_string()))?;

    match canvas.get_context("webgl2") {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(SceneError::SurfaceUnavailable("WebGL2 not supported".to_string())),
        Err(e) => Err(SceneError::SurfaceUnavailable(format!("WebGL2 probe failed: {:?}", e))),
    }
}

#[cfg(not(feature = "webgl2"))]
fn probe_context(window: &web_sys::Window, _document: &web_sys::Document) -> Result<(), SceneError> {
    let gpu = js_sys::Reflect::get(&window.navigator(), &JsValue::from_str("gpu"))
        .map_err(|e| SceneError::SurfaceUnavailable(format!("WebGPU probe failed: {:?}", e)))?;

    if gpu.is_undefined() || gpu.is_null() {
        return Err(SceneError::SurfaceUnavailable("WebGPU not supported".to_string()));
    }
    Ok(())
}

/// Replace the canvas with the fallback. Best effort; never panics.
pub fn show_fallback(canvas_selector: &str, fallback: &Fallback) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };

    let canvas = match document.query_selector(canvas_selector) {
        Ok(Some(canvas)) => canvas,
        _ => {
            tracing::warn!("Fallback: canvas {} not found", canvas_selector);
            return;
        }
    };

    // Keep the layout slot, drop the pixels
    if let Some(canvas) = canvas.dyn_ref::<HtmlElement>() {
        let _ = canvas.style().set_property("visibility", "hidden");
    }

    let Fallback::Notice(text) = fallback else {
        return;
    };

    // Only one notice, even if several failures land here
    if let Ok(Some(_)) = document.query_selector(&format!(".{}", FALLBACK_CLASS)) {
        return;
    }

    let notice = match document.create_element("p") {
        Ok(el) => el,
        Err(e) => {
            tracing::error!("Fallback: failed to create notice element: {:?}", e);
            return;
        }
    };
    notice.set_class_name(FALLBACK_CLASS);
    notice.set_text_content(Some(text));

    if let Some(parent) = canvas.parent_node() {
        if let Err(e) = parent.append_child(&notice) {
            tracing::error!("Fallback: failed to append notice: {:?}", e);
        }
    }
}
