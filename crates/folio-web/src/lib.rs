//! Folio Web - WebAssembly front end for the portfolio site
//!
//! Renders the desktop-computer model with Bevy into the page canvas and
//! overlays the page navigation with egui. The whole scene sits behind a
//! failure boundary: if the GPU surface is missing or the renderer dies, the
//! canvas is hidden and the rest of the page keeps working.

mod app;
mod boundary;
mod browser;
mod host;
mod models;
mod scene;
mod target;
mod ui;

use folio_core::{FailureBoundary, Fallback, Rendered, SiteConfig, SiteContent};
use wasm_bindgen::prelude::*;

/// Entry point for WASM module
#[wasm_bindgen(start)]
pub fn main() {
    let config = SiteConfig::embedded(option_env!("FOLIO_BASE_PATH"));
    let config_error = config.as_ref().err().map(ToString::to_string);
    let config = config.unwrap_or_default();

    // Renderer panics abort the module; keep the page intact when that happens
    install_panic_hook(config.scene.canvas.clone(), config.scene.fallback.clone());

    // Initialize logging with filtering to reduce wgpu noise
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(config.log_level())
            .build(),
    );

    if let Some(error) = config_error {
        tracing::error!("Embedded site configuration rejected, using defaults: {}", error);
    }

    let content = SiteContent::embedded().unwrap_or_else(|e| {
        tracing::error!("Embedded page content rejected: {}", e);
        SiteContent::default()
    });

    let mut surface = FailureBoundary::new("surface", config.scene.fallback.clone());
    match surface.render(|| browser::probe_graphics_surface(&config.scene.canvas)) {
        Rendered::Subtree(()) => app::run(config, content),
        Rendered::Fallback(fallback) => browser::show_fallback(&config.scene.canvas, &fallback),
    }
}

fn install_panic_hook(canvas: String, fallback: Fallback) {
    std::panic::set_hook(Box::new(move |info| {
        console_error_panic_hook::hook(info);
        browser::show_fallback(&canvas, &fallback);
    }));
}
