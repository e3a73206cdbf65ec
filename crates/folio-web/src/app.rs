//! Bevy application setup

use bevy::asset::AssetMetaCheck;
use bevy::prelude::*;
use bevy::render::settings::{PowerPreference as AdapterPower, WgpuSettings};
use bevy::render::RenderPlugin;
use bevy_egui::{EguiGlobalSettings, EguiPlugin};
use bevy_picking::DefaultPickingPlugins;
use folio_core::{PowerPreference, SceneHost, SiteConfig, SiteContent};

use crate::boundary::BoundaryPlugin;
use crate::browser::BrowserEnvironment;
use crate::host::{winit_settings, ActiveHost, ActiveRenderConfig, HostPlugin};
use crate::models::ModelsPlugin;
use crate::scene::{clear_color, ScenePlugin};
use crate::target::SceneTargetPlugin;
use crate::ui::{PageContent, UiPlugin};

fn adapter_power(preference: PowerPreference) -> AdapterPower {
    match preference {
        PowerPreference::LowPower => AdapterPower::LowPower,
        PowerPreference::HighPerformance => AdapterPower::HighPerformance,
    }
}

/// Run the Bevy application
pub fn run(config: SiteConfig, content: SiteContent) {
    let host = SceneHost::mount(&BrowserEnvironment::new(), &config);
    let render = host.render_configuration();

    tracing::info!(
        low_power = host.class().is_low_power_device(),
        model = host.loader().path(),
        "Mounting scene"
    );

    App::new()
        .insert_resource(ClearColor(clear_color()))
        .insert_resource(winit_settings(render.frame_loop))
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Portfolio".to_string(),
                        canvas: Some(config.scene.canvas.clone()),
                        fit_canvas_to_parent: true,
                        transparent: true,
                        prevent_default_event_handling: false,
                        ..default()
                    }),
                    ..default()
                })
                .set(AssetPlugin {
                    // Asset paths already carry the deploy base path
                    file_path: "".to_string(),
                    // Static hosting has no .meta files
                    meta_check: AssetMetaCheck::Never,
                    ..default()
                })
                .set(RenderPlugin {
                    // Adapter choice cannot change after startup
                    render_creation: WgpuSettings {
                        power_preference: adapter_power(render.power_preference),
                        ..default()
                    }
                    .into(),
                    ..default()
                }),
        )
        // Picking must be registered before EguiPlugin
        .add_plugins(DefaultPickingPlugins)
        // egui draws on the window camera, not on the offscreen scene camera
        .insert_resource(EguiGlobalSettings {
            auto_create_primary_context: false,
            ..default()
        })
        .add_plugins(EguiPlugin::default())
        .insert_resource(ActiveRenderConfig(render))
        .insert_resource(PageContent(content))
        .insert_non_send_resource(ActiveHost(host))
        .add_plugins(HostPlugin)
        .add_plugins(BoundaryPlugin)
        .add_plugins(SceneTargetPlugin)
        .add_plugins(ScenePlugin)
        .add_plugins(ModelsPlugin)
        .add_plugins(UiPlugin)
        .run();
}
