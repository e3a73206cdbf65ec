//! Offscreen scene image for the pixel-ratio ceiling
//!
//! The window keeps the browser's own scale factor, so the canvas always
//! fills its parent. The 3D camera draws into an image sized at the clamped
//! ratio, and egui stretches that image over the whole window.

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat, TextureUsages};
use bevy::window::PrimaryWindow;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass, EguiTextureHandle, PrimaryEguiContext};

use crate::host::ActiveRenderConfig;
use crate::scene::clear_color;

pub struct SceneTargetPlugin;

impl Plugin for SceneTargetPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SceneTarget>()
            .add_systems(Startup, spawn_display_camera)
            .add_systems(Update, resize_scene_target)
            .add_systems(EguiPrimaryContextPass, paint_scene_target);
    }
}

/// Image the main camera renders into
#[derive(Resource)]
pub struct SceneTarget {
    pub image: Handle<Image>,
}

impl FromWorld for SceneTarget {
    fn from_world(world: &mut World) -> Self {
        // Resized to the window on the first update
        let mut image = Image::new_fill(
            Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
            TextureDimension::D2,
            &[0, 0, 0, 0],
            TextureFormat::Rgba8UnormSrgb,
            RenderAssetUsages::default(),
        );
        image.texture_descriptor.usage =
            TextureUsages::RENDER_ATTACHMENT | TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST;

        let image = world.resource_mut::<Assets<Image>>().add(image);
        Self { image }
    }
}

/// Window camera that only hosts the egui pass
fn spawn_display_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Camera {
            order: 1,
            clear_color: ClearColorConfig::Custom(clear_color()),
            ..default()
        },
        Msaa::Off,
        PrimaryEguiContext,
    ));
}

/// Keep the image at logical size × effective pixel ratio
fn resize_scene_target(
    config: Res<ActiveRenderConfig>,
    target: Res<SceneTarget>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut images: ResMut<Assets<Image>>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let [width, height] =
        config
            .0
            .render_target_size(window.width(), window.height(), f64::from(window.scale_factor()));

    let current = match images.get(&target.image) {
        Some(image) => image.texture_descriptor.size,
        None => return,
    };
    if current.width == width && current.height == height {
        return;
    }

    if let Some(image) = images.get_mut(&target.image) {
        image.resize(Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        });
        tracing::debug!(width, height, "Scene image resized");
    }
}

fn paint_scene_target(mut contexts: EguiContexts, target: Res<SceneTarget>) {
    let texture = contexts.add_image(EguiTextureHandle::Strong(target.image.clone()));
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    let rect = ctx.screen_rect();
    let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
    ctx.layer_painter(egui::LayerId::background())
        .image(texture, rect, uv, egui::Color32::WHITE);
}
