//! 3D scene: camera, lights, and locked-elevation orbit control

use bevy::camera::RenderTarget;
use bevy::input::mouse::AccumulatedMouseMotion;
use bevy::prelude::*;
use bevy::window::RequestRedraw;
use bevy_egui::EguiContexts;
use folio_core::render_config::{
    CAMERA_FOV_DEGREES, CAMERA_POSITION, CLEAR_RGBA, SPOT_LIGHT_ANGLE, SPOT_LIGHT_POSITION,
};
use folio_core::{Lighting, OrbitController, SceneError};

use crate::boundary::{boundary_healthy, contain_failure, SceneSubtree};
use crate::host::{winit_settings, ActiveRenderConfig};
use crate::target::SceneTarget;

// Scene-relative light intensity (1.0 = plain white light) to Bevy photometric units
const AMBIENT_BRIGHTNESS_SCALE: f32 = 1_000.0;
const SPOT_LUMENS_SCALE: f32 = 4_000_000.0;
const POINT_LUMENS_SCALE: f32 = 100_000.0;

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_scene).add_systems(
            Update,
            (
                apply_render_config
                    .pipe(contain_failure)
                    .run_if(resource_changed::<ActiveRenderConfig>),
                orbit_camera.pipe(contain_failure),
            )
                .chain()
                .run_if(boundary_healthy),
        );
    }
}

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

#[derive(Component)]
pub struct KeySpotLight;

#[derive(Component)]
pub struct FillPointLight;

/// Orbit state for the main camera
#[derive(Resource)]
pub struct Orbit(pub OrbitController);

fn msaa_for(antialias: bool) -> Msaa {
    if antialias {
        Msaa::Sample4
    } else {
        Msaa::Off
    }
}

/// Transparent clear colour shared by every camera
pub(crate) fn clear_color() -> Color {
    let [r, g, b, a] = CLEAR_RGBA;
    Color::srgba(r, g, b, a)
}

pub(crate) fn ambient_light(lighting: Lighting) -> AmbientLight {
    AmbientLight {
        color: Color::WHITE,
        brightness: lighting.hemisphere * AMBIENT_BRIGHTNESS_SCALE,
        ..default()
    }
}

fn camera_transform(orbit: &OrbitController) -> Transform {
    Transform::from_translation(Vec3::from_array(orbit.position()))
        .looking_at(Vec3::from_array(orbit.target()), Vec3::Y)
}

fn setup_scene(mut commands: Commands, config: Res<ActiveRenderConfig>, target: Res<SceneTarget>) {
    let render = config.0;
    let orbit = OrbitController::new(CAMERA_POSITION, [0.0; 3], render.damping);

    // Framing is the same for every capability class; the page always shows through
    commands.spawn((
        Camera3d::default(),
        Camera {
            target: RenderTarget::Image(target.image.clone().into()),
            clear_color: ClearColorConfig::Custom(clear_color()),
            ..default()
        },
        Projection::Perspective(PerspectiveProjection {
            fov: CAMERA_FOV_DEGREES.to_radians(),
            ..default()
        }),
        msaa_for(render.antialias),
        camera_transform(&orbit),
        MainCamera,
    ));
    commands.insert_resource(Orbit(orbit));
    commands.insert_resource(ambient_light(render.lighting));

    commands
        .spawn((SceneSubtree, Transform::default(), Visibility::default()))
        .with_children(|parent| {
            parent.spawn((
                SpotLight {
                    intensity: render.lighting.spot * SPOT_LUMENS_SCALE,
                    outer_angle: SPOT_LIGHT_ANGLE,
                    // Full penumbra
                    inner_angle: 0.0,
                    range: 100.0,
                    shadows_enabled: false,
                    ..default()
                },
                Transform::from_translation(Vec3::from_array(SPOT_LIGHT_POSITION)).looking_at(Vec3::ZERO, Vec3::Y),
                KeySpotLight,
            ));
            parent.spawn((
                PointLight {
                    intensity: render.lighting.point * POINT_LUMENS_SCALE,
                    shadows_enabled: false,
                    ..default()
                },
                Transform::default(),
                FillPointLight,
            ));
        });

    tracing::info!(
        antialias = render.antialias,
        frame_loop = ?render.frame_loop,
        "Scene surface created"
    );
}

/// Re-apply everything except the power preference, which is fixed at adapter selection.
/// The pixel-ratio ceiling is picked up by the scene image resize.
fn apply_render_config(
    mut commands: Commands,
    config: Res<ActiveRenderConfig>,
    cameras: Query<Entity, With<MainCamera>>,
    mut spot_lights: Query<&mut SpotLight, With<KeySpotLight>>,
    mut point_lights: Query<&mut PointLight, With<FillPointLight>>,
    mut orbit: ResMut<Orbit>,
) -> Result<(), SceneError> {
    let render = config.0;

    let camera_entity = cameras
        .single()
        .map_err(|_| SceneError::MissingEntity("main camera"))?;
    commands.entity(camera_entity).insert(msaa_for(render.antialias));

    commands.insert_resource(winit_settings(render.frame_loop));
    commands.insert_resource(ambient_light(render.lighting));

    for mut light in &mut spot_lights {
        light.intensity = render.lighting.spot * SPOT_LUMENS_SCALE;
    }
    for mut light in &mut point_lights {
        light.intensity = render.lighting.point * POINT_LUMENS_SCALE;
    }

    orbit.0.set_damping(render.damping);
    Ok(())
}

/// Horizontal drag rotates the camera around the model; no zoom, no tilt
fn orbit_camera(
    mut orbit: ResMut<Orbit>,
    mut cameras: Query<&mut Transform, With<MainCamera>>,
    windows: Query<&Window>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    touches: Res<Touches>,
    mut contexts: EguiContexts,
    mut redraw: MessageWriter<RequestRedraw>,
) -> Result<(), SceneError> {
    let egui_wants_pointer = contexts
        .ctx_mut()
        .map(|ctx| ctx.wants_pointer_input())
        .unwrap_or(false);
    let height = windows.single().map(|w| w.height()).unwrap_or(0.0);

    if !egui_wants_pointer {
        if mouse_button.pressed(MouseButton::Left) && mouse_motion.delta.x != 0.0 {
            orbit.0.drag(mouse_motion.delta.x, height);
        }

        // Single-finger drag only
        if touches.iter().count() == 1 {
            for touch in touches.iter() {
                orbit.0.drag(touch.delta().x, height);
            }
        }
    }

    if !orbit.0.update() {
        return Ok(());
    }

    let mut transform = cameras
        .single_mut()
        .map_err(|_| SceneError::MissingEntity("main camera"))?;
    *transform = camera_transform(&orbit.0);

    // Keep on-demand rendering alive until the motion settles
    redraw.write(RequestRedraw);
    Ok(())
}
