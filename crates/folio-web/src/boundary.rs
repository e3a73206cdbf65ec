//! Failure boundary around the scene subtree
//!
//! Scene systems return `Result<(), SceneError>` and are piped into
//! [`contain_failure`]. Once the boundary trips, the subtree is despawned
//! once and every supervised system stops running.

use bevy::prelude::*;
use folio_core::{FrameLoop, SceneError};

use crate::host::{winit_settings, ActiveHost};
use crate::models::PendingModel;
use crate::scene::ambient_light;

pub struct BoundaryPlugin;

impl Plugin for BoundaryPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PostUpdate, apply_fallback.run_if(boundary_tripped));
    }
}

/// Root entity of everything the boundary supervises (lights and model)
#[derive(Component)]
pub struct SceneSubtree;

/// Pipe target for supervised systems
pub fn contain_failure(In(result): In<Result<(), SceneError>>, mut host: NonSendMut<ActiveHost>) {
    host.boundary_mut().observe(result, "scene system");
}

pub fn boundary_healthy(host: NonSend<ActiveHost>) -> bool {
    !host.boundary().is_tripped()
}

pub fn boundary_tripped(host: NonSend<ActiveHost>) -> bool {
    host.boundary().is_tripped()
}

/// Tear the subtree down after a trip; the camera keeps clearing to transparent.
/// Ambient light is a resource, not part of the subtree, so it is switched off here.
fn apply_fallback(
    mut commands: Commands,
    mut applied: Local<bool>,
    host: NonSend<ActiveHost>,
    subtree: Query<Entity, With<SceneSubtree>>,
) {
    if *applied {
        return;
    }
    *applied = true;

    for entity in &subtree {
        commands.entity(entity).despawn();
    }
    commands.remove_resource::<PendingModel>();
    commands.insert_resource(ambient_light(host.lighting()));
    commands.insert_resource(winit_settings(FrameLoop::OnDemand));
    tracing::warn!("Scene subtree removed; fallback active");
}
