//! Desktop-computer model loading and placement

use bevy::asset::LoadState;
use bevy::gltf::Gltf;
use bevy::prelude::*;
use folio_core::model::ResolveOutcome;
use folio_core::{LoadTicket, Placement, Resolution, SceneError};

use crate::boundary::{boundary_healthy, contain_failure, SceneSubtree};
use crate::host::ActiveHost;

pub struct ModelsPlugin;

impl Plugin for ModelsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, start_model_load)
            .add_systems(
                Update,
                poll_model_load
                    .pipe(contain_failure)
                    .run_if(resource_exists::<PendingModel>)
                    .run_if(boundary_healthy),
            );
    }
}

/// The in-flight glTF request
#[derive(Resource)]
pub struct PendingModel {
    handle: Handle<Gltf>,
    ticket: LoadTicket,
}

fn placement_transform(placement: Placement) -> Transform {
    let [rx, ry, rz] = placement.rotation;
    Transform::from_translation(Vec3::from_array(placement.position))
        .with_rotation(Quat::from_euler(EulerRot::XYZ, rx, ry, rz))
        .with_scale(Vec3::splat(placement.scale))
}

fn start_model_load(mut commands: Commands, mut host: NonSendMut<ActiveHost>, asset_server: Res<AssetServer>) {
    let Some(ticket) = host.begin_load() else {
        return;
    };
    let handle: Handle<Gltf> = asset_server.load(host.loader().path().to_string());
    commands.insert_resource(PendingModel { handle, ticket });
}

/// Check the load state; place the model once, with the class current right now
fn poll_model_load(
    mut commands: Commands,
    mut host: NonSendMut<ActiveHost>,
    pending: Res<PendingModel>,
    asset_server: Res<AssetServer>,
    gltf_assets: Res<Assets<Gltf>>,
    subtree: Query<Entity, With<SceneSubtree>>,
) -> Result<(), SceneError> {
    let resolution = match asset_server.get_load_state(pending.handle.id()) {
        Some(LoadState::Loaded) => {
            // Use the default scene, else the first one
            let scene = gltf_assets
                .get(&pending.handle)
                .and_then(|gltf| gltf.default_scene.clone().or_else(|| gltf.scenes.first().cloned()));
            match scene {
                Some(scene) => Resolution::Scene(scene),
                None => Resolution::Empty,
            }
        }
        Some(LoadState::Failed(err)) => Resolution::Failed(err.to_string()),
        // Still loading
        _ => return Ok(()),
    };

    let ticket = pending.ticket;
    commands.remove_resource::<PendingModel>();

    let scene = match &resolution {
        Resolution::Scene(scene) => Some(scene.clone()),
        _ => None,
    };

    // Empty, failed, or stale results draw nothing and were already logged
    if let (ResolveOutcome::Placed(placement), Some(scene)) = (host.resolve(ticket, resolution), scene) {
        let parent = subtree
            .single()
            .map_err(|_| SceneError::MissingEntity("scene subtree"))?;
        let model = commands
            .spawn((SceneRoot(scene), placement_transform(placement)))
            .id();
        commands.entity(parent).add_child(model);
        tracing::info!(scale = placement.scale, "Computer model placed");
    }
    Ok(())
}
