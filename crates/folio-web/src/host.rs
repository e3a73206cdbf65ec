//! Scene host wiring: capability polling, render configuration, and unmount

use std::ops::{Deref, DerefMut};

use bevy::prelude::*;
use bevy::winit::WinitSettings;
use folio_core::{FrameLoop, RenderConfiguration, SceneHost};

use crate::boundary::boundary_healthy;

pub struct HostPlugin;

impl Plugin for HostPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PreUpdate, refresh_render_config.run_if(boundary_healthy))
            .add_systems(Last, unmount_on_exit);
    }
}

/// The mounted scene host. Holds browser callbacks, so it stays on the main thread.
pub struct ActiveHost(pub SceneHost<Handle<Scene>>);

impl Deref for ActiveHost {
    type Target = SceneHost<Handle<Scene>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for ActiveHost {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// Render configuration for the current capability class
#[derive(Debug, Clone, Copy, PartialEq, Resource)]
pub struct ActiveRenderConfig(pub RenderConfiguration);

/// Winit update mode for a frame-loop setting
pub fn winit_settings(frame_loop: FrameLoop) -> WinitSettings {
    match frame_loop {
        FrameLoop::Continuous => WinitSettings::game(),
        FrameLoop::OnDemand => WinitSettings::desktop_app(),
    }
}

/// Pick up viewport changes and rebuild the configuration from the current class
fn refresh_render_config(mut host: NonSendMut<ActiveHost>, mut active: ResMut<ActiveRenderConfig>) {
    host.poll_viewport();
    let next = host.render_configuration();
    if active.0 != next {
        tracing::info!(
            low_power = host.class().is_low_power_device(),
            "Render configuration changed"
        );
        active.0 = next;
    }
}

fn unmount_on_exit(mut exits: MessageReader<AppExit>, mut host: NonSendMut<ActiveHost>) {
    if exits.read().next().is_some() && host.is_mounted() {
        host.unmount();
    }
}
