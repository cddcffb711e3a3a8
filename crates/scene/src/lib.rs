//! Bevy scene for Beadchain
//!
//! This crate renders the chain owned by [`ChainStoreResource`]:
//! - Flat view: beads on the editable closed curve with the style skin
//! - Hanging view: beads simulated between two anchors
//!
//! UI commands arrive as [`UiCommand`] messages and replies are queued in
//! [`OutboundUiMessages`] for the host to forward.

use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::prelude::*;
use beadchain_ipc::SceneToUi;

mod bead_mesh;
mod camera;
mod commands;
mod curve_edit;
mod flat;
mod hanging;
mod lighting;
mod store;
mod visuals;

pub use bead_mesh::{BeadMeshCache, standard_material};
pub use camera::{CameraControllerPlugin, MainCamera, OrbitCamera};
pub use commands::{CommandOutcome, UiCommand, apply_command};
pub use curve_edit::{ControlPointDrag, CurveEditPlugin};
pub use flat::FlatChainPlugin;
pub use hanging::{HangingChainPlugin, SimulatorResource};
pub use lighting::{LightingPlugin, LightingSettings, SceneLighting, SunLight};
pub use store::{ActiveViewMode, ChainStorePlugin, ChainStoreResource, ChainStoreSet};
pub use visuals::{BeadVisual, ChainVisualsPlugin, ChainVisualsSet};

/// Resource for queuing messages to send to the UI
/// The host (app crate) drains this and forwards them
#[derive(Resource, Default)]
pub struct OutboundUiMessages {
    pub messages: Vec<SceneToUi>,
}

impl OutboundUiMessages {
    /// Queue a message to be sent to the UI
    pub fn send(&mut self, msg: SceneToUi) {
        self.messages.push(msg);
    }

    /// Take all queued messages, leaving the queue empty
    pub fn drain(&mut self) -> Vec<SceneToUi> {
        std::mem::take(&mut self.messages)
    }
}

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OutboundUiMessages>();

        app.add_plugins(CameraControllerPlugin);
        app.add_plugins(LightingPlugin);
        app.add_plugins(ChainStorePlugin);
        app.add_plugins(ChainVisualsPlugin);
        app.add_plugins(FlatChainPlugin);
        app.add_plugins(HangingChainPlugin);
        app.add_plugins(CurveEditPlugin);

        app.add_systems(Startup, setup_scene);
    }
}

/// Spawn the camera and the table surface
fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    view: Res<ActiveViewMode>,
) {
    // TonyMcMapFace requires tonemapping_luts which needs zstd
    let orbit_camera = OrbitCamera::for_view(view.mode);
    let camera_position = orbit_camera.calculate_position();
    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(camera_position).looking_at(orbit_camera.target, Vec3::Y),
        Tonemapping::Reinhard,
        MainCamera,
        orbit_camera,
    ));

    // Table the flat chain rests on
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(12.0, 12.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.93, 0.91, 0.88),
            perceptual_roughness: 0.9,
            ..default()
        })),
        Name::new("Table"),
    ));

    info!("Scene initialized in {:?} view", view.mode);
}
