//! Hanging view: beads simulated between two anchors
//!
//! The simulator is kept in line with the store and stepped on the fixed
//! timestep. Bead entities take the latest body poses during `Update`.

use beadchain_config::PhysicsConfig;
use beadchain_ipc::ViewMode;
use bevy::prelude::*;
use chain::{BodySpec, BodyTransform, ChainSimulator, ChainStore, ChainTopology, PlacedBead, SyncOutcome};

use crate::store::{ActiveViewMode, ChainStoreResource};
use crate::visuals::{BeadVisual, ChainVisualsSet, SELECTED_SCALE};

const CONNECTOR_RADIUS: f32 = 0.02;

/// The hanging chain simulation
#[derive(Resource, Debug)]
pub struct SimulatorResource(pub ChainSimulator);

/// Body poses from the latest simulation step, in bead order
#[derive(Resource, Debug, Default)]
pub struct HangingPose(pub Vec<BodyTransform>);

/// Anchor marker entity
#[derive(Component)]
pub struct AnchorMarker;

/// Straight connector shown when no beads are strung
#[derive(Component)]
pub struct StaticConnector;

pub struct HangingChainPlugin;

impl Plugin for HangingChainPlugin {
    fn build(&self, app: &mut App) {
        let config = app
            .world()
            .get_resource::<PhysicsConfig>()
            .cloned()
            .unwrap_or_default();

        app.insert_resource(Time::<Fixed>::from_seconds(config.timestep as f64))
            .insert_resource(SimulatorResource(ChainSimulator::new(config)))
            .init_resource::<HangingPose>()
            .add_systems(Startup, spawn_anchors)
            .add_systems(FixedUpdate, step_hanging_chain)
            .add_systems(
                Update,
                (
                    place_hanging_beads.in_set(ChainVisualsSet::Place),
                    update_anchor_visibility.in_set(ChainVisualsSet::Place),
                ),
            );
    }
}

/// Body specs for the current beads, in chain order
pub fn body_specs(store: &ChainStore, config: &PhysicsConfig) -> Vec<BodySpec> {
    store
        .beads()
        .iter()
        .map(|placed| BodySpec::for_bead(&store.resolve_bead(placed), placed, config))
        .collect()
}

/// Transform of a bead following its body
pub fn hanging_bead_transform(pose: &BodyTransform, placed: &PlacedBead, selected: bool) -> Transform {
    let [x, y, z] = placed.rotation;
    let scale = if selected {
        placed.scale * SELECTED_SCALE
    } else {
        placed.scale
    };
    Transform::from_translation(pose.position)
        .with_rotation(pose.rotation * Quat::from_euler(EulerRot::XYZ, x, y, z))
        .with_scale(Vec3::splat(scale))
}

fn step_hanging_chain(
    store: Res<ChainStoreResource>,
    view: Res<ActiveViewMode>,
    time: Res<Time>,
    mut simulator: ResMut<SimulatorResource>,
    mut pose: ResMut<HangingPose>,
) {
    if view.mode != ViewMode::Hanging {
        return;
    }

    let specs = body_specs(store.store(), simulator.0.config());
    match simulator.0.sync(&specs) {
        SyncOutcome::Rebuilt => info!("Hanging chain rebuilt with {} beads", specs.len()),
        SyncOutcome::Updated => debug!("Hanging chain bodies updated in place"),
        SyncOutcome::Unchanged => {}
    }

    pose.0 = simulator.0.step(time.delta_secs());
}

fn place_hanging_beads(
    store: Res<ChainStoreResource>,
    view: Res<ActiveViewMode>,
    pose: Res<HangingPose>,
    mut beads: Query<(&BeadVisual, &mut Transform)>,
) {
    if view.mode != ViewMode::Hanging {
        return;
    }
    let store = store.store();
    let placed = store.beads();
    // Poses lag one fixed step behind a structural change
    if pose.0.len() != placed.len() {
        return;
    }

    for (visual, mut transform) in beads.iter_mut() {
        let (Some(body), Some(bead)) = (pose.0.get(visual.index), placed.get(visual.index)) else {
            continue;
        };
        let selected = store.selected() == Some(bead.slot);
        *transform = hanging_bead_transform(body, bead, selected);
    }
}

/// Transform that stretches a Y-aligned unit cylinder from `from` to `to`
pub fn connector_transform(from: Vec3, to: Vec3) -> Transform {
    let span = to - from;
    let length = span.length();
    let direction = span.normalize_or(Vec3::X);
    Transform::from_translation((from + to) / 2.0)
        .with_rotation(Quat::from_rotation_arc(Vec3::Y, direction))
        .with_scale(Vec3::new(1.0, length, 1.0))
}

fn spawn_anchors(
    mut commands: Commands,
    simulator: Res<SimulatorResource>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let simulator = &simulator.0;
    let anchor_mesh = meshes.add(Sphere::new(simulator.config().anchor_radius).mesh().uv(16, 16));
    let anchor_material = materials.add(StandardMaterial {
        base_color: Color::srgb(1.0, 0.843, 0.0),
        metallic: 0.9,
        perceptual_roughness: 0.2,
        ..default()
    });
    for (name, position) in [
        ("Left anchor", simulator.left_anchor()),
        ("Right anchor", simulator.right_anchor()),
    ] {
        commands.spawn((
            Mesh3d(anchor_mesh.clone()),
            MeshMaterial3d(anchor_material.clone()),
            Transform::from_translation(position),
            Visibility::Hidden,
            AnchorMarker,
            Name::new(name),
        ));
    }

    commands.spawn((
        Mesh3d(meshes.add(Cylinder::new(CONNECTOR_RADIUS, 1.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.753, 0.753, 0.753),
            metallic: 0.9,
            perceptual_roughness: 0.3,
            ..default()
        })),
        connector_transform(simulator.left_anchor(), simulator.right_anchor()),
        Visibility::Hidden,
        StaticConnector,
        Name::new("Static connector"),
    ));
}

fn update_anchor_visibility(
    view: Res<ActiveViewMode>,
    simulator: Res<SimulatorResource>,
    mut anchors: Query<&mut Visibility, (With<AnchorMarker>, Without<StaticConnector>)>,
    mut connector: Query<&mut Visibility, (With<StaticConnector>, Without<AnchorMarker>)>,
) {
    let hanging = view.mode == ViewMode::Hanging;
    let shown = |visible: bool| {
        if visible {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        }
    };

    for mut visibility in anchors.iter_mut() {
        visibility.set_if_neq(shown(hanging));
    }

    let is_static = matches!(simulator.0.topology(), ChainTopology::Static { .. });
    for mut visibility in connector.iter_mut() {
        visibility.set_if_neq(shown(hanging && is_static));
    }
}

#[cfg(test)]
mod tests {
    use beadchain_ipc::{Bead, BeadMaterial, BeadPatch, BeadShape};

    use super::*;

    #[test]
    fn test_specs_follow_catalog_weight_and_scale() {
        // Weights are in grams, masses in kilograms
        let config = PhysicsConfig::default();
        let mut store = ChainStore::new();
        let heavy = Bead::new("h", "Heavy", BeadMaterial::MetalGold, BeadShape::Sphere, "#FFD700")
            .with_weight(25.0);
        store.set_catalog(vec![heavy.clone()]);
        store.add_bead(&heavy, 0);
        store.add_bead(&heavy, 1);
        store.update_bead(1, &BeadPatch::scale(2.0));

        let specs = body_specs(&store, &config);
        assert_eq!(specs.len(), 2);
        assert!((specs[0].mass - 0.025).abs() < 1e-6);
        assert!((specs[0].radius - 0.2).abs() < 1e-6);
        assert!((specs[1].radius - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_connector_spans_anchors() {
        let from = Vec3::new(-2.5, 3.0, 0.0);
        let to = Vec3::new(2.5, 3.0, 0.0);
        let transform = connector_transform(from, to);
        assert_eq!(transform.translation, Vec3::new(0.0, 3.0, 0.0));
        assert!((transform.scale.y - 5.0).abs() < 1e-6);
        let axis = transform.rotation * Vec3::Y;
        assert!((axis - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_bead_follows_body() {
        let pose = BodyTransform {
            position: Vec3::new(1.0, 2.0, 0.0),
            rotation: Quat::IDENTITY,
        };
        let bead = PlacedBead::new("a", 3);
        let transform = hanging_bead_transform(&pose, &bead, true);
        assert_eq!(transform.translation, pose.position);
        assert!((transform.scale.x - SELECTED_SCALE).abs() < 1e-6);
    }
}
