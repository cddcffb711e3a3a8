//! Flat view: beads on the closed curve
//!
//! Each frame the bead entities are placed on the curve samples by array
//! position and turned to face outward. The chain skin is rebuilt when the
//! curve or the style changes.

use beadchain_config::LayoutConfig;
use beadchain_ipc::{ChainStyle, ViewMode};
use bevy::prelude::*;
use chain::{
    ChainCurve, ChainSkin, ControlPoints, PlacedBead, SlotSample, chain_height, chain_skin,
    layout_slots, sweep_tube,
};

use crate::bead_mesh::{skin_material, tube_mesh};
use crate::store::{ActiveViewMode, ChainStoreResource};
use crate::visuals::{BeadVisual, ChainVisualsSet, SELECTED_SCALE};

const PREVIEW_RADIUS: f32 = 0.05;
const PREVIEW_COLOR: Color = Color::srgba(0.388, 0.702, 1.0, 0.3);

/// Entity belonging to the rendered chain skin
#[derive(Component)]
pub struct ChainSkinPart;

pub struct FlatChainPlugin;

impl Plugin for FlatChainPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                place_flat_beads.in_set(ChainVisualsSet::Place),
                rebuild_chain_skin.in_set(ChainVisualsSet::Place),
                draw_preview_slots.after(ChainVisualsSet::Place),
            ),
        );
    }
}

/// Transform of a bead resting on `sample`
pub fn flat_bead_transform(sample: &SlotSample, placed: &PlacedBead, selected: bool) -> Transform {
    let [x, y, z] = placed.rotation;
    let rotation = Quat::from_rotation_y(sample.angle) * Quat::from_euler(EulerRot::XYZ, x, y, z);
    let scale = if selected {
        placed.scale * SELECTED_SCALE
    } else {
        placed.scale
    };
    Transform::from_translation(sample.position)
        .with_rotation(rotation)
        .with_scale(Vec3::splat(scale))
}

fn place_flat_beads(
    store: Res<ChainStoreResource>,
    view: Res<ActiveViewMode>,
    layout_config: Res<LayoutConfig>,
    mut beads: Query<(&BeadVisual, &mut Transform)>,
) {
    if view.mode != ViewMode::Flat {
        return;
    }
    let store = store.store();
    let placed = store.beads();
    if placed.is_empty() {
        return;
    }

    let layout = layout_slots(store.control_points(), placed.len(), &layout_config);
    for (visual, mut transform) in beads.iter_mut() {
        let (Some(sample), Some(bead)) = (layout.samples.get(visual.index), placed.get(visual.index))
        else {
            continue;
        };
        let selected = store.selected() == Some(bead.slot);
        *transform = flat_bead_transform(sample, bead, selected);
    }
}

/// Rebuild the skin meshes when the curve or style changes; none in hanging view
fn rebuild_chain_skin(
    mut commands: Commands,
    store: Res<ChainStoreResource>,
    view: Res<ActiveViewMode>,
    layout_config: Res<LayoutConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    parts: Query<Entity, With<ChainSkinPart>>,
    mut built: Local<Option<(ControlPoints, ChainStyle)>>,
) {
    let key = (view.mode == ViewMode::Flat)
        .then(|| (store.store().control_points().clone(), store.store().style()));
    if *built == key {
        return;
    }

    for entity in parts.iter() {
        commands.entity(entity).despawn();
    }
    *built = key;
    let Some((control_points, style)) = built.as_ref() else {
        return;
    };

    let curve = ChainCurve::new(control_points);
    match chain_skin(*style, &curve, &layout_config) {
        ChainSkin::Tube { layers } => {
            for layer in layers {
                let geometry = sweep_tube(
                    &curve,
                    layout_config.tubular_segments,
                    layer.radius,
                    layer.radial_segments,
                );
                commands.spawn((
                    Mesh3d(meshes.add(tube_mesh(&geometry))),
                    MeshMaterial3d(materials.add(skin_material(&layer.material))),
                    Transform::default(),
                    ChainSkinPart,
                    Name::new("Chain tube"),
                ));
            }
        }
        ChainSkin::Links { shape, links } => {
            let wire = sweep_tube(
                &shape.centerline(),
                shape.wire_segments,
                shape.wire_radius,
                shape.radial_segments,
            );
            let mesh = meshes.add(tube_mesh(&wire));
            let material = materials.add(skin_material(&shape.material));
            for link in &links {
                commands.spawn((
                    Mesh3d(mesh.clone()),
                    MeshMaterial3d(material.clone()),
                    Transform::from_translation(link.position).with_rotation(link.rotation()),
                    ChainSkinPart,
                    Name::new("Chain link"),
                ));
            }
        }
    }
    debug!("Rebuilt {:?} chain skin", style);
}

/// Faint markers where beads will go while the chain is empty
fn draw_preview_slots(
    store: Res<ChainStoreResource>,
    view: Res<ActiveViewMode>,
    layout_config: Res<LayoutConfig>,
    mut gizmos: Gizmos,
) {
    let store = store.store();
    if view.mode != ViewMode::Flat || !store.beads().is_empty() || store.is_edit_mode() {
        return;
    }

    let layout = layout_slots(store.control_points(), 0, &layout_config);
    let height = chain_height(store.catalog().beads());
    for sample in &layout.samples {
        let position = Vec3::new(sample.position.x, height, sample.position.z);
        gizmos.sphere(Isometry3d::from_translation(position), PREVIEW_RADIUS, PREVIEW_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    fn sample(angle: f32) -> SlotSample {
        SlotSample {
            t: 0.25,
            position: Vec3::new(0.0, 0.21, 2.5),
            angle,
        }
    }

    #[test]
    fn test_bead_faces_outward() {
        let bead = PlacedBead::new("a", 0);
        let transform = flat_bead_transform(&sample(FRAC_PI_2), &bead, false);
        // Local +Z turns to world +X
        let facing = transform.rotation * Vec3::Z;
        assert!((facing - Vec3::X).length() < 1e-5);
        assert_eq!(transform.translation, Vec3::new(0.0, 0.21, 2.5));
        assert_eq!(transform.scale, Vec3::ONE);
    }

    #[test]
    fn test_selected_bead_is_enlarged() {
        let mut bead = PlacedBead::new("a", 0);
        bead.scale = 2.0;
        let transform = flat_bead_transform(&sample(0.0), &bead, true);
        assert!((transform.scale.x - 2.3).abs() < 1e-5);
    }

    #[test]
    fn test_instance_rotation_applies_after_facing() {
        let mut bead = PlacedBead::new("a", 0);
        bead.rotation = [FRAC_PI_2, 0.0, 0.0];
        let transform = flat_bead_transform(&sample(0.0), &bead, false);
        let up = transform.rotation * Vec3::Y;
        assert!((up - Vec3::Z).length() < 1e-5);
    }
}
