//! Bead entities
//!
//! One entity per placed bead, respawned whenever a placed bead or the
//! catalog data it resolves to changes. The flat and hanging plugins position
//! these entities each frame.
//!
//! Beads with an external mesh are loaded as glTF scenes. Their materials are
//! reshaded once the scene has spawned and the model is scaled to the size of
//! a procedural bead.

use std::collections::HashMap;
use std::path::PathBuf;

use bevy::asset::io::file::FileAssetReader;
use bevy::input::mouse::MouseButton;
use bevy::mesh::VertexAttributeValues;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use beadchain_ipc::UiToScene;
use chain::asset::validate_glb_file;
use chain::{BeadShading, ChainStore, PlacedBead, ResolvedBead, shade_bead, should_override_color};

use crate::bead_mesh::{BeadMeshCache, apply_params, standard_material};
use crate::camera::{MainCamera, cursor_ray, ray_sphere_distance};
use crate::commands::UiCommand;
use crate::curve_edit::ControlPointDrag;
use crate::store::{ChainStoreResource, ChainStoreSet};

/// Radius of the selection indicator around an unscaled bead
pub const SELECTION_RADIUS: f32 = 0.25;
/// Scale applied to the selected bead
pub const SELECTED_SCALE: f32 = 1.15;
/// Largest dimension of an imported model after normalization
pub const MODEL_TARGET_SIZE: f32 = 0.4;
/// Scale used when an imported model has no extent
const EMPTY_MODEL_SCALE: f32 = 0.2;

const SELECTION_COLOR: Color = Color::srgba(1.0, 0.839, 0.427, 0.2);

/// A rendered placed bead
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeadVisual {
    /// Position in the chain's bead array
    pub index: usize,
    pub slot: u32,
}

/// Root of an imported glTF bead model awaiting preparation
#[derive(Component, Debug)]
pub struct ImportedModel {
    shading: BeadShading,
    prepared: bool,
}

/// Ordering of bead visual work within a frame
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChainVisualsSet {
    /// Bead entities are respawned
    Spawn,
    /// Bead entities are positioned by the active view
    Place,
}

/// What the current bead entities were spawned from
#[derive(Resource, Default)]
struct SpawnedBeads {
    source: Option<Vec<(PlacedBead, ResolvedBead)>>,
    /// Validated asset path per mesh URL (`None` if unusable)
    model_paths: HashMap<String, Option<String>>,
}

fn bead_sources(store: &ChainStore) -> Vec<(PlacedBead, ResolvedBead)> {
    store
        .beads()
        .iter()
        .map(|placed| (placed.clone(), store.resolve_bead(placed)))
        .collect()
}

pub struct ChainVisualsPlugin;

impl Plugin for ChainVisualsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<BeadMeshCache>()
            .init_resource::<SpawnedBeads>()
            .configure_sets(
                Update,
                (ChainVisualsSet::Spawn, ChainVisualsSet::Place)
                    .chain()
                    .after(ChainStoreSet::Publish),
            )
            .add_systems(
                Update,
                (
                    select_bead_on_click.before(ChainStoreSet::Commands),
                    sync_bead_entities.in_set(ChainVisualsSet::Spawn),
                    prepare_imported_models.after(ChainVisualsSet::Spawn),
                    draw_selection_indicator.after(ChainVisualsSet::Place),
                ),
            );
    }
}

/// Path relative to the asset root for a mesh URL
fn asset_path(url: &str) -> &str {
    url.trim_start_matches('/')
}

fn asset_root() -> PathBuf {
    FileAssetReader::get_base_path().join("assets")
}

/// First of the bead's mesh URLs that is a readable binary glTF
fn imported_model_path(
    resolved: &ResolvedBead,
    cache: &mut HashMap<String, Option<String>>,
) -> Option<String> {
    [&resolved.mesh_url, &resolved.fallback_url]
        .into_iter()
        .flatten()
        .find_map(|url| {
            cache
                .entry(url.clone())
                .or_insert_with(|| validated_asset_path(url))
                .clone()
        })
}

fn validated_asset_path(url: &str) -> Option<String> {
    let path = asset_path(url);
    match validate_glb_file(asset_root().join(path)) {
        Ok(header) => {
            debug!(
                "Bead mesh {} is glTF {} ({} bytes)",
                url, header.version, header.declared_length
            );
            Some(path.to_string())
        }
        Err(e) => {
            warn!("Skipping bead mesh {}: {}", url, e);
            None
        }
    }
}

fn sync_bead_entities(
    mut commands: Commands,
    store: Res<ChainStoreResource>,
    mut spawned: ResMut<SpawnedBeads>,
    mut mesh_cache: ResMut<BeadMeshCache>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    asset_server: Res<AssetServer>,
    existing: Query<Entity, With<BeadVisual>>,
) {
    let sources = bead_sources(store.store());
    if spawned.source.as_ref() == Some(&sources) {
        return;
    }

    for entity in existing.iter() {
        commands.entity(entity).despawn();
    }

    for (index, (placed, resolved)) in sources.iter().enumerate() {
        let shading = shade_bead(resolved, placed);
        let visual = BeadVisual {
            index,
            slot: placed.slot,
        };
        let mut bead = commands.spawn((
            visual,
            Transform::default(),
            Visibility::default(),
            Name::new(format!("Bead {}", placed.slot)),
        ));

        match imported_model_path(resolved, &mut spawned.model_paths) {
            Some(path) => {
                let scene = asset_server.load(GltfAssetLabel::Scene(0).from_asset(path));
                bead.with_children(|parent| {
                    parent.spawn((
                        SceneRoot(scene),
                        Transform::default(),
                        ImportedModel {
                            shading,
                            prepared: false,
                        },
                    ));
                });
            }
            None => {
                bead.insert((
                    Mesh3d(mesh_cache.get_or_create(resolved.shape, &mut meshes)),
                    MeshMaterial3d(materials.add(standard_material(&shading))),
                ));
            }
        }
    }

    debug!("Spawned {} bead entities", sources.len());
    spawned.source = Some(sources);
}

/// Transform that centers a model with bounds `min..max` and scales its
/// largest dimension to [`MODEL_TARGET_SIZE`]
pub fn normalize_model(min: Vec3, max: Vec3) -> Transform {
    let size = max - min;
    let max_dim = size.max_element();
    let scale = if max_dim > 0.0 {
        MODEL_TARGET_SIZE / max_dim
    } else {
        EMPTY_MODEL_SCALE
    };
    let center = (min + max) / 2.0;
    Transform::from_translation(-center * scale).with_scale(Vec3::splat(scale))
}

/// Reshade and normalize imported models once their meshes are loaded
fn prepare_imported_models(
    mut models: Query<(Entity, &mut ImportedModel, &mut Transform, &GlobalTransform)>,
    children: Query<&Children>,
    mut mesh_entities: Query<
        (&Mesh3d, &mut MeshMaterial3d<StandardMaterial>, &GlobalTransform),
        Without<ImportedModel>,
    >,
    meshes: Res<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (root, mut model, mut transform, root_transform) in models.iter_mut() {
        if model.prepared {
            continue;
        }

        let parts: Vec<Entity> = children
            .iter_descendants(root)
            .filter(|e| mesh_entities.contains(*e))
            .collect();
        if parts.is_empty() {
            // Scene not spawned yet
            continue;
        }

        // Bounds in the model root's space
        let to_root = root_transform.affine().inverse();
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        let mut loaded = true;
        for &part in &parts {
            let Ok((mesh3d, _, part_transform)) = mesh_entities.get(part) else {
                continue;
            };
            let Some(mesh) = meshes.get(&mesh3d.0) else {
                loaded = false;
                break;
            };
            if let Some(VertexAttributeValues::Float32x3(positions)) =
                mesh.attribute(Mesh::ATTRIBUTE_POSITION)
            {
                let to_local = to_root * part_transform.affine();
                for p in positions {
                    let p = to_local.transform_point3(Vec3::from_array(*p));
                    min = min.min(p);
                    max = max.max(p);
                }
            }
        }
        if !loaded {
            continue;
        }
        if min.cmpgt(max).any() {
            min = Vec3::ZERO;
            max = Vec3::ZERO;
        }
        *transform = normalize_model(min, max);

        // Give every part its own material so shared glTF materials stay intact
        for &part in &parts {
            let Ok((_, mut material_handle, _)) = mesh_entities.get_mut(part) else {
                continue;
            };
            let Some(source) = materials.get(&material_handle.0) else {
                continue;
            };
            let mut material = source.clone();
            apply_params(&mut material, &model.shading.params);
            let current = material.base_color.to_srgba();
            if model.shading.recolor && should_override_color([current.red, current.green, current.blue]) {
                let [r, g, b] = model.shading.color;
                material.base_color = Color::srgba(r, g, b, material.base_color.alpha());
            }
            material_handle.0 = materials.add(material);
        }

        model.prepared = true;
        debug!("Prepared imported bead model with {} parts", parts.len());
    }
}

/// Wireframe sphere around the selected bead
fn draw_selection_indicator(
    store: Res<ChainStoreResource>,
    beads: Query<(&BeadVisual, &GlobalTransform)>,
    mut gizmos: Gizmos,
) {
    let Some(selected) = store.store().selected() else {
        return;
    };
    for (visual, transform) in beads.iter() {
        if visual.slot != selected {
            continue;
        }
        let (scale, _, translation) = transform.to_scale_rotation_translation();
        gizmos.sphere(
            Isometry3d::from_translation(translation),
            SELECTION_RADIUS * scale.x,
            SELECTION_COLOR,
        );
    }
}

/// Bead under `ray`, nearest first
fn pick_bead<'a>(
    ray: Ray3d,
    beads: impl Iterator<Item = (&'a BeadVisual, &'a GlobalTransform)>,
) -> Option<u32> {
    beads
        .filter_map(|(visual, transform)| {
            let (scale, _, translation) = transform.to_scale_rotation_translation();
            ray_sphere_distance(ray, translation, SELECTION_RADIUS * scale.x)
                .map(|distance| (visual.slot, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(slot, _)| slot)
}

/// Left click on a bead selects it
fn select_bead_on_click(
    mouse_button: Res<ButtonInput<MouseButton>>,
    drag: Res<ControlPointDrag>,
    store: Res<ChainStoreResource>,
    windows: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    beads: Query<(&BeadVisual, &GlobalTransform)>,
    mut commands: MessageWriter<UiCommand>,
) {
    if !mouse_button.just_pressed(MouseButton::Left) || drag.is_dragging() {
        return;
    }
    let Some(ray) = cursor_ray(&windows, &camera_query) else {
        return;
    };
    let Some(slot) = pick_bead(ray, beads.iter()) else {
        return;
    };
    if store.store().selected() != Some(slot) {
        commands.write(UiCommand(UiToScene::SelectBead { slot: Some(slot) }));
    }
}
