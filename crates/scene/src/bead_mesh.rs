//! Procedural bead meshes and material conversion
//!
//! Every catalog shape maps to one cached mesh. Heart and star beads are flat
//! outlines extruded along Z; the remaining shapes use Bevy primitives.

use std::collections::HashMap;
use std::f32::consts::{FRAC_PI_2, PI};

use beadchain_ipc::{BeadShape, FaceSide};
use bevy::asset::RenderAssetUsages;
use bevy::mesh::{Indices, PrimitiveTopology};
use bevy::prelude::*;
use bevy::render::render_resource::Face;
use chain::color::parse_hex_color_or;
use chain::{BASE_BEAD_SIZE, BeadShading, MaterialParams, SkinMaterial, TubeGeometry};

pub const STAR_OUTER_RADIUS: f32 = 0.2;
pub const STAR_INNER_RADIUS: f32 = 0.1;
pub const STAR_POINTS: usize = 5;
pub const STAR_DEPTH: f32 = 0.08;
pub const HEART_DEPTH: f32 = 0.1;
/// Samples per cubic segment of the heart outline
const HEART_CURVE_SEGMENTS: usize = 12;

/// Alternating outer/inner vertices, counter-clockwise from +X
pub fn star_outline(outer_radius: f32, inner_radius: f32, points: usize) -> Vec<Vec2> {
    (0..points * 2)
        .map(|i| {
            let radius = if i % 2 == 0 { outer_radius } else { inner_radius };
            let angle = i as f32 * PI / points as f32;
            Vec2::new(angle.cos() * radius, angle.sin() * radius)
        })
        .collect()
}

fn cubic(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t)
}

/// Heart outline from four cubic segments, counter-clockwise from the top notch
pub fn heart_outline(segments_per_curve: usize) -> Vec<Vec2> {
    let segments_per_curve = segments_per_curve.max(1);
    let curves = [
        [
            Vec2::new(0.0, 0.3),
            Vec2::new(0.0, 0.3),
            Vec2::new(-0.15, 0.4),
            Vec2::new(-0.15, 0.15),
        ],
        [
            Vec2::new(-0.15, 0.15),
            Vec2::new(-0.15, 0.0),
            Vec2::new(-0.1, -0.1),
            Vec2::new(0.0, -0.3),
        ],
        [
            Vec2::new(0.0, -0.3),
            Vec2::new(0.1, -0.1),
            Vec2::new(0.15, 0.0),
            Vec2::new(0.15, 0.15),
        ],
        [
            Vec2::new(0.15, 0.15),
            Vec2::new(0.15, 0.4),
            Vec2::new(0.0, 0.3),
            Vec2::new(0.0, 0.3),
        ],
    ];

    // Each curve's end point is the next curve's start, so skip it
    let mut outline = Vec::with_capacity(curves.len() * segments_per_curve);
    for [p0, p1, p2, p3] in curves {
        for i in 0..segments_per_curve {
            let t = i as f32 / segments_per_curve as f32;
            outline.push(cubic(p0, p1, p2, p3, t));
        }
    }
    outline
}

/// Triangle mesh data independent of the renderer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtrudedGeometry {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

/// Extrude a counter-clockwise outline along Z, centered on `z = 0`.
///
/// Caps are fanned from the origin, so the outline must be star-shaped
/// around it.
pub fn extrude_outline(outline: &[Vec2], depth: f32) -> ExtrudedGeometry {
    let mut geometry = ExtrudedGeometry::default();
    let n = outline.len();
    if n < 3 {
        return geometry;
    }
    let half = depth / 2.0;

    // Caps: front (+Z) then back (-Z), each with a center vertex
    for (z, normal) in [(half, [0.0, 0.0, 1.0]), (-half, [0.0, 0.0, -1.0])] {
        let center = geometry.positions.len() as u32;
        geometry.positions.push([0.0, 0.0, z]);
        geometry.normals.push(normal);
        for p in outline {
            geometry.positions.push([p.x, p.y, z]);
            geometry.normals.push(normal);
        }
        for i in 0..n as u32 {
            let a = center + 1 + i;
            let b = center + 1 + (i + 1) % n as u32;
            if z > 0.0 {
                geometry.indices.extend([center, a, b]);
            } else {
                geometry.indices.extend([center, b, a]);
            }
        }
    }

    // Side walls with flat per-edge normals
    for i in 0..n {
        let a = outline[i];
        let b = outline[(i + 1) % n];
        let edge = b - a;
        let normal = Vec2::new(edge.y, -edge.x).normalize_or_zero();
        let normal = [normal.x, normal.y, 0.0];

        let base = geometry.positions.len() as u32;
        geometry.positions.extend([
            [a.x, a.y, half],
            [b.x, b.y, half],
            [b.x, b.y, -half],
            [a.x, a.y, -half],
        ]);
        geometry.normals.extend([normal; 4]);
        geometry
            .indices
            .extend([base, base + 3, base + 2, base, base + 2, base + 1]);
    }

    geometry
}

fn triangle_mesh(positions: Vec<[f32; 3]>, normals: Vec<[f32; 3]>, indices: Vec<u32>) -> Mesh {
    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

impl From<ExtrudedGeometry> for Mesh {
    fn from(geometry: ExtrudedGeometry) -> Self {
        triangle_mesh(geometry.positions, geometry.normals, geometry.indices)
    }
}

/// Mesh for a swept chain tube
pub fn tube_mesh(geometry: &TubeGeometry) -> Mesh {
    let mut mesh = triangle_mesh(
        geometry.positions.clone(),
        geometry.normals.clone(),
        geometry.indices.clone(),
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, geometry.uvs.clone());
    mesh
}

/// Procedural mesh for a catalog shape
pub fn shape_mesh(shape: BeadShape) -> Mesh {
    match shape {
        BeadShape::Sphere | BeadShape::Spline | BeadShape::Custom => {
            Sphere::new(BASE_BEAD_SIZE).mesh().uv(32, 32)
        }
        BeadShape::Cube => Cuboid::from_length(BASE_BEAD_SIZE * 1.8).into(),
        // Lying on its side with the hole along X
        BeadShape::Cylinder => Mesh::from(Cylinder::new(BASE_BEAD_SIZE * 0.8, BASE_BEAD_SIZE * 1.6))
            .rotated_by(Quat::from_rotation_z(FRAC_PI_2)),
        BeadShape::Heart => extrude_outline(&heart_outline(HEART_CURVE_SEGMENTS), HEART_DEPTH).into(),
        BeadShape::Star => extrude_outline(
            &star_outline(STAR_OUTER_RADIUS, STAR_INNER_RADIUS, STAR_POINTS),
            STAR_DEPTH,
        )
        .into(),
        BeadShape::Flower => Torus::new(BASE_BEAD_SIZE * 0.4, BASE_BEAD_SIZE).into(),
    }
}

/// One shared mesh handle per shape
#[derive(Resource, Default)]
pub struct BeadMeshCache {
    meshes: HashMap<BeadShape, Handle<Mesh>>,
}

impl BeadMeshCache {
    pub fn get_or_create(&mut self, shape: BeadShape, meshes: &mut Assets<Mesh>) -> Handle<Mesh> {
        self.meshes
            .entry(shape)
            .or_insert_with(|| meshes.add(shape_mesh(shape)))
            .clone()
    }
}

fn srgb(rgb: [f32; 3]) -> Color {
    Color::srgb(rgb[0], rgb[1], rgb[2])
}

/// Write resolved shading parameters into a material, leaving its color alone.
///
/// Sheen, iridescence, and environment strength have no `StandardMaterial`
/// counterpart and are dropped.
pub fn apply_params(material: &mut StandardMaterial, params: &MaterialParams) {
    material.metallic = params.metalness;
    material.perceptual_roughness = params.roughness;
    material.ior = params.ior;
    material.specular_transmission = params.transmission;
    material.clearcoat = params.clearcoat;
    material.clearcoat_perceptual_roughness = params.clearcoat_roughness;
    material.emissive = srgb(params.emissive_color).to_linear() * params.emissive_intensity;

    material.alpha_mode = if params.transparent {
        AlphaMode::Blend
    } else if params.alpha_test > 0.0 {
        AlphaMode::Mask(params.alpha_test)
    } else {
        AlphaMode::Opaque
    };
    let alpha = if params.transparent { params.opacity } else { 1.0 };
    material.base_color.set_alpha(alpha);

    match params.side {
        FaceSide::Front => {
            material.double_sided = false;
            material.cull_mode = Some(Face::Back);
        }
        FaceSide::Double => {
            material.double_sided = true;
            material.cull_mode = None;
        }
    }
}

/// Material for a procedural bead
pub fn standard_material(shading: &BeadShading) -> StandardMaterial {
    let mut material = StandardMaterial {
        base_color: srgb(shading.color),
        ..default()
    };
    apply_params(&mut material, &shading.params);
    material
}

/// Material for one chain skin surface
pub fn skin_material(skin: &SkinMaterial) -> StandardMaterial {
    let color = parse_hex_color_or(skin.color, [0.75, 0.75, 0.75]);
    StandardMaterial {
        base_color: srgb(color).with_alpha(skin.opacity),
        metallic: skin.metalness,
        perceptual_roughness: skin.roughness,
        alpha_mode: if skin.is_transparent() {
            AlphaMode::Blend
        } else {
            AlphaMode::Opaque
        },
        ..default()
    }
}
