//! Tube geometry swept along a closed curve.

use glam::{Quat, Vec3};

use super::curve::ChainCurve;

/// Indexed triangle mesh data for a swept tube.
///
/// Attribute arrays are parallel; `indices` holds counter-clockwise triangles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TubeGeometry {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl TubeGeometry {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Per-sample orientation along the curve
#[derive(Debug, Clone, Copy)]
struct Frame {
    normal: Vec3,
    binormal: Vec3,
}

/// Parallel-transport frames at `t = i / segments` for `i` in `0..=segments`.
///
/// The accumulated twist between the first and last frame is spread evenly
/// over the loop so the seam lines up.
fn transport_frames(curve: &ChainCurve, segments: usize) -> Vec<Frame> {
    let tangents: Vec<Vec3> = (0..=segments)
        .map(|i| curve.tangent_at_u(i as f32 / segments as f32))
        .collect();

    // Start from the axis least aligned with the first tangent
    let t0 = tangents[0];
    let abs = t0.abs();
    let axis = if abs.x <= abs.y && abs.x <= abs.z {
        Vec3::X
    } else if abs.y <= abs.z {
        Vec3::Y
    } else {
        Vec3::Z
    };
    let side = t0.cross(axis).normalize_or(Vec3::Y);
    let mut normal = t0.cross(side);

    let mut normals = Vec::with_capacity(segments + 1);
    normals.push(normal);
    for i in 1..=segments {
        let axis = tangents[i - 1].cross(tangents[i]);
        if axis.length() > f32::EPSILON {
            let theta = tangents[i - 1].dot(tangents[i]).clamp(-1.0, 1.0).acos();
            normal = Quat::from_axis_angle(axis.normalize(), theta) * normal;
        }
        normals.push(normal);
    }

    let mut theta = normals[0].dot(normals[segments]).clamp(-1.0, 1.0).acos() / segments as f32;
    if tangents[0].dot(normals[0].cross(normals[segments])) > 0.0 {
        theta = -theta;
    }
    for (i, normal) in normals.iter_mut().enumerate().skip(1) {
        *normal = Quat::from_axis_angle(tangents[i], theta * i as f32) * *normal;
    }

    tangents
        .into_iter()
        .zip(normals)
        .map(|(tangent, normal)| Frame {
            normal,
            binormal: tangent.cross(normal),
        })
        .collect()
}

/// Sweep a circular cross-section of `radius` along the closed `curve`.
///
/// Produces `(tubular_segments + 1) * (radial_segments + 1)` vertices; the
/// first and last rings coincide so UVs wrap cleanly.
pub fn sweep_tube(
    curve: &ChainCurve,
    tubular_segments: usize,
    radius: f32,
    radial_segments: usize,
) -> TubeGeometry {
    let tubular_segments = tubular_segments.max(1);
    let radial_segments = radial_segments.max(3);
    let frames = transport_frames(curve, tubular_segments);

    let ring = radial_segments + 1;
    let vertex_count = (tubular_segments + 1) * ring;
    let mut geometry = TubeGeometry {
        positions: Vec::with_capacity(vertex_count),
        normals: Vec::with_capacity(vertex_count),
        uvs: Vec::with_capacity(vertex_count),
        indices: Vec::with_capacity(tubular_segments * radial_segments * 6),
    };

    for i in 0..=tubular_segments {
        // Closing ring reuses the first frame exactly
        let frame_index = if i == tubular_segments { 0 } else { i };
        let frame = frames[frame_index];
        let center = curve.point_at_u(i as f32 / tubular_segments as f32);

        for j in 0..=radial_segments {
            let v = j as f32 / radial_segments as f32 * std::f32::consts::TAU;
            let normal = (-v.cos() * frame.normal + v.sin() * frame.binormal).normalize_or(frame.normal);
            geometry.positions.push((center + normal * radius).to_array());
            geometry.normals.push(normal.to_array());
            geometry.uvs.push([
                i as f32 / tubular_segments as f32,
                j as f32 / radial_segments as f32,
            ]);
        }
    }

    for j in 1..=tubular_segments {
        for i in 1..=radial_segments {
            let a = (ring * (j - 1) + (i - 1)) as u32;
            let b = (ring * j + (i - 1)) as u32;
            let c = (ring * j + i) as u32;
            let d = (ring * (j - 1) + i) as u32;
            geometry.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    geometry
}
