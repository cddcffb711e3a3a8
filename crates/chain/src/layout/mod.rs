//! Curve layout engine
//!
//! Places beads along the closed curve defined by the control points and
//! describes the chain skin drawn under them. Everything here is pure: the
//! same control points, slot count, and config always produce the same
//! output.

mod curve;
mod skin;
mod tube;

pub use curve::ChainCurve;
pub use skin::{ChainSkin, LinkInstance, LinkShape, SkinMaterial, TubeLayer, chain_skin, place_links};
pub use tube::{TubeGeometry, sweep_tube};

use beadchain_config::LayoutConfig;
use glam::Vec3;

use crate::types::ControlPoints;

/// One sampled slot position on the curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotSample {
    /// Fraction of the curve length from the start, in `[0, 1)`
    pub t: f32,
    pub position: Vec3,
    /// Angle about +Y facing away from the chain center, `atan2(x, z)`
    pub angle: f32,
}

/// Result of laying out slots on the curve.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotLayout {
    pub samples: Vec<SlotSample>,
    /// True when the chain is empty and the samples only mark drop targets
    pub is_preview: bool,
}

impl SlotLayout {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Outward-facing angle of a point in the horizontal plane
pub fn outward_angle(position: Vec3) -> f32 {
    position.x.atan2(position.z)
}

/// Sample `slot_count` positions evenly spaced by distance along the curve.
///
/// With `slot_count == 0` the layout still holds `config.preview_slots`
/// samples, flagged as a preview.
pub fn layout_slots(control_points: &ControlPoints, slot_count: usize, config: &LayoutConfig) -> SlotLayout {
    let curve = ChainCurve::new(control_points);
    let (count, is_preview) = if slot_count == 0 {
        (config.preview_slots, true)
    } else {
        (slot_count, false)
    };

    let samples = (0..count)
        .map(|i| {
            let t = i as f32 / count as f32;
            let position = curve.point_at_u(t);
            SlotSample {
                t,
                position,
                angle: outward_angle(position),
            }
        })
        .collect();

    SlotLayout { samples, is_preview }
}
