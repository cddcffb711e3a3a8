use beadchain_ipc::{BeadPatch, ChainStyle};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::*;
use crate::error::ChainError;

/// A bead placed on the chain.
///
/// References its catalog entry by id only. `slot` is the user-facing
/// sequence number; it is unique within a structure but may have gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedBead {
    pub catalog_id: String,
    pub slot: u32,
    /// Uniform scale, always > 0
    pub scale: f32,
    /// Euler rotation in radians
    pub rotation: [f32; 3],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_variant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_tint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metalness: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roughness: Option<f32>,
}

impl PlacedBead {
    /// A bead with neutral per-instance overrides
    pub fn new(catalog_id: impl Into<String>, slot: u32) -> Self {
        Self {
            catalog_id: catalog_id.into(),
            slot,
            scale: 1.0,
            rotation: [0.0; 3],
            color_variant: None,
            custom_tint: None,
            metalness: None,
            roughness: None,
        }
    }

    /// Merge the set fields of `patch` into this bead.
    ///
    /// A non-positive or non-finite scale is ignored.
    pub fn apply_patch(&mut self, patch: &BeadPatch) {
        if let Some(scale) = patch.scale {
            if scale.is_finite() && scale > 0.0 {
                self.scale = scale;
            } else {
                warn!("Ignoring invalid scale {} for slot {}", scale, self.slot);
            }
        }
        if let Some(rotation) = patch.rotation {
            self.rotation = rotation;
        }
        if let Some(variant) = &patch.color_variant {
            self.color_variant = Some(variant.clone());
        }
        if let Some(tint) = &patch.custom_tint {
            self.custom_tint = Some(tint.clone());
        }
        if let Some(metalness) = patch.metalness {
            self.metalness = Some(metalness.clamp(0.0, 1.0));
        }
        if let Some(roughness) = patch.roughness {
            self.roughness = Some(roughness.clamp(0.0, 1.0));
        }
    }
}

/// Chain-wide metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainMeta {
    /// Nominal chain length in millimetres
    pub length: f32,
    pub max_beads: usize,
    /// Nominal spacing between slots in millimetres
    pub slot_spacing: f32,
}

impl Default for ChainMeta {
    fn default() -> Self {
        Self {
            length: DEFAULT_CHAIN_LENGTH,
            max_beads: DEFAULT_MAX_BEADS,
            slot_spacing: DEFAULT_SLOT_SPACING,
        }
    }
}

/// The canonical chain design: bead sequence, metadata, and style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainStructure {
    pub version: String,
    pub chain_meta: ChainMeta,
    pub beads: Vec<PlacedBead>,
    #[serde(default)]
    pub style: ChainStyle,
}

impl Default for ChainStructure {
    fn default() -> Self {
        Self {
            version: STRUCTURE_VERSION.to_string(),
            chain_meta: ChainMeta::default(),
            beads: Vec::new(),
            style: ChainStyle::default(),
        }
    }
}

impl ChainStructure {
    pub fn len(&self) -> usize {
        self.beads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beads.is_empty()
    }

    /// Find the bead occupying a slot
    pub fn bead_at_slot(&self, slot: u32) -> Option<&PlacedBead> {
        self.beads.iter().find(|bead| bead.slot == slot)
    }

    /// Array position of the bead occupying a slot
    pub fn position_of_slot(&self, slot: u32) -> Option<usize> {
        self.beads.iter().position(|bead| bead.slot == slot)
    }

    /// Slot numbers in sequence order
    pub fn slots(&self) -> Vec<u32> {
        self.beads.iter().map(|bead| bead.slot).collect()
    }

    /// One past the highest occupied slot (0 for an empty chain)
    pub fn next_free_slot(&self) -> u32 {
        self.beads
            .iter()
            .map(|bead| bead.slot + 1)
            .max()
            .unwrap_or(0)
    }

    /// Stable sort by slot
    pub(crate) fn sort_by_slot(&mut self) {
        self.beads.sort_by_key(|bead| bead.slot);
    }
}

/// Control points of the closed curve the flat chain follows.
///
/// Always holds at least [`MIN_CONTROL_POINTS`] points.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlPoints {
    points: Vec<Vec3>,
}

impl Default for ControlPoints {
    fn default() -> Self {
        Self::ellipse(
            DEFAULT_CONTROL_POINT_COUNT,
            DEFAULT_CURVE_RADIUS_X,
            DEFAULT_CURVE_RADIUS_Z,
            DEFAULT_CHAIN_HEIGHT,
        )
    }
}

impl ControlPoints {
    /// Wrap an explicit point list
    pub fn new(points: Vec<Vec3>) -> Result<Self, ChainError> {
        if points.len() < MIN_CONTROL_POINTS {
            return Err(ChainError::TooFewControlPoints(points.len()));
        }
        Ok(Self { points })
    }

    /// Evenly spaced points on a horizontal ellipse at `height`.
    ///
    /// `count` is raised to [`MIN_CONTROL_POINTS`] if smaller.
    pub fn ellipse(count: usize, radius_x: f32, radius_z: f32, height: f32) -> Self {
        let count = count.max(MIN_CONTROL_POINTS);
        let points = (0..count)
            .map(|i| {
                let angle = i as f32 / count as f32 * std::f32::consts::TAU;
                Vec3::new(angle.cos() * radius_x, height, angle.sin() * radius_z)
            })
            .collect();
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Never true; present for API symmetry
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Vec3> {
        self.points.get(index).copied()
    }

    /// Move one point in place
    pub fn set(&mut self, index: usize, point: Vec3) -> Result<(), ChainError> {
        let len = self.points.len();
        match self.points.get_mut(index) {
            Some(slot) => {
                *slot = point;
                Ok(())
            }
            None => Err(ChainError::ControlPointOutOfRange { index, len }),
        }
    }

    pub fn as_slice(&self) -> &[Vec3] {
        &self.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_points_minimum() {
        assert!(matches!(
            ControlPoints::new(vec![Vec3::ZERO, Vec3::X]),
            Err(ChainError::TooFewControlPoints(2))
        ));
        assert!(ControlPoints::new(vec![Vec3::ZERO, Vec3::X, Vec3::Z]).is_ok());
        assert_eq!(ControlPoints::ellipse(1, 1.0, 1.0, 0.0).len(), MIN_CONTROL_POINTS);
    }

    #[test]
    fn test_default_control_points_on_ellipse() {
        let points = ControlPoints::default();
        assert_eq!(points.len(), DEFAULT_CONTROL_POINT_COUNT);
        for p in points.as_slice() {
            let e = (p.x / DEFAULT_CURVE_RADIUS_X).powi(2) + (p.z / DEFAULT_CURVE_RADIUS_Z).powi(2);
            assert!((e - 1.0).abs() < 1e-5);
            assert_eq!(p.y, DEFAULT_CHAIN_HEIGHT);
        }
    }

    #[test]
    fn test_control_point_set_out_of_range() {
        let mut points = ControlPoints::default();
        assert!(points.set(3, Vec3::ONE).is_ok());
        assert_eq!(points.get(3), Some(Vec3::ONE));
        assert!(matches!(
            points.set(12, Vec3::ONE),
            Err(ChainError::ControlPointOutOfRange { index: 12, len: 12 })
        ));
    }

    #[test]
    fn test_patch_merges_fields() {
        let mut bead = PlacedBead::new("a", 0);
        bead.metalness = Some(0.2);
        bead.apply_patch(&BeadPatch::tint("#00ff00"));
        assert_eq!(bead.custom_tint.as_deref(), Some("#00ff00"));
        assert_eq!(bead.metalness, Some(0.2));
        assert_eq!(bead.scale, 1.0);

        bead.apply_patch(&BeadPatch::scale(-2.0));
        assert_eq!(bead.scale, 1.0);
        bead.apply_patch(&BeadPatch::scale(1.5));
        assert_eq!(bead.scale, 1.5);
    }

    #[test]
    fn test_next_free_slot() {
        let mut chain = ChainStructure::default();
        assert_eq!(chain.next_free_slot(), 0);
        chain.beads.push(PlacedBead::new("a", 4));
        chain.beads.push(PlacedBead::new("b", 1));
        assert_eq!(chain.next_free_slot(), 5);
    }
}
