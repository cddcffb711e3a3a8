//! Material presets and per-bead shading resolution.
//!
//! Each catalog material category maps to a preset of physically based
//! shading parameters. Catalog entries and placed beads can override any of
//! them; [`shade_bead`] folds all three layers into one [`BeadShading`].

use beadchain_ipc::{FaceSide, MaterialOverrides, MaterialPreset};
use tracing::warn;

use crate::catalog::ResolvedBead;
use crate::color::{parse_hex_color, parse_hex_color_or};
use crate::constants::DEFAULT_BEAD_COLOR;
use crate::types::PlacedBead;

/// Imported mesh colors brighter than this on every channel count as unset
const UNSET_COLOR_THRESHOLD: f32 = 0.98;

const WHITE: [f32; 3] = [1.0, 1.0, 1.0];
const BLACK: [f32; 3] = [0.0, 0.0, 0.0];

/// Fully resolved shading parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialParams {
    pub metalness: f32,
    pub roughness: f32,
    pub transparent: bool,
    pub opacity: f32,
    pub transmission: f32,
    pub ior: f32,
    pub clearcoat: f32,
    pub clearcoat_roughness: f32,
    pub sheen: f32,
    pub sheen_roughness: f32,
    pub sheen_color: [f32; 3],
    pub emissive_color: [f32; 3],
    pub emissive_intensity: f32,
    /// Strength of environment reflections
    pub env_map_intensity: f32,
    pub iridescence: f32,
    pub iridescence_ior: f32,
    pub side: FaceSide,
    pub alpha_test: f32,
    /// Keep the mesh's own color instead of applying a recolor
    pub preserve_color: bool,
}

impl MaterialParams {
    /// Opaque, front-faced parameters shared by most presets
    const fn base(metalness: f32, roughness: f32, ior: f32, clearcoat: f32, clearcoat_roughness: f32) -> Self {
        Self {
            metalness,
            roughness,
            transparent: false,
            opacity: 1.0,
            transmission: 0.0,
            ior,
            clearcoat,
            clearcoat_roughness,
            sheen: 0.0,
            sheen_roughness: 1.0,
            sheen_color: WHITE,
            emissive_color: BLACK,
            emissive_intensity: 0.0,
            env_map_intensity: 1.0,
            iridescence: 0.0,
            iridescence_ior: 1.3,
            side: FaceSide::Front,
            alpha_test: 0.0,
            preserve_color: false,
        }
    }

    /// Base table for a preset
    pub fn preset(preset: MaterialPreset) -> Self {
        match preset {
            MaterialPreset::Glass => Self {
                transparent: true,
                opacity: 0.3,
                transmission: 0.95,
                env_map_intensity: 2.0,
                side: FaceSide::Double,
                ..Self::base(0.0, 0.05, 1.5, 1.0, 0.03)
            },
            MaterialPreset::Crystal => Self {
                transparent: true,
                opacity: 0.25,
                transmission: 0.98,
                env_map_intensity: 2.5,
                iridescence: 0.3,
                iridescence_ior: 1.4,
                side: FaceSide::Double,
                ..Self::base(0.0, 0.02, 1.54, 1.0, 0.01)
            },
            MaterialPreset::Metal => Self {
                env_map_intensity: 1.5,
                preserve_color: true,
                ..Self::base(1.0, 0.15, 1.45, 0.5, 0.1)
            },
            MaterialPreset::Acrylic => Self {
                env_map_intensity: 1.2,
                ..Self::base(0.1, 0.2, 1.49, 0.8, 0.15)
            },
            MaterialPreset::Ceramic => Self::base(0.0, 0.1, 1.5, 1.0, 0.05),
            MaterialPreset::Pearl => Self {
                sheen: 0.8,
                sheen_roughness: 0.5,
                iridescence: 0.7,
                iridescence_ior: 1.6,
                ..Self::base(0.0, 0.4, 1.53, 0.6, 0.3)
            },
            MaterialPreset::Resin => Self {
                transparent: true,
                opacity: 0.7,
                transmission: 0.5,
                side: FaceSide::Double,
                ..Self::base(0.0, 0.25, 1.54, 0.4, 0.2)
            },
            MaterialPreset::Default => Self::base(0.5, 0.3, 1.45, 0.0, 0.5),
        }
    }

    /// Replace every field `overrides` sets
    pub fn apply(&mut self, overrides: &MaterialOverrides) {
        fn set<T: Copy>(field: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *field = value;
            }
        }

        set(&mut self.metalness, overrides.metalness);
        set(&mut self.roughness, overrides.roughness);
        set(&mut self.transparent, overrides.transparent);
        set(&mut self.opacity, overrides.opacity);
        set(&mut self.transmission, overrides.transmission);
        set(&mut self.ior, overrides.ior);
        set(&mut self.clearcoat, overrides.clearcoat);
        set(&mut self.clearcoat_roughness, overrides.clearcoat_roughness);
        set(&mut self.sheen, overrides.sheen);
        set(&mut self.sheen_roughness, overrides.sheen_roughness);
        set(&mut self.emissive_intensity, overrides.emissive_intensity);
        set(&mut self.env_map_intensity, overrides.env_map_intensity);
        set(&mut self.iridescence, overrides.iridescence);
        set(&mut self.iridescence_ior, overrides.iridescence_ior);
        set(&mut self.side, overrides.side);
        set(&mut self.alpha_test, overrides.alpha_test);
        set(&mut self.preserve_color, overrides.preserve_color);

        if let Some(color) = &overrides.sheen_color {
            set_color(&mut self.sheen_color, color, "sheen");
        }
        if let Some(color) = &overrides.emissive_color {
            set_color(&mut self.emissive_color, color, "emissive");
        }
    }
}

fn set_color(field: &mut [f32; 3], hex: &str, what: &str) {
    match parse_hex_color(hex) {
        Ok(rgb) => *field = rgb,
        Err(e) => warn!("Ignoring {} color override: {}", what, e),
    }
}

/// Preset for a category name, falling back to the default preset
pub fn preset_for_category(category: &str) -> MaterialPreset {
    MaterialPreset::from_category(category).unwrap_or_default()
}

/// Preset table for `category` with `overrides` merged on top.
///
/// An explicit `preset_type` in the overrides takes precedence over the
/// category.
pub fn resolve(category: &str, overrides: &MaterialOverrides) -> MaterialParams {
    let preset = overrides
        .preset_type
        .unwrap_or_else(|| preset_for_category(category));
    let mut params = MaterialParams::preset(preset);
    params.apply(overrides);
    params
}

/// Final shading for one placed bead.
#[derive(Debug, Clone, PartialEq)]
pub struct BeadShading {
    pub params: MaterialParams,
    /// sRGB color for procedural meshes
    pub color: [f32; 3],
    /// Whether imported meshes should be recolored to `color`
    pub recolor: bool,
}

/// Combine preset, catalog overrides, and per-instance values.
pub fn shade_bead(resolved: &ResolvedBead, placed: &PlacedBead) -> BeadShading {
    let mut params = match &resolved.material_config {
        Some(config) => resolve(resolved.material_category(), config),
        None => resolve(resolved.material_category(), &MaterialOverrides::default()),
    };
    if let Some(metalness) = placed.metalness {
        params.metalness = metalness;
    }
    if let Some(roughness) = placed.roughness {
        params.roughness = roughness;
    }

    let fallback = parse_hex_color_or(DEFAULT_BEAD_COLOR, WHITE);
    let base = parse_hex_color_or(&resolved.base_color, fallback);

    if params.preserve_color {
        return BeadShading {
            params,
            color: base,
            recolor: false,
        };
    }

    let requested = placed
        .color_variant
        .as_deref()
        .or(placed.custom_tint.as_deref());
    let color = match requested {
        Some(hex) => parse_hex_color(hex).unwrap_or_else(|e| {
            warn!("Bead {} has an unusable color: {}", placed.slot, e);
            base
        }),
        None => base,
    };

    BeadShading {
        params,
        color,
        recolor: true,
    }
}

/// True when an imported mesh color is effectively blank white and should be
/// replaced by the catalog color.
pub fn should_override_color(rgb: [f32; 3]) -> bool {
    rgb.iter().all(|&c| c > UNSET_COLOR_THRESHOLD)
}
