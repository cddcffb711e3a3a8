//! Material-related types for IPC messages.

use serde::{Deserialize, Serialize};

/// Named shading preset for a semantic material category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialPreset {
    Glass,
    Crystal,
    Metal,
    Acrylic,
    Ceramic,
    Pearl,
    Resin,
    #[default]
    Default,
}

impl MaterialPreset {
    pub const ALL: [MaterialPreset; 8] = [
        Self::Glass,
        Self::Crystal,
        Self::Metal,
        Self::Acrylic,
        Self::Ceramic,
        Self::Pearl,
        Self::Resin,
        Self::Default,
    ];

    /// Map a material category name to its preset.
    ///
    /// Returns `None` for categories without a dedicated preset.
    pub fn from_category(category: &str) -> Option<Self> {
        match category.trim().to_ascii_lowercase().as_str() {
            "glass" => Some(Self::Glass),
            "crystal" => Some(Self::Crystal),
            "metal" | "metal-gold" | "metal-silver" => Some(Self::Metal),
            "acrylic" | "plastic" => Some(Self::Acrylic),
            "ceramic" => Some(Self::Ceramic),
            "pearl" => Some(Self::Pearl),
            "resin" => Some(Self::Resin),
            "default" => Some(Self::Default),
            _ => None,
        }
    }
}

/// Which faces of a mesh are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaceSide {
    /// Back faces are culled
    #[default]
    Front,
    /// Both faces are rendered (transparent materials)
    Double,
}

/// Optional shading overrides layered on top of a preset.
///
/// Every field left as `None` keeps the preset value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MaterialOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset_type: Option<MaterialPreset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metalness: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roughness: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transparent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transmission: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ior: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clearcoat: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clearcoat_roughness: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheen: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheen_roughness: Option<f32>,
    /// Hex color string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheen_color: Option<String>,
    /// Hex color string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emissive_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emissive_intensity: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env_map_intensity: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iridescence: Option<f32>,
    #[serde(rename = "iridescenceIOR", skip_serializing_if = "Option::is_none")]
    pub iridescence_ior: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<FaceSide>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha_test: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preserve_color: Option<bool>,
}

impl MaterialOverrides {
    /// Overrides that only replace roughness
    pub fn roughness(value: f32) -> Self {
        Self {
            roughness: Some(value),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_from_category() {
        assert_eq!(MaterialPreset::from_category("metal-gold"), Some(MaterialPreset::Metal));
        assert_eq!(MaterialPreset::from_category("Plastic"), Some(MaterialPreset::Acrylic));
        assert_eq!(MaterialPreset::from_category("wood"), None);
    }

    #[test]
    fn test_overrides_parse_partial_config() {
        let json = r#"{"presetType":"pearl","iridescenceIOR":1.7,"roughness":0.2}"#;
        let overrides: MaterialOverrides = serde_json::from_str(json).unwrap();
        assert_eq!(overrides.preset_type, Some(MaterialPreset::Pearl));
        assert_eq!(overrides.iridescence_ior, Some(1.7));
        assert_eq!(overrides.roughness, Some(0.2));
        assert_eq!(overrides.metalness, None);
    }
}
