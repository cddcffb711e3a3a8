//! Catalog bead records supplied by the external catalog collaborator.

use serde::{Deserialize, Serialize};

use super::MaterialOverrides;

/// Material category of a catalog bead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BeadMaterial {
    Glass,
    Crystal,
    Acrylic,
    MetalGold,
    MetalSilver,
    Wood,
    #[default]
    Plastic,
    /// Any category this build does not know about, as written in the record
    #[serde(untagged)]
    Other(String),
}

impl BeadMaterial {
    /// Category name as it appears in catalog records
    pub fn as_str(&self) -> &str {
        match self {
            Self::Glass => "glass",
            Self::Crystal => "crystal",
            Self::Acrylic => "acrylic",
            Self::MetalGold => "metal-gold",
            Self::MetalSilver => "metal-silver",
            Self::Wood => "wood",
            Self::Plastic => "plastic",
            Self::Other(name) => name,
        }
    }

    /// Whether this is one of the metal categories
    pub fn is_metal(&self) -> bool {
        self.as_str().contains("metal")
    }

    /// Whether this category is a clear, low-roughness material
    pub fn is_clear(&self) -> bool {
        matches!(self, Self::Glass | Self::Crystal)
    }
}

/// Shape tag of a catalog bead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BeadShape {
    #[default]
    Sphere,
    Cube,
    Cylinder,
    Heart,
    Star,
    Flower,
    /// Bead rendered from an external mesh asset
    Spline,
    #[serde(other)]
    Custom,
}

impl BeadShape {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Sphere => "sphere",
            Self::Cube => "cube",
            Self::Cylinder => "cylinder",
            Self::Heart => "heart",
            Self::Star => "star",
            Self::Flower => "flower",
            Self::Spline => "spline",
            Self::Custom => "custom",
        }
    }
}

/// A catalog bead entry.
///
/// Owned by the catalog collaborator; the editor only references these by `id`.
/// This is also the drag-and-drop payload format (camelCase JSON).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bead {
    pub id: String,
    pub name: String,
    pub material: BeadMaterial,
    pub shape: BeadShape,
    /// Hex color string, e.g. `#FF6DAF`
    pub base_color: String,
    pub size_mm: f32,
    pub weight_g: f32,
    /// External mesh asset (binary glTF)
    #[serde(default, alias = "splineUrl", skip_serializing_if = "Option::is_none")]
    pub mesh_url: Option<String>,
    /// Mesh used when `mesh_url` fails to load
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material_config: Option<MaterialOverrides>,
    pub price_cents: u32,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

fn default_active() -> bool {
    true
}

impl Bead {
    /// Create a minimal active bead record
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        material: BeadMaterial,
        shape: BeadShape,
        base_color: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            material,
            shape,
            base_color: base_color.into(),
            size_mm: 8.0,
            weight_g: 1.0,
            mesh_url: None,
            fallback_url: None,
            material_config: None,
            price_cents: 0,
            is_active: true,
            created_at: None,
        }
    }

    /// Set the bead weight in grams
    pub fn with_weight(mut self, weight_g: f32) -> Self {
        self.weight_g = weight_g;
        self
    }
}
