//! Chain editing types shared between the UI and the scene.

use serde::{Deserialize, Serialize};

/// Visual style of the chain string the beads sit on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainStyle {
    /// Smooth round tube
    #[default]
    Simple,
    /// Two-layer woven tube
    Braided,
    /// Interlocking metal links
    Link,
    Rope,
    Snake,
}

impl ChainStyle {
    pub const ALL: [ChainStyle; 5] = [
        Self::Simple,
        Self::Braided,
        Self::Link,
        Self::Rope,
        Self::Snake,
    ];
}

/// How the chain is presented in the 3D view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Beads pinned to the closed curve lying flat
    #[default]
    Flat,
    /// Beads strung between two anchors and settled by gravity
    Hanging,
}

/// Partial update for a placed bead; unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BeadPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<[f32; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_variant: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_tint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metalness: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roughness: Option<f32>,
}

impl BeadPatch {
    /// Patch that only changes scale
    pub fn scale(scale: f32) -> Self {
        Self {
            scale: Some(scale),
            ..Default::default()
        }
    }

    /// Patch that only changes the tint
    pub fn tint(tint: impl Into<String>) -> Self {
        Self {
            custom_tint: Some(tint.into()),
            ..Default::default()
        }
    }

    /// True if the patch sets no field
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Catalog filter update.
///
/// The outer `Option` selects whether a filter is touched; the inner one
/// clears (`None`) or sets (`Some`) it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogFilterUpdate {
    pub material: Option<Option<String>>,
    pub shape: Option<Option<String>>,
    pub color: Option<Option<String>>,
}
