//! Catalog lookup and filtering.
//!
//! The catalog is supplied and refreshed by an external collaborator. The
//! editor only reads it: placed beads hold a catalog id, and a bead whose id
//! is missing from the current catalog resolves to neutral defaults.

use std::collections::HashMap;

use beadchain_ipc::{Bead, BeadMaterial, BeadShape, CatalogFilterUpdate, MaterialOverrides};
use tracing::debug;

use crate::constants::{BASE_BEAD_SIZE, CHAIN_HEIGHT_MARGIN, DEFAULT_BEAD_COLOR, MIN_CHAIN_HEIGHT};
use crate::types::PlacedBead;

/// Category given to beads missing from the catalog; maps to the default preset
const FALLBACK_CATEGORY: &str = "other";

/// Distance from a bead's center to its bottom, before per-instance scale.
pub fn shape_radius(shape: BeadShape) -> f32 {
    match shape {
        BeadShape::Sphere => BASE_BEAD_SIZE,
        BeadShape::Cube => BASE_BEAD_SIZE * 1.8 / 2.0,
        // Cylinders lie on their side
        BeadShape::Cylinder => BASE_BEAD_SIZE * 0.8,
        // Extruded shapes: half the extrude depth
        BeadShape::Heart => 0.05,
        BeadShape::Star => 0.04,
        BeadShape::Flower => BASE_BEAD_SIZE,
        BeadShape::Spline => BASE_BEAD_SIZE * 1.2,
        BeadShape::Custom => BASE_BEAD_SIZE,
    }
}

/// Height of the flat chain so the largest catalog bead clears the table.
pub fn chain_height(beads: &[Bead]) -> f32 {
    if beads.is_empty() {
        return MIN_CHAIN_HEIGHT;
    }

    let max_radius = beads
        .iter()
        .map(|bead| shape_radius(bead.shape))
        .fold(MIN_CHAIN_HEIGHT, f32::max);

    max_radius + CHAIN_HEIGHT_MARGIN
}

/// Active catalog filters. `None` means the filter is off.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogFilters {
    pub material: Option<String>,
    pub shape: Option<String>,
    /// Case-insensitive substring of the base color
    pub color: Option<String>,
}

impl CatalogFilters {
    fn apply(&mut self, update: CatalogFilterUpdate) {
        if let Some(material) = update.material {
            self.material = material;
        }
        if let Some(shape) = update.shape {
            self.shape = shape;
        }
        if let Some(color) = update.color {
            self.color = color;
        }
    }

    fn matches(&self, bead: &Bead) -> bool {
        if let Some(material) = &self.material {
            if bead.material.as_str() != material {
                return false;
            }
        }
        if let Some(shape) = &self.shape {
            if bead.shape.as_str() != shape {
                return false;
            }
        }
        if let Some(color) = &self.color {
            if !bead
                .base_color
                .to_lowercase()
                .contains(&color.to_lowercase())
            {
                return false;
            }
        }
        true
    }
}

/// The current bead catalog with an id index.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    beads: Vec<Bead>,
    index: HashMap<String, usize>,
    filters: CatalogFilters,
}

impl Catalog {
    pub fn new(beads: Vec<Bead>) -> Self {
        let mut catalog = Self::default();
        catalog.replace(beads);
        catalog
    }

    /// Replace all entries; filters are kept
    pub fn replace(&mut self, beads: Vec<Bead>) {
        self.index = beads
            .iter()
            .enumerate()
            .map(|(i, bead)| (bead.id.clone(), i))
            .collect();
        self.beads = beads;
        debug!("Catalog refreshed with {} beads", self.beads.len());
    }

    /// Add a bead record seen outside a refresh (e.g. a drop payload) if its
    /// id is not known yet. Returns true if it was added.
    pub fn remember(&mut self, bead: &Bead) -> bool {
        if self.index.contains_key(&bead.id) {
            return false;
        }
        self.index.insert(bead.id.clone(), self.beads.len());
        self.beads.push(bead.clone());
        debug!("Catalog learned bead {} from a drop", bead.id);
        true
    }

    pub fn beads(&self) -> &[Bead] {
        &self.beads
    }

    pub fn len(&self) -> usize {
        self.beads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beads.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Bead> {
        self.index.get(id).and_then(|&i| self.beads.get(i))
    }

    pub fn filters(&self) -> &CatalogFilters {
        &self.filters
    }

    pub fn set_filters(&mut self, update: CatalogFilterUpdate) {
        self.filters.apply(update);
    }

    /// Catalog entries passing the active filters, in catalog order
    pub fn filtered(&self) -> Vec<&Bead> {
        self.beads
            .iter()
            .filter(|bead| self.filters.matches(bead))
            .collect()
    }

    /// Look up the catalog data a placed bead needs for rendering
    pub fn resolve(&self, placed: &PlacedBead) -> ResolvedBead {
        match self.get(&placed.catalog_id) {
            Some(bead) => ResolvedBead::from_bead(bead),
            None => ResolvedBead::fallback(&placed.catalog_id),
        }
    }
}

/// Catalog data for one placed bead, with defaults filled in for missing entries.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBead {
    pub catalog_id: String,
    pub shape: BeadShape,
    pub material: BeadMaterial,
    pub base_color: String,
    pub weight_g: f32,
    pub material_config: Option<MaterialOverrides>,
    pub mesh_url: Option<String>,
    pub fallback_url: Option<String>,
    /// False when the catalog entry was missing
    pub in_catalog: bool,
}

impl ResolvedBead {
    fn from_bead(bead: &Bead) -> Self {
        Self {
            catalog_id: bead.id.clone(),
            shape: bead.shape,
            material: bead.material.clone(),
            base_color: bead.base_color.clone(),
            weight_g: bead.weight_g,
            material_config: bead.material_config.clone(),
            mesh_url: bead.mesh_url.clone(),
            fallback_url: bead.fallback_url.clone(),
            in_catalog: true,
        }
    }

    /// Neutral stand-in for a catalog id that is not in the catalog
    pub fn fallback(catalog_id: &str) -> Self {
        Self {
            catalog_id: catalog_id.to_string(),
            shape: BeadShape::Sphere,
            material: BeadMaterial::Other(FALLBACK_CATEGORY.to_string()),
            base_color: DEFAULT_BEAD_COLOR.to_string(),
            weight_g: 1.0,
            material_config: None,
            mesh_url: None,
            fallback_url: None,
            in_catalog: false,
        }
    }

    /// Radius of this bead at the given per-instance scale
    pub fn radius(&self, scale: f32) -> f32 {
        shape_radius(self.shape) * scale
    }

    /// Preset category name used by the material mapper
    pub fn material_category(&self) -> &str {
        self.material.as_str()
    }
}
