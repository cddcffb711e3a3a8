//! Shared configuration for Beadchain
//!
//! This crate provides the single source of truth for window dimensions,
//! curve layout parameters, hanging-chain physics tuning, and where editor
//! state is persisted.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[cfg(feature = "bevy")]
use bevy::prelude::Resource;

/// Default window width in pixels
pub const DEFAULT_WIDTH: u32 = 1600;

/// Default window height in pixels
pub const DEFAULT_HEIGHT: u32 = 900;

/// Default scale factor (1.0 = no scaling)
pub const DEFAULT_SCALE: f32 = 1.0;

/// Storage key for the persisted editor state
pub const STATE_KEY: &str = "beadchain-editor";

/// Environment variable overriding the state directory
pub const STATE_DIR_ENV: &str = "BEADCHAIN_STATE_DIR";

/// Display configuration for window and rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(Resource))]
pub struct DisplayConfig {
    /// Window width in logical pixels
    pub width: u32,
    /// Window height in logical pixels
    pub height: u32,
    /// Scale factor for DPI scaling
    pub scale: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            scale: DEFAULT_SCALE,
        }
    }
}

impl DisplayConfig {
    /// Create a new display config with the given dimensions
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            scale: DEFAULT_SCALE,
        }
    }

    /// Get scaled width (for physical pixel calculations)
    pub fn scaled_width(&self) -> u32 {
        (self.width as f32 * self.scale) as u32
    }

    /// Get scaled height (for physical pixel calculations)
    pub fn scaled_height(&self) -> u32 {
        (self.height as f32 * self.scale) as u32
    }
}

/// Parameters for sampling the closed chain curve and its skins
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(Resource))]
pub struct LayoutConfig {
    /// Sample count used for drop-target previews when the chain is empty
    pub preview_slots: usize,
    /// Number of links in the segmented skin
    pub link_count: usize,
    /// Forward curve-parameter offset applied to every other link
    pub link_offset: f32,
    /// Segments along the curve when sweeping a tube skin
    pub tubular_segments: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            preview_slots: 16,
            link_count: 20,
            link_offset: 0.025,
            tubular_segments: 200,
        }
    }
}

/// Tuning for the hanging-chain simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(Resource))]
pub struct PhysicsConfig {
    pub left_anchor: [f32; 3],
    pub right_anchor: [f32; 3],
    /// Radius of the anchor spheres; joints attach at their bottom
    pub anchor_radius: f32,
    pub gravity: [f32; 3],
    pub linear_damping: f32,
    pub angular_damping: f32,
    /// Solver substeps per simulation tick
    pub substeps: u32,
    /// Lower bound for body mass in kilograms
    pub min_mass: f32,
    /// Lower bound for body radius in world units
    pub min_radius: f32,
    /// Fixed timestep in seconds
    pub timestep: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            left_anchor: [-2.5, 3.0, 0.0],
            right_anchor: [2.5, 3.0, 0.0],
            anchor_radius: 0.1,
            gravity: [0.0, -9.81, 0.0],
            linear_damping: 2.0,
            angular_damping: 2.0,
            substeps: 8,
            min_mass: 0.01,
            min_radius: 0.01,
            timestep: 1.0 / 60.0,
        }
    }
}

/// Where the editor state is saved between sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(Resource))]
pub struct PersistenceConfig {
    /// Storage key of the persisted state
    pub key: String,
    /// Directory holding the state file
    pub directory: PathBuf,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            key: STATE_KEY.to_string(),
            directory: PathBuf::from(".beadchain"),
        }
    }
}

impl PersistenceConfig {
    /// Default config with the directory taken from `BEADCHAIN_STATE_DIR` if set
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(dir) = std::env::var_os(STATE_DIR_ENV) {
            if !dir.is_empty() {
                config.directory = PathBuf::from(dir);
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DisplayConfig::default();
        assert_eq!(config.width, DEFAULT_WIDTH);
        assert_eq!(config.height, DEFAULT_HEIGHT);
        assert_eq!(config.scale, DEFAULT_SCALE);
    }

    #[test]
    fn test_scaled_dimensions() {
        let mut config = DisplayConfig::default();
        config.scale = 2.0;
        assert_eq!(config.scaled_width(), 3200);
        assert_eq!(config.scaled_height(), 1800);
    }

    #[test]
    fn test_physics_defaults() {
        let physics = PhysicsConfig::default();
        assert_eq!(physics.left_anchor, [-2.5, 3.0, 0.0]);
        assert_eq!(physics.right_anchor, [2.5, 3.0, 0.0]);
        assert_eq!(physics.linear_damping, 2.0);
        assert!(physics.substeps > 0);
    }

    #[test]
    fn test_layout_defaults() {
        let layout = LayoutConfig::default();
        assert_eq!(layout.preview_slots, 16);
        assert_eq!(layout.link_count, 20);
    }

    #[test]
    fn test_persistence_key() {
        assert_eq!(PersistenceConfig::default().key, "beadchain-editor");
    }
}
