//! Beadchain editing core
//!
//! This crate holds everything about a bead chain design that does not
//! depend on a renderer:
//! - [`store`] - The canonical chain structure with undo/redo history
//! - [`layout`] - Bead placement along the editable closed curve, chain skins
//! - [`physics`] - Hanging-chain rigid body simulation with ball joints
//! - [`material`] - Material presets and per-bead shading resolution
//! - [`catalog`] - Catalog lookup, filtering, and shape metrics
//! - [`asset`] - Validation of external bead mesh files
//!
//! The Bevy plugin in `beadchain-scene` drives these once per frame.

pub mod asset;
pub mod catalog;
pub mod color;
pub mod constants;
pub mod error;
pub mod layout;
pub mod material;
pub mod physics;
pub mod store;
pub mod types;

pub use catalog::*;
pub use constants::*;
pub use error::*;
pub use layout::*;
pub use material::*;
pub use physics::*;
pub use store::*;
pub use types::*;
