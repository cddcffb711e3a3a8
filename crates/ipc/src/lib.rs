//! IPC message protocol for Beadchain
//!
//! Defines the records exchanged with the external collaborators of the
//! editor core: catalog bead entries, drag-and-drop payloads, and the
//! message enums passed between the UI and the 3D scene.

mod error;
mod messages;
mod payload;
pub mod types;

pub use error::IpcError;
pub use messages::{SceneToUi, UiToScene};
pub use payload::{encode_drop_payload, parse_drop_payload};
pub use types::*;
