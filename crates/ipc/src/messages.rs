//! Main IPC message enums for communication between the scene and the UI.

use serde::{Deserialize, Serialize};

use crate::types::{Bead, BeadPatch, ChainStyle, ViewMode};

/// Messages from the UI to the 3D scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum UiToScene {
    /// A bead was dropped on the chain.
    ///
    /// `payload` is the serialized catalog record carried by the drag
    /// operation; `slot` defaults to the next free slot.
    AddBead { payload: String, slot: Option<u32> },

    /// Remove the bead at a slot
    RemoveBead { slot: u32 },

    /// Merge per-instance overrides into the bead at a slot
    UpdateBead { slot: u32, patch: BeadPatch },

    /// Move a bead between array positions (renumbers all slots)
    ReorderBead { from: usize, to: usize },

    /// Select a bead by slot, or clear the selection
    SelectBead { slot: Option<u32> },

    /// Change the chain string style
    SetStyle { style: ChainStyle },

    /// Live drag of a curve control point (not recorded in history)
    MoveControlPoint { index: usize, position: [f32; 3] },

    /// Restore the default curve shape (not recorded in history)
    ResetControlPoints,

    /// Toggle curve editing handles
    ToggleEditMode,

    /// Switch between flat and hanging presentation
    SetViewMode { mode: ViewMode },

    Undo,
    Redo,

    /// Discard the design and its history
    ResetChain,

    /// Replace the bead catalog
    SetCatalog { beads: Vec<Bead> },
}

/// Messages from the 3D scene to the UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum SceneToUi {
    /// The canonical chain structure changed
    StructureChanged {
        bead_count: usize,
        style: ChainStyle,
        revision: u64,
    },

    /// Bead selection changed
    SelectionChanged { slot: Option<u32> },

    /// Undo/redo availability changed
    HistoryChanged { can_undo: bool, can_redo: bool },

    /// Presentation mode changed
    ViewModeChanged { mode: ViewMode },

    /// Curve edit handles shown or hidden
    EditModeChanged { editing: bool },

    /// Error notification
    Error { code: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_wire_format() {
        let msg = UiToScene::RemoveBead { slot: 3 };
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"type":"RemoveBead","data":{"slot":3}}"#);

        let undo: UiToScene = serde_json::from_str(r#"{"type":"Undo"}"#).unwrap();
        assert!(matches!(undo, UiToScene::Undo));
    }

    #[test]
    fn test_view_mode_message() {
        let msg: UiToScene =
            serde_json::from_str(r#"{"type":"SetViewMode","data":{"mode":"hanging"}}"#).unwrap();
        match msg {
            UiToScene::SetViewMode { mode } => assert_eq!(mode, ViewMode::Hanging),
            other => panic!("unexpected message {:?}", other),
        }
    }
}
