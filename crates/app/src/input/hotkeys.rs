//! Editor hotkeys
//!
//! - Ctrl+Z: Undo
//! - Ctrl+Shift+Z / Ctrl+Y: Redo
//! - Tab: Switch between flat and hanging view
//! - E: Toggle curve editing handles
//! - R: Reset the curve shape
//! - 1-5: Chain string style
//! - A: Add the next catalog bead at the next free slot
//! - Delete / Backspace: Remove the selected bead
//! - Escape: Clear the selection
//!
//! Every hotkey is sent as a [`UiCommand`] so it follows the same path as
//! messages from the UI.

use beadchain_ipc::{Bead, ChainStyle, UiToScene, ViewMode, encode_drop_payload};
use beadchain_scene::{ActiveViewMode, ChainStoreResource, UiCommand};
use bevy::prelude::*;
use chain::ChainStore;

/// Style bound to a number key
pub fn style_for_key(key: KeyCode) -> Option<ChainStyle> {
    let index = match key {
        KeyCode::Digit1 => 0,
        KeyCode::Digit2 => 1,
        KeyCode::Digit3 => 2,
        KeyCode::Digit4 => 3,
        KeyCode::Digit5 => 4,
        _ => return None,
    };
    ChainStyle::ALL.get(index).copied()
}

/// The other presentation mode
pub fn toggled_view(mode: ViewMode) -> ViewMode {
    match mode {
        ViewMode::Flat => ViewMode::Hanging,
        ViewMode::Hanging => ViewMode::Flat,
    }
}

/// Catalog bead added by the add hotkey, cycling through the catalog
pub fn next_catalog_bead(store: &ChainStore) -> Option<&Bead> {
    let beads = store.catalog().beads();
    if beads.is_empty() {
        return None;
    }
    beads.get(store.beads().len() % beads.len())
}

/// Handle undo and redo
pub fn handle_history_hotkeys(
    key_input: Res<ButtonInput<KeyCode>>,
    mut commands: MessageWriter<UiCommand>,
) {
    let ctrl = key_input.pressed(KeyCode::ControlLeft) || key_input.pressed(KeyCode::ControlRight);
    if !ctrl {
        return;
    }
    let shift = key_input.pressed(KeyCode::ShiftLeft) || key_input.pressed(KeyCode::ShiftRight);
    let z_pressed = key_input.just_pressed(KeyCode::KeyZ);

    if z_pressed && !shift {
        debug!("Undo (Ctrl+Z)");
        commands.write(UiCommand(UiToScene::Undo));
    } else if (z_pressed && shift) || key_input.just_pressed(KeyCode::KeyY) {
        debug!("Redo");
        commands.write(UiCommand(UiToScene::Redo));
    }
}

/// Handle view, edit mode, and style keys
pub fn handle_view_hotkeys(
    key_input: Res<ButtonInput<KeyCode>>,
    view: Res<ActiveViewMode>,
    mut commands: MessageWriter<UiCommand>,
) {
    let ctrl = key_input.pressed(KeyCode::ControlLeft) || key_input.pressed(KeyCode::ControlRight);
    if ctrl {
        return;
    }

    if key_input.just_pressed(KeyCode::Tab) {
        commands.write(UiCommand(UiToScene::SetViewMode {
            mode: toggled_view(view.mode),
        }));
    }
    if key_input.just_pressed(KeyCode::KeyE) {
        commands.write(UiCommand(UiToScene::ToggleEditMode));
    }
    if key_input.just_pressed(KeyCode::KeyR) {
        commands.write(UiCommand(UiToScene::ResetControlPoints));
    }
    for key in key_input.get_just_pressed() {
        if let Some(style) = style_for_key(*key) {
            info!("Chain style {:?}", style);
            commands.write(UiCommand(UiToScene::SetStyle { style }));
        }
    }
}

/// Handle keys that edit the bead sequence
pub fn handle_bead_hotkeys(
    key_input: Res<ButtonInput<KeyCode>>,
    store: Res<ChainStoreResource>,
    mut commands: MessageWriter<UiCommand>,
) {
    let ctrl = key_input.pressed(KeyCode::ControlLeft) || key_input.pressed(KeyCode::ControlRight);
    if ctrl {
        return;
    }
    let store = store.store();

    if key_input.just_pressed(KeyCode::KeyA) {
        if let Some(bead) = next_catalog_bead(store) {
            // Same payload a drag from the catalog carries
            match encode_drop_payload(bead) {
                Ok(payload) => {
                    commands.write(UiCommand(UiToScene::AddBead {
                        payload,
                        slot: None,
                    }));
                }
                Err(e) => warn!("Failed to encode bead {}: {}", bead.id, e),
            }
        }
    }

    if key_input.any_just_pressed([KeyCode::Delete, KeyCode::Backspace]) {
        if let Some(slot) = store.selected() {
            commands.write(UiCommand(UiToScene::RemoveBead { slot }));
        }
    }

    if key_input.just_pressed(KeyCode::Escape) && store.selected().is_some() {
        commands.write(UiCommand(UiToScene::SelectBead { slot: None }));
    }
}

#[cfg(test)]
mod tests {
    use beadchain_ipc::{BeadMaterial, BeadShape};

    use super::*;

    #[test]
    fn test_number_keys_map_to_styles() {
        assert_eq!(style_for_key(KeyCode::Digit1), Some(ChainStyle::Simple));
        assert_eq!(style_for_key(KeyCode::Digit5), Some(ChainStyle::Snake));
        assert_eq!(style_for_key(KeyCode::Digit6), None);
    }

    #[test]
    fn test_view_toggle() {
        assert_eq!(toggled_view(ViewMode::Flat), ViewMode::Hanging);
        assert_eq!(toggled_view(ViewMode::Hanging), ViewMode::Flat);
    }

    #[test]
    fn test_add_cycles_through_catalog() {
        let mut store = ChainStore::new();
        let a = Bead::new("a", "A", BeadMaterial::Glass, BeadShape::Sphere, "#FFFFFF");
        let b = Bead::new("b", "B", BeadMaterial::Glass, BeadShape::Cube, "#000000");
        store.set_catalog(vec![a.clone(), b]);

        assert_eq!(next_catalog_bead(&store).map(|bead| bead.id.as_str()), Some("a"));
        store.add_bead(&a, 0);
        assert_eq!(next_catalog_bead(&store).map(|bead| bead.id.as_str()), Some("b"));

        store.set_catalog(Vec::new());
        assert!(next_catalog_bead(&store).is_none());
    }
}
