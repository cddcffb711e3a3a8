//! UI command handling
//!
//! Every [`UiToScene`] message reaches the chain store through
//! [`handle_ui_commands`], the only system that mutates it.

use beadchain_ipc::{IpcError, SceneToUi, UiToScene, ViewMode, parse_drop_payload};
use bevy::ecs::message::Message;
use bevy::prelude::*;
use chain::{ChainError, ChainStore};

use crate::OutboundUiMessages;
use crate::store::{ActiveViewMode, ChainStoreResource};

/// A UI command delivered to the scene
#[derive(Message, Debug, Clone)]
pub struct UiCommand(pub UiToScene);

/// Why a command could not be applied
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Invalid drop payload: {0}")]
    Payload(#[from] IpcError),
    #[error(transparent)]
    Chain(#[from] ChainError),
    #[error("Bead could not be placed at slot {0}")]
    Rejected(u32),
}

impl CommandError {
    /// Short machine-readable code forwarded to the UI
    pub fn code(&self) -> &'static str {
        match self {
            Self::Payload(_) => "invalid_payload",
            Self::Chain(_) => "invalid_edit",
            Self::Rejected(_) => "bead_rejected",
        }
    }
}

/// Result of a successfully handled command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Applied,
    /// The command was valid but changed nothing (e.g. undo at the oldest snapshot)
    NoChange,
    ViewChanged(ViewMode),
}

impl From<bool> for CommandOutcome {
    fn from(applied: bool) -> Self {
        if applied { Self::Applied } else { Self::NoChange }
    }
}

/// Apply one UI command to the store and the active view mode.
pub fn apply_command(
    store: &mut ChainStore,
    view: &mut ViewMode,
    command: UiToScene,
) -> Result<CommandOutcome, CommandError> {
    let outcome = match command {
        UiToScene::AddBead { payload, slot } => {
            let bead = parse_drop_payload(&payload)?;
            store.catalog_mut().remember(&bead);
            let slot = slot.unwrap_or_else(|| store.next_free_slot());
            if !store.add_bead(&bead, slot) {
                return Err(CommandError::Rejected(slot));
            }
            CommandOutcome::Applied
        }
        UiToScene::RemoveBead { slot } => store.remove_bead(slot).into(),
        UiToScene::UpdateBead { slot, patch } => store.update_bead(slot, &patch).into(),
        UiToScene::ReorderBead { from, to } => store.reorder(from, to).into(),
        UiToScene::SelectBead { slot } => {
            if store.selected() == slot {
                CommandOutcome::NoChange
            } else {
                store.select(slot);
                CommandOutcome::Applied
            }
        }
        UiToScene::SetStyle { style } => {
            store.set_style(style);
            CommandOutcome::Applied
        }
        UiToScene::MoveControlPoint { index, position } => {
            store.set_control_point(index, Vec3::from_array(position))?;
            CommandOutcome::Applied
        }
        UiToScene::ResetControlPoints => {
            store.reset_control_points();
            CommandOutcome::Applied
        }
        UiToScene::ToggleEditMode => {
            store.toggle_edit_mode();
            CommandOutcome::Applied
        }
        UiToScene::SetViewMode { mode } => {
            if *view == mode {
                CommandOutcome::NoChange
            } else {
                *view = mode;
                CommandOutcome::ViewChanged(mode)
            }
        }
        UiToScene::Undo => store.undo().into(),
        UiToScene::Redo => store.redo().into(),
        UiToScene::ResetChain => {
            store.reset_chain();
            CommandOutcome::Applied
        }
        UiToScene::SetCatalog { beads } => {
            store.set_catalog(beads);
            CommandOutcome::Applied
        }
    };
    Ok(outcome)
}

/// Apply queued UI commands in arrival order
pub(crate) fn handle_ui_commands(
    mut commands: MessageReader<UiCommand>,
    mut store: ResMut<ChainStoreResource>,
    mut view: ResMut<ActiveViewMode>,
    mut outbound: ResMut<OutboundUiMessages>,
) {
    for UiCommand(command) in commands.read() {
        match apply_command(store.store_mut(), &mut view.mode, command.clone()) {
            Ok(CommandOutcome::ViewChanged(mode)) => {
                info!("View mode changed to {:?}", mode);
                outbound.send(SceneToUi::ViewModeChanged { mode });
            }
            Ok(_) => {}
            Err(e) => {
                warn!("Ignoring UI command: {}", e);
                outbound.send(SceneToUi::Error {
                    code: e.code().to_string(),
                    message: e.to_string(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use beadchain_ipc::{Bead, BeadMaterial, BeadPatch, BeadShape, ChainStyle, encode_drop_payload};

    use super::*;

    fn payload(id: &str) -> String {
        let bead = Bead::new(id, id, BeadMaterial::Crystal, BeadShape::Star, "#A0E0FF");
        encode_drop_payload(&bead).unwrap()
    }

    fn add(store: &mut ChainStore, view: &mut ViewMode, id: &str, slot: Option<u32>) {
        let command = UiToScene::AddBead {
            payload: payload(id),
            slot,
        };
        assert_eq!(apply_command(store, view, command).unwrap(), CommandOutcome::Applied);
    }

    #[test]
    fn test_add_bead_appends_and_learns_catalog_entry() {
        let mut store = ChainStore::new();
        let mut view = ViewMode::Flat;
        add(&mut store, &mut view, "c1", None);
        add(&mut store, &mut view, "c2", Some(4));
        add(&mut store, &mut view, "c3", None);

        assert_eq!(store.structure().slots(), vec![0, 4, 5]);
        assert!(store.catalog().get("c2").is_some());
        assert!(store.resolve_bead(&store.beads()[0]).in_catalog);
    }

    #[test]
    fn test_bad_payload_is_rejected_without_change() {
        let mut store = ChainStore::new();
        let mut view = ViewMode::Flat;
        let command = UiToScene::AddBead {
            payload: "{\"id\": 3".to_string(),
            slot: None,
        };
        let err = apply_command(&mut store, &mut view, command).unwrap_err();
        assert_eq!(err.code(), "invalid_payload");
        assert!(store.structure().is_empty());
        assert_eq!(store.history_len(), 1);
    }

    #[test]
    fn test_occupied_slot_reports_rejection() {
        let mut store = ChainStore::new();
        let mut view = ViewMode::Flat;
        add(&mut store, &mut view, "c1", Some(0));
        let command = UiToScene::AddBead {
            payload: payload("c2"),
            slot: Some(0),
        };
        let err = apply_command(&mut store, &mut view, command).unwrap_err();
        assert!(matches!(err, CommandError::Rejected(0)));
        assert_eq!(store.structure().len(), 1);
    }

    #[test]
    fn test_undo_redo_outcomes() {
        let mut store = ChainStore::new();
        let mut view = ViewMode::Flat;
        assert_eq!(
            apply_command(&mut store, &mut view, UiToScene::Undo).unwrap(),
            CommandOutcome::NoChange
        );
        add(&mut store, &mut view, "c1", None);
        apply_command(
            &mut store,
            &mut view,
            UiToScene::UpdateBead {
                slot: 0,
                patch: BeadPatch::scale(1.4),
            },
        )
        .unwrap();
        assert_eq!(
            apply_command(&mut store, &mut view, UiToScene::Undo).unwrap(),
            CommandOutcome::Applied
        );
        assert_eq!(store.beads()[0].scale, 1.0);
        apply_command(&mut store, &mut view, UiToScene::Redo).unwrap();
        assert_eq!(store.beads()[0].scale, 1.4);
    }

    #[test]
    fn test_view_mode_changes_once() {
        let mut store = ChainStore::new();
        let mut view = ViewMode::Flat;
        let command = UiToScene::SetViewMode {
            mode: ViewMode::Hanging,
        };
        assert_eq!(
            apply_command(&mut store, &mut view, command.clone()).unwrap(),
            CommandOutcome::ViewChanged(ViewMode::Hanging)
        );
        assert_eq!(view, ViewMode::Hanging);
        assert_eq!(
            apply_command(&mut store, &mut view, command).unwrap(),
            CommandOutcome::NoChange
        );
    }

    #[test]
    fn test_control_point_out_of_range() {
        let mut store = ChainStore::new();
        let mut view = ViewMode::Flat;
        let revision = store.revision();
        let command = UiToScene::MoveControlPoint {
            index: 99,
            position: [0.0, 0.2, 0.0],
        };
        let err = apply_command(&mut store, &mut view, command).unwrap_err();
        assert_eq!(err.code(), "invalid_edit");
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn test_style_and_reset() {
        let mut store = ChainStore::new();
        let mut view = ViewMode::Flat;
        add(&mut store, &mut view, "c1", None);
        apply_command(
            &mut store,
            &mut view,
            UiToScene::SetStyle {
                style: ChainStyle::Link,
            },
        )
        .unwrap();
        assert_eq!(store.style(), ChainStyle::Link);

        apply_command(&mut store, &mut view, UiToScene::ResetChain).unwrap();
        assert!(store.structure().is_empty());
        assert!(!store.can_undo());
    }
}
