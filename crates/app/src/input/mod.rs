//! Keyboard input for the editor
//!
//! Mouse input (orbit, curve handle drags, bead picking) lives with the
//! scene systems that own it; this plugin only maps hotkeys to commands.

use bevy::input::InputSystems;
use bevy::prelude::*;

pub mod hotkeys;

use hotkeys::{handle_bead_hotkeys, handle_history_hotkeys, handle_view_hotkeys};

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        // Commands are read in Update, so PreUpdate writes land the same frame
        app.add_systems(
            PreUpdate,
            (
                handle_history_hotkeys,
                handle_view_hotkeys,
                handle_bead_hotkeys,
            )
                .after(InputSystems),
        );

        info!("Input plugin initialized");
    }
}
