//! Beadchain - 3D bead chain designer

use bevy::prelude::*;
use bevy::window::WindowResolution;
use beadchain_config::DisplayConfig;
use beadchain_scene::{ActiveViewMode, OutboundUiMessages, ScenePlugin};

mod catalog;
mod config;
mod input;

use config::BeadchainConfig;

fn main() {
    let config = BeadchainConfig::from_env();

    info!("Starting Beadchain in {:?} view", config.initial_view);

    // Display configuration - single source of truth for window size
    let display_config = DisplayConfig::default();

    let window_config = Window {
        title: "Beadchain".into(),
        resolution: WindowResolution::new(display_config.width, display_config.height),
        present_mode: bevy::window::PresentMode::AutoVsync,
        ..default()
    };

    let mut app = App::new();

    app.insert_resource(ActiveViewMode {
        mode: config.initial_view,
    })
    .insert_resource(config)
    .insert_resource(display_config);

    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(window_config),
                ..default()
            })
            .set(bevy::log::LogPlugin {
                level: bevy::log::Level::INFO,
                ..default()
            }),
    );

    app.add_plugins(ScenePlugin)
        .add_plugins(input::InputPlugin)
        .add_systems(Startup, catalog::send_startup_catalog)
        .add_systems(Last, log_outbound_messages)
        .run();
}

/// No UI is attached to the standalone binary, so scene notifications are
/// written to the log as the JSON a UI would receive.
fn log_outbound_messages(mut outbound: ResMut<OutboundUiMessages>) {
    for message in outbound.drain() {
        match serde_json::to_string(&message) {
            Ok(json) => info!("scene -> ui: {}", json),
            Err(e) => warn!("Failed to serialize UI message: {}", e),
        }
    }
}
