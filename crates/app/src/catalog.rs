//! Startup catalog from a JSON file
//!
//! The file holds an array of bead records in the same shape the UI sends
//! with `SetCatalog`.

use std::path::{Path, PathBuf};

use beadchain_ipc::{Bead, UiToScene};
use beadchain_scene::UiCommand;
use bevy::prelude::*;
use thiserror::Error;

use crate::config::BeadchainConfig;

#[derive(Debug, Error)]
pub enum CatalogFileError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid catalog in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Parse catalog records from JSON bytes
pub fn parse_catalog(bytes: &[u8]) -> Result<Vec<Bead>, serde_json::Error> {
    serde_json::from_slice(bytes)
}

/// Read catalog records from a file
pub fn load_catalog_file(path: &Path) -> Result<Vec<Bead>, CatalogFileError> {
    let bytes = std::fs::read(path).map_err(|source| CatalogFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_catalog(&bytes).map_err(|source| CatalogFileError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Send the configured catalog to the scene once at startup
pub fn send_startup_catalog(config: Res<BeadchainConfig>, mut commands: MessageWriter<UiCommand>) {
    let Some(path) = config.catalog_path.as_deref() else {
        return;
    };
    match load_catalog_file(path) {
        Ok(beads) => {
            info!("Loaded {} catalog beads from {}", beads.len(), path.display());
            commands.write(UiCommand(UiToScene::SetCatalog { beads }));
        }
        Err(e) => warn!("Catalog not loaded: {}", e),
    }
}
