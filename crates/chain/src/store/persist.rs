//! Persisting the chain design and its history

use std::collections::HashMap;
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ChainError;
use crate::types::ChainStructure;

use super::{ChainStore, History, StoreEvent};

/// The persisted subset of the store.
///
/// Control points, selection, and edit mode are session state and are not
/// included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    pub chain_structure: ChainStructure,
    #[serde(default)]
    pub history: Vec<ChainStructure>,
    #[serde(default)]
    pub history_index: usize,
}

impl PersistedState {
    pub fn to_json(&self) -> Result<Vec<u8>, ChainError> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, ChainError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Check the payload is internally consistent and build its history.
    ///
    /// An empty history is accepted and treated as a single snapshot of
    /// `chain_structure`.
    pub fn into_history(self) -> Result<History, ChainError> {
        if self.history.is_empty() {
            check_unique_slots(&self.chain_structure)?;
            return Ok(History::new(self.chain_structure));
        }

        for snapshot in &self.history {
            check_unique_slots(snapshot)?;
        }
        let history = History::from_parts(self.history, self.history_index)?;
        if history.current() != &self.chain_structure {
            return Err(ChainError::CorruptState(format!(
                "structure does not match history snapshot {}",
                self.history_index
            )));
        }
        Ok(history)
    }
}

fn check_unique_slots(structure: &ChainStructure) -> Result<(), ChainError> {
    let mut seen = HashSet::with_capacity(structure.len());
    for bead in &structure.beads {
        if !seen.insert(bead.slot) {
            return Err(ChainError::CorruptState(format!(
                "slot {} is used more than once",
                bead.slot
            )));
        }
    }
    Ok(())
}

/// Byte-level key/value storage for persisted state
pub trait StateStorage {
    /// Stored bytes for `key`, or `None` if nothing was saved yet
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, ChainError>;
    fn save(&self, key: &str, bytes: &[u8]) -> Result<(), ChainError>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    directory: PathBuf,
}

impl FileStorage {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.directory.join(format!("{}.json", key))
    }
}

impl StateStorage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, ChainError> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, key: &str, bytes: &[u8]) -> Result<(), ChainError> {
        fs::create_dir_all(&self.directory)?;
        fs::write(self.path_for(key), bytes)?;
        Ok(())
    }
}

/// In-memory storage
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStorage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, ChainError> {
        let entries = self.entries.lock().expect("memory storage lock poisoned");
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, bytes: &[u8]) -> Result<(), ChainError> {
        let mut entries = self.entries.lock().expect("memory storage lock poisoned");
        entries.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}

impl ChainStore {
    /// Snapshot of the persisted subset of this store
    pub fn to_persisted(&self) -> PersistedState {
        PersistedState {
            chain_structure: self.structure().clone(),
            history: self.history.snapshots().to_vec(),
            history_index: self.history.cursor(),
        }
    }

    /// Build a store from persisted state. Session state starts at defaults.
    pub fn from_persisted(state: PersistedState) -> Result<Self, ChainError> {
        Ok(Self::with_history(state.into_history()?))
    }

    /// Replace this store's history with persisted state, keeping the
    /// catalog, control points, and listeners.
    pub fn restore(&mut self, state: PersistedState) -> Result<(), ChainError> {
        self.history = state.into_history()?;
        self.selected = None;
        self.emit(StoreEvent::Reset);
        Ok(())
    }

    pub fn save_to(&self, storage: &dyn StateStorage, key: &str) -> Result<(), ChainError> {
        let bytes = self.to_persisted().to_json()?;
        storage.save(key, &bytes)?;
        debug!("Saved chain state under {} ({} bytes)", key, bytes.len());
        Ok(())
    }

    /// Restore from `storage`. Returns false if nothing is stored under `key`;
    /// the store is left untouched on any error.
    pub fn load_from(&mut self, storage: &dyn StateStorage, key: &str) -> Result<bool, ChainError> {
        let Some(bytes) = storage.load(key)? else {
            debug!("No saved chain state under {}", key);
            return Ok(false);
        };
        let state = PersistedState::from_json(&bytes)?;
        self.restore(state)?;
        info!(
            "Restored chain with {} beads ({} snapshots)",
            self.structure().len(),
            self.history.len()
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use beadchain_ipc::{Bead, BeadMaterial, BeadShape, ChainStyle};
    use glam::Vec3;

    use super::*;
    use crate::types::PlacedBead;

    const KEY: &str = "beadchain-editor";

    fn edited_store() -> ChainStore {
        let mut store = ChainStore::new();
        let bead = Bead::new("5", "Gold", BeadMaterial::MetalGold, BeadShape::Heart, "#FFD700");
        store.add_bead(&bead, 0);
        store.add_bead(&bead, 1);
        store.set_style(ChainStyle::Rope);
        store.undo();
        store
    }

    #[test]
    fn test_roundtrip_keeps_history_and_cursor() {
        let storage = MemoryStorage::new();
        let mut store = edited_store();
        store.set_control_point(0, Vec3::new(1.0, 0.3, 1.0)).unwrap();
        store.save_to(&storage, KEY).unwrap();

        let mut restored = ChainStore::new();
        assert!(restored.load_from(&storage, KEY).unwrap());
        assert_eq!(restored.structure(), store.structure());
        assert_eq!(restored.history(), store.history());
        assert!(restored.can_redo());
        assert!(restored.redo());
        assert_eq!(restored.style(), ChainStyle::Rope);
        // Curve shape is session state
        assert_eq!(restored.control_points(), &crate::types::ControlPoints::default());
    }

    #[test]
    fn test_json_uses_camel_case_keys() {
        let json = String::from_utf8(edited_store().to_persisted().to_json().unwrap()).unwrap();
        assert!(json.contains("\"chainStructure\""));
        assert!(json.contains("\"historyIndex\":2"));
        assert!(json.contains("\"catalogId\":\"5\""));
        assert!(json.contains("\"maxBeads\":50"));
    }

    #[test]
    fn test_missing_key_leaves_store() {
        let storage = MemoryStorage::new();
        let mut store = edited_store();
        let before = store.history().clone();
        assert!(!store.load_from(&storage, KEY).unwrap());
        assert_eq!(store.history(), &before);
    }

    #[test]
    fn test_corrupt_payloads_rejected() {
        let storage = MemoryStorage::new();
        let mut store = edited_store();
        let before = store.history().clone();

        storage.save(KEY, b"{not json").unwrap();
        assert!(matches!(store.load_from(&storage, KEY), Err(ChainError::Serde(_))));

        let mut state = store.to_persisted();
        state.history_index = 9;
        storage.save(KEY, &state.to_json().unwrap()).unwrap();
        assert!(matches!(store.load_from(&storage, KEY), Err(ChainError::CorruptState(_))));

        let mut state = store.to_persisted();
        state.chain_structure.style = ChainStyle::Snake;
        assert!(ChainStore::from_persisted(state).is_err());

        let mut state = store.to_persisted();
        state.history[1].beads.push(PlacedBead::new("5", 0));
        assert!(ChainStore::from_persisted(state).is_err());

        assert_eq!(store.history(), &before);
    }

    #[test]
    fn test_empty_history_uses_structure() {
        let mut structure = ChainStructure::default();
        structure.beads.push(PlacedBead::new("a", 3));
        let state = PersistedState {
            chain_structure: structure.clone(),
            history: Vec::new(),
            history_index: 0,
        };
        let store = ChainStore::from_persisted(state).unwrap();
        assert_eq!(store.structure(), &structure);
        assert_eq!(store.history_len(), 1);
    }

    #[test]
    fn test_file_storage_roundtrip() {
        let dir = std::env::temp_dir().join(format!("beadchain-test-{}", std::process::id()));
        let storage = FileStorage::new(&dir);
        assert!(storage.load(KEY).unwrap().is_none());

        let store = edited_store();
        store.save_to(&storage, KEY).unwrap();
        assert!(storage.path_for(KEY).ends_with("beadchain-editor.json"));

        let mut restored = ChainStore::new();
        assert!(restored.load_from(&storage, KEY).unwrap());
        assert_eq!(restored.structure(), store.structure());

        let _ = fs::remove_dir_all(&dir);
    }
}
