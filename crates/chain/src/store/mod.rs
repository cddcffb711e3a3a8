//! Versioned chain structure store
//!
//! [`ChainStore`] is the single owner of the chain design. It exposes:
//! - Structural commands (`add_bead`, `remove_bead`, `update_bead`,
//!   `reorder`, `set_style`) that each append a history snapshot
//! - Undo/redo over those snapshots
//! - Live curve editing (`set_control_point`) that bypasses the history
//! - The read-only catalog the design references
//!
//! Readers either poll [`ChainStore::revision`] once per frame or register a
//! listener with [`ChainStore::subscribe`].

mod edit;
mod events;
mod history;
mod persist;

pub use events::StoreEvent;
pub use history::History;
pub use persist::{FileStorage, MemoryStorage, PersistedState, StateStorage};

use beadchain_ipc::{Bead, ChainStyle};

use crate::catalog::{Catalog, ResolvedBead};
use crate::types::{ChainStructure, ControlPoints, PlacedBead};

type Listener = Box<dyn Fn(&StoreEvent) + Send + Sync>;

/// Owner of the canonical chain structure and its edit history.
pub struct ChainStore {
    /// Snapshot list; the snapshot at the cursor is the current structure
    pub(crate) history: History,
    /// Curve shape, edited live and never recorded in history
    pub(crate) control_points: ControlPoints,
    /// Bead catalog supplied by the catalog collaborator
    pub(crate) catalog: Catalog,
    /// Selected slot
    pub(crate) selected: Option<u32>,
    /// Whether curve handles are shown (transient)
    pub(crate) edit_mode: bool,
    /// Bumped on every change a renderer must pick up
    pub(crate) revision: u64,
    pub(crate) listeners: Vec<Listener>,
}

impl std::fmt::Debug for ChainStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainStore")
            .field("bead_count", &self.structure().len())
            .field("history_len", &self.history.len())
            .field("cursor", &self.history.cursor())
            .field("revision", &self.revision)
            .field("listener_count", &self.listeners.len())
            .finish()
    }
}

impl Default for ChainStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ChainStore {
    /// Store holding the default empty chain
    pub fn new() -> Self {
        Self::with_history(History::new(ChainStructure::default()))
    }

    pub(crate) fn with_history(history: History) -> Self {
        Self {
            history,
            control_points: ControlPoints::default(),
            catalog: Catalog::default(),
            selected: None,
            edit_mode: false,
            revision: 0,
            listeners: Vec::new(),
        }
    }

    /// The current chain structure
    pub fn structure(&self) -> &ChainStructure {
        self.history.current()
    }

    pub fn beads(&self) -> &[PlacedBead] {
        &self.structure().beads
    }

    pub fn style(&self) -> ChainStyle {
        self.structure().style
    }

    pub fn control_points(&self) -> &ControlPoints {
        &self.control_points
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn cursor(&self) -> usize {
        self.history.cursor()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn selected(&self) -> Option<u32> {
        self.selected
    }

    pub fn is_edit_mode(&self) -> bool {
        self.edit_mode
    }

    /// Monotonic change counter for per-frame polling
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Slot to use when appending a bead at the end of the chain
    pub fn next_free_slot(&self) -> u32 {
        self.structure().next_free_slot()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut Catalog {
        &mut self.catalog
    }

    /// Catalog entries passing the active filters
    pub fn filtered_beads(&self) -> Vec<&Bead> {
        self.catalog.filtered()
    }

    /// Catalog data for a placed bead (neutral defaults if the id is unknown)
    pub fn resolve_bead(&self, placed: &PlacedBead) -> ResolvedBead {
        self.catalog.resolve(placed)
    }

    /// Register a listener called after every applied change.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(&StoreEvent) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Bump the revision and notify listeners.
    pub(crate) fn emit(&mut self, event: StoreEvent) {
        self.revision += 1;
        for listener in &self.listeners {
            listener(&event);
        }
    }
}
