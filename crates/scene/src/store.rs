//! Chain store resource
//!
//! Wraps the [`ChainStore`] as a Bevy resource, forwards its change events to
//! the UI, and writes the design to disk after every history change.

use std::sync::{Arc, Mutex, PoisonError};

use beadchain_config::{LayoutConfig, PersistenceConfig, PhysicsConfig};
use beadchain_ipc::{SceneToUi, ViewMode};
use bevy::prelude::*;
use chain::{ChainError, ChainStore, FileStorage, StoreEvent};

use crate::OutboundUiMessages;
use crate::commands::{UiCommand, handle_ui_commands};

/// Presentation mode the scene renders in
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct ActiveViewMode {
    pub mode: ViewMode,
}

/// The canonical chain store plus its pending change events
#[derive(Resource)]
pub struct ChainStoreResource {
    store: ChainStore,
    events: Arc<Mutex<Vec<StoreEvent>>>,
    storage: Option<FileStorage>,
    key: String,
}

impl ChainStoreResource {
    /// Wrap `store` and start collecting its events
    pub fn new(mut store: ChainStore) -> Self {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        store.subscribe(move |event| {
            sink.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(event.clone());
        });
        Self {
            store,
            events,
            storage: None,
            key: String::new(),
        }
    }

    /// Store restored from the persisted state named by `config`.
    ///
    /// A missing or unreadable state file leaves the default empty chain.
    pub fn load(config: &PersistenceConfig) -> Self {
        let storage = FileStorage::new(&config.directory);
        let mut store = ChainStore::new();
        match store.load_from(&storage, &config.key) {
            Ok(true) => info!("Loaded saved chain from {:?}", storage.path_for(&config.key)),
            Ok(false) => {}
            Err(e) => warn!("Discarding saved chain state: {}", e),
        }

        let mut resource = Self::new(store);
        resource.storage = Some(storage);
        resource.key = config.key.clone();
        resource
    }

    pub fn store(&self) -> &ChainStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ChainStore {
        &mut self.store
    }

    /// Take all events emitted since the last call
    pub fn take_events(&mut self) -> Vec<StoreEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Persist the design. No-op when the resource has no storage.
    pub fn save(&self) -> Result<(), ChainError> {
        match &self.storage {
            Some(storage) => self.store.save_to(storage, &self.key),
            None => Ok(()),
        }
    }
}

/// Ordering of store work within a frame
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChainStoreSet {
    /// UI commands are applied
    Commands,
    /// Store events are forwarded and persisted
    Publish,
}

pub struct ChainStorePlugin;

impl Plugin for ChainStorePlugin {
    fn build(&self, app: &mut App) {
        let persistence = app
            .world()
            .get_resource::<PersistenceConfig>()
            .cloned()
            .unwrap_or_else(PersistenceConfig::from_env);

        app.insert_resource(ChainStoreResource::load(&persistence))
            .insert_resource(persistence)
            .init_resource::<ActiveViewMode>()
            .init_resource::<LayoutConfig>()
            .init_resource::<PhysicsConfig>()
            .add_message::<UiCommand>()
            .configure_sets(
                Update,
                (ChainStoreSet::Commands, ChainStoreSet::Publish).chain(),
            )
            .add_systems(
                Update,
                (
                    handle_ui_commands.in_set(ChainStoreSet::Commands),
                    publish_store_events.in_set(ChainStoreSet::Publish),
                ),
            );
    }
}

/// UI notifications for one store event
pub(crate) fn ui_messages_for(event: &StoreEvent, store: &ChainStore) -> Vec<SceneToUi> {
    let structure_changed = || SceneToUi::StructureChanged {
        bead_count: store.structure().len(),
        style: store.style(),
        revision: store.revision(),
    };
    let history_changed = || SceneToUi::HistoryChanged {
        can_undo: store.can_undo(),
        can_redo: store.can_redo(),
    };

    match event {
        StoreEvent::Committed { .. } | StoreEvent::CursorMoved { .. } => {
            vec![structure_changed(), history_changed()]
        }
        StoreEvent::Reset => vec![
            structure_changed(),
            history_changed(),
            SceneToUi::SelectionChanged { slot: None },
        ],
        StoreEvent::SelectionChanged { slot } => {
            vec![SceneToUi::SelectionChanged { slot: *slot }]
        }
        StoreEvent::EditModeChanged { editing } => {
            vec![SceneToUi::EditModeChanged { editing: *editing }]
        }
        StoreEvent::CurveEdited { .. } | StoreEvent::CatalogChanged { .. } => Vec::new(),
    }
}

/// Whether the persisted subset changed
pub(crate) fn changes_persisted_state(event: &StoreEvent) -> bool {
    matches!(
        event,
        StoreEvent::Committed { .. } | StoreEvent::CursorMoved { .. } | StoreEvent::Reset
    )
}

fn publish_store_events(
    mut store: ResMut<ChainStoreResource>,
    mut outbound: ResMut<OutboundUiMessages>,
) {
    let events = store.take_events();
    if events.is_empty() {
        return;
    }

    let mut dirty = false;
    for event in &events {
        debug!("Store event: {:?}", event);
        for msg in ui_messages_for(event, store.store()) {
            outbound.send(msg);
        }
        dirty |= changes_persisted_state(event);
    }

    if dirty {
        if let Err(e) = store.save() {
            warn!("Failed to save chain state: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use beadchain_ipc::{Bead, BeadMaterial, BeadShape};

    use super::*;

    #[test]
    fn test_events_are_collected_and_drained() {
        let mut resource = ChainStoreResource::new(ChainStore::new());
        let bead = Bead::new("a", "A", BeadMaterial::Wood, BeadShape::Cube, "#8B5A2B");
        resource.store_mut().add_bead(&bead, 0);
        resource.store_mut().select(Some(0));

        let events = resource.take_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], StoreEvent::Committed { bead_count: 1, .. }));
        assert!(resource.take_events().is_empty());
    }

    #[test]
    fn test_commit_maps_to_structure_and_history() {
        let mut store = ChainStore::new();
        let bead = Bead::new("a", "A", BeadMaterial::Wood, BeadShape::Cube, "#8B5A2B");
        store.add_bead(&bead, 0);
        let event = StoreEvent::Committed {
            revision: store.revision(),
            bead_count: 1,
        };

        let messages = ui_messages_for(&event, &store);
        assert_eq!(messages.len(), 2);
        assert!(matches!(
            messages[0],
            SceneToUi::StructureChanged { bead_count: 1, .. }
        ));
        assert!(matches!(
            messages[1],
            SceneToUi::HistoryChanged {
                can_undo: true,
                can_redo: false
            }
        ));
        assert!(changes_persisted_state(&event));
    }

    #[test]
    fn test_curve_edits_are_not_persisted() {
        let store = ChainStore::new();
        let event = StoreEvent::CurveEdited { index: Some(2) };
        assert!(ui_messages_for(&event, &store).is_empty());
        assert!(!changes_persisted_state(&event));
        assert!(!changes_persisted_state(&StoreEvent::SelectionChanged { slot: None }));
    }

    #[test]
    fn test_save_roundtrips_through_file_storage() {
        let dir = std::env::temp_dir().join(format!("beadchain-scene-{}", std::process::id()));
        let config = PersistenceConfig {
            key: "scene-test".to_string(),
            directory: dir.clone(),
        };

        let mut resource = ChainStoreResource::load(&config);
        let bead = Bead::new("a", "A", BeadMaterial::Glass, BeadShape::Sphere, "#FFFFFF");
        resource.store_mut().add_bead(&bead, 3);
        resource.save().unwrap();

        let restored = ChainStoreResource::load(&config);
        assert_eq!(restored.store().structure().slots(), vec![3]);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
