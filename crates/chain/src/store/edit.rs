//! Mutation commands for the chain store

use beadchain_ipc::{Bead, BeadPatch, CatalogFilterUpdate, ChainStyle};
use glam::Vec3;
use tracing::{debug, info, warn};

use crate::error::ChainError;
use crate::types::{ChainStructure, ControlPoints, PlacedBead};

use super::{ChainStore, History, StoreEvent};

/// Metalness given to a freshly placed bead of this category
fn default_metalness(bead: &Bead) -> f32 {
    if bead.material.is_metal() { 0.8 } else { 0.2 }
}

/// Roughness given to a freshly placed bead of this category
fn default_roughness(bead: &Bead) -> f32 {
    if bead.material.is_clear() { 0.1 } else { 0.4 }
}

impl ChainStore {
    /// Append `structure` as a new snapshot, dropping any redo snapshots.
    fn commit(&mut self, structure: ChainStructure) {
        let bead_count = structure.len();
        self.history.commit(structure);
        let revision = self.revision + 1;
        self.emit(StoreEvent::Committed {
            revision,
            bead_count,
        });
    }

    /// Place a catalog bead at `slot`.
    ///
    /// Returns false (and records nothing) if the slot is taken or the chain
    /// is full.
    pub fn add_bead(&mut self, bead: &Bead, slot: u32) -> bool {
        let current = self.structure();
        if current.len() >= current.chain_meta.max_beads {
            warn!(
                "Chain is full ({} beads), not adding {}",
                current.len(),
                bead.id
            );
            return false;
        }
        if current.bead_at_slot(slot).is_some() {
            warn!("Slot {} is occupied, not adding {}", slot, bead.id);
            return false;
        }

        let mut placed = PlacedBead::new(bead.id.clone(), slot);
        placed.metalness = Some(default_metalness(bead));
        placed.roughness = Some(default_roughness(bead));

        let mut next = current.clone();
        next.beads.push(placed);
        next.sort_by_slot();

        info!("Added bead {} at slot {}", bead.id, slot);
        self.commit(next);
        true
    }

    /// Remove the bead at `slot`. Other beads keep their slot numbers.
    pub fn remove_bead(&mut self, slot: u32) -> bool {
        let current = self.structure();
        if current.bead_at_slot(slot).is_none() {
            debug!("No bead at slot {} to remove", slot);
            return false;
        }

        let mut next = current.clone();
        next.beads.retain(|bead| bead.slot != slot);

        info!("Removed bead at slot {}", slot);
        self.commit(next);

        if self.selected == Some(slot) {
            self.selected = None;
            self.emit(StoreEvent::SelectionChanged { slot: None });
        }
        true
    }

    /// Merge per-instance overrides into the bead at `slot`.
    pub fn update_bead(&mut self, slot: u32, patch: &BeadPatch) -> bool {
        let current = self.structure();
        let Some(position) = current.position_of_slot(slot) else {
            debug!("No bead at slot {} to update", slot);
            return false;
        };

        let mut next = current.clone();
        next.beads[position].apply_patch(patch);

        debug!("Updated bead at slot {}", slot);
        self.commit(next);
        true
    }

    /// Move the bead at array position `from` to position `to`, then renumber
    /// every bead's slot to its new array position.
    ///
    /// `to` past the end moves the bead to the end.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        let current = self.structure();
        if from >= current.len() {
            debug!("Reorder source {} out of range ({} beads)", from, current.len());
            return false;
        }

        let mut next = current.clone();
        let moved = next.beads.remove(from);
        let to = to.min(next.beads.len());
        next.beads.insert(to, moved);
        for (position, bead) in next.beads.iter_mut().enumerate() {
            bead.slot = position as u32;
        }

        info!("Moved bead from position {} to {}", from, to);
        self.commit(next);
        true
    }

    /// Replace the chain style.
    pub fn set_style(&mut self, style: ChainStyle) {
        let mut next = self.structure().clone();
        next.style = style;
        info!("Chain style set to {:?}", style);
        self.commit(next);
    }

    /// Move one control point. Live edit: not recorded in history.
    pub fn set_control_point(&mut self, index: usize, point: Vec3) -> Result<(), ChainError> {
        self.control_points.set(index, point)?;
        self.emit(StoreEvent::CurveEdited { index: Some(index) });
        Ok(())
    }

    /// Restore the default curve shape. Not recorded in history.
    pub fn reset_control_points(&mut self) {
        self.control_points = ControlPoints::default();
        debug!("Control points reset to default");
        self.emit(StoreEvent::CurveEdited { index: None });
    }

    /// Step back one snapshot. No-op at the oldest snapshot.
    pub fn undo(&mut self) -> bool {
        if !self.history.undo() {
            debug!("Undo: already at oldest snapshot");
            return false;
        }
        debug!("Undo to snapshot {}", self.history.cursor());
        self.emit_cursor_moved();
        true
    }

    /// Step forward one snapshot. No-op at the newest snapshot.
    pub fn redo(&mut self) -> bool {
        if !self.history.redo() {
            debug!("Redo: already at newest snapshot");
            return false;
        }
        debug!("Redo to snapshot {}", self.history.cursor());
        self.emit_cursor_moved();
        true
    }

    fn emit_cursor_moved(&mut self) {
        let event = StoreEvent::CursorMoved {
            cursor: self.history.cursor(),
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        };
        self.emit(event);
    }

    /// Select a bead by slot, or clear the selection
    pub fn select(&mut self, slot: Option<u32>) {
        if self.selected == slot {
            return;
        }
        self.selected = slot;
        self.emit(StoreEvent::SelectionChanged { slot });
    }

    /// Show or hide curve edit handles
    pub fn toggle_edit_mode(&mut self) -> bool {
        self.edit_mode = !self.edit_mode;
        let editing = self.edit_mode;
        self.emit(StoreEvent::EditModeChanged { editing });
        editing
    }

    /// Discard the design and its history.
    pub fn reset_chain(&mut self) {
        self.history = History::new(ChainStructure::default());
        self.selected = None;
        info!("Chain reset");
        self.emit(StoreEvent::Reset);
    }

    /// Replace the catalog the design references
    pub fn set_catalog(&mut self, beads: Vec<Bead>) {
        self.catalog.replace(beads);
        let bead_count = self.catalog.len();
        self.emit(StoreEvent::CatalogChanged { bead_count });
    }

    /// Update catalog filters
    pub fn set_filters(&mut self, update: CatalogFilterUpdate) {
        self.catalog.set_filters(update);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use beadchain_ipc::{BeadMaterial, BeadShape};

    use super::*;

    fn bead(id: &str, material: BeadMaterial) -> Bead {
        Bead::new(id, id, material, BeadShape::Sphere, "#FF6DAF")
    }

    fn store_with(n: u32) -> ChainStore {
        let mut store = ChainStore::new();
        for i in 0..n {
            assert!(store.add_bead(&bead(&format!("b{}", i), BeadMaterial::Glass), i));
        }
        store
    }

    fn assert_slots_are_positions(store: &ChainStore) {
        for (position, bead) in store.beads().iter().enumerate() {
            assert_eq!(bead.slot, position as u32);
        }
    }

    #[test]
    fn test_add_bead_defaults() {
        let mut store = ChainStore::new();
        store.add_bead(&bead("gold", BeadMaterial::MetalGold), 0);
        store.add_bead(&bead("glass", BeadMaterial::Glass), 1);
        store.add_bead(&bead("acrylic", BeadMaterial::Acrylic), 2);

        let beads = store.beads();
        assert_eq!(beads[0].metalness, Some(0.8));
        assert_eq!(beads[0].roughness, Some(0.4));
        assert_eq!(beads[1].metalness, Some(0.2));
        assert_eq!(beads[1].roughness, Some(0.1));
        assert_eq!(beads[2].metalness, Some(0.2));
        assert_eq!(beads[2].roughness, Some(0.4));
        assert_eq!(beads[2].scale, 1.0);
        assert_eq!(store.history().len(), 4);
    }

    #[test]
    fn test_unlisted_metal_category_is_metallic() {
        let mut store = ChainStore::new();
        store.add_bead(&bead("bronze", BeadMaterial::Other("metal-bronze".into())), 0);
        assert_eq!(store.beads()[0].metalness, Some(0.8));
        assert_eq!(store.beads()[0].roughness, Some(0.4));
    }

    #[test]
    fn test_add_bead_sorts_by_slot() {
        let mut store = ChainStore::new();
        store.add_bead(&bead("c", BeadMaterial::Glass), 5);
        store.add_bead(&bead("a", BeadMaterial::Glass), 1);
        store.add_bead(&bead("b", BeadMaterial::Glass), 3);
        assert_eq!(store.structure().slots(), vec![1, 3, 5]);
    }

    #[test]
    fn test_add_bead_rejects_occupied_slot() {
        let mut store = store_with(2);
        let history_len = store.history().len();
        assert!(!store.add_bead(&bead("dup", BeadMaterial::Glass), 1));
        assert_eq!(store.history().len(), history_len);
    }

    #[test]
    fn test_add_bead_respects_capacity() {
        let mut store = ChainStore::new();
        let max = store.structure().chain_meta.max_beads as u32;
        for i in 0..max {
            assert!(store.add_bead(&bead("x", BeadMaterial::Wood), i));
        }
        assert!(!store.add_bead(&bead("x", BeadMaterial::Wood), max));
        assert_eq!(store.beads().len(), max as usize);
    }

    #[test]
    fn test_remove_keeps_gaps() {
        let mut store = ChainStore::new();
        store.add_bead(&bead("A", BeadMaterial::Glass), 0);
        store.add_bead(&bead("B", BeadMaterial::Glass), 1);
        assert!(store.remove_bead(0));

        let beads = store.beads();
        assert_eq!(beads.len(), 1);
        assert_eq!(beads[0].catalog_id, "B");
        assert_eq!(beads[0].slot, 1);
    }

    #[test]
    fn test_remove_missing_slot_is_noop() {
        let mut store = store_with(2);
        let history_len = store.history().len();
        assert!(!store.remove_bead(9));
        assert_eq!(store.history().len(), history_len);
    }

    #[test]
    fn test_remove_clears_matching_selection() {
        let mut store = store_with(3);
        store.select(Some(2));
        store.remove_bead(1);
        assert_eq!(store.selected(), Some(2));
        store.remove_bead(2);
        assert_eq!(store.selected(), None);
    }

    #[test]
    fn test_update_merges_fields() {
        let mut store = store_with(2);
        assert!(store.update_bead(1, &BeadPatch::tint("#123456")));
        let bead = store.structure().bead_at_slot(1).unwrap();
        assert_eq!(bead.custom_tint.as_deref(), Some("#123456"));
        assert_eq!(bead.roughness, Some(0.1));
        assert!(!store.update_bead(7, &BeadPatch::scale(2.0)));
    }

    #[test]
    fn test_reorder_renumbers_all_slots() {
        let mut store = store_with(5);
        store.remove_bead(1);
        store.remove_bead(3);
        assert_eq!(store.structure().slots(), vec![0, 2, 4]);

        assert!(store.reorder(0, 2));
        assert_slots_are_positions(&store);
        let ids: Vec<_> = store.beads().iter().map(|b| b.catalog_id.as_str()).collect();
        assert_eq!(ids, vec!["b2", "b4", "b0"]);
    }

    #[test]
    fn test_reorder_out_of_range() {
        let mut store = store_with(3);
        assert!(!store.reorder(3, 0));
        assert!(store.reorder(0, 99));
        let ids: Vec<_> = store.beads().iter().map(|b| b.catalog_id.as_str()).collect();
        assert_eq!(ids, vec!["b1", "b2", "b0"]);
        assert_slots_are_positions(&store);
    }

    #[test]
    fn test_mixed_sequence_slot_invariants() {
        let mut store = store_with(6);
        for step in 0..20u32 {
            match step % 4 {
                0 => {
                    let slot = store.next_free_slot();
                    store.add_bead(&bead("n", BeadMaterial::Acrylic), slot);
                }
                1 => {
                    let before: Vec<_> = store.beads().to_vec();
                    if let Some(target) = before.get(1).map(|b| b.slot) {
                        store.remove_bead(target);
                        for survivor in store.beads() {
                            assert!(before.iter().any(|b| b == survivor));
                        }
                    }
                }
                2 => {
                    let len = store.beads().len();
                    if len > 0 {
                        store.reorder(step as usize % len, 0);
                        assert_slots_are_positions(&store);
                    }
                }
                _ => {
                    store.update_bead(0, &BeadPatch::scale(1.2));
                }
            }
        }
    }

    #[test]
    fn test_undo_redo_restores_structures() {
        let mut store = ChainStore::new();
        let mut seen = vec![store.structure().clone()];
        for i in 0..4 {
            store.add_bead(&bead("x", BeadMaterial::Glass), i);
            seen.push(store.structure().clone());
        }

        for k in 1..=4 {
            assert!(store.undo());
            assert_eq!(store.structure(), &seen[4 - k]);
        }
        assert!(!store.undo());
        for k in 1..=4 {
            assert!(store.redo());
            assert_eq!(store.structure(), &seen[k]);
        }
        assert!(!store.redo());
    }

    #[test]
    fn test_redo_unavailable_after_new_mutation() {
        let mut store = store_with(3);
        store.undo();
        store.undo();
        assert!(store.can_redo());
        store.set_style(ChainStyle::Link);
        assert!(!store.can_redo());
        assert!(!store.redo());
        assert_eq!(store.structure().len(), 1);
        assert_eq!(store.style(), ChainStyle::Link);
    }

    #[test]
    fn test_control_points_bypass_history() {
        let mut store = store_with(1);
        let history_len = store.history().len();
        let revision = store.revision();

        store.set_control_point(0, Vec3::new(3.0, 0.21, 0.0)).unwrap();
        assert_eq!(store.history().len(), history_len);
        assert!(store.revision() > revision);
        assert!(store.set_control_point(40, Vec3::ZERO).is_err());

        store.undo();
        assert_eq!(store.control_points().get(0), Some(Vec3::new(3.0, 0.21, 0.0)));

        store.reset_control_points();
        assert_eq!(store.control_points(), &ControlPoints::default());
        assert_eq!(store.history().len(), history_len);
    }

    #[test]
    fn test_reset_chain() {
        let mut store = store_with(3);
        store.select(Some(1));
        store.reset_chain();
        assert!(store.beads().is_empty());
        assert_eq!(store.history().len(), 1);
        assert!(!store.can_undo());
        assert_eq!(store.selected(), None);
    }

    #[test]
    fn test_listeners_receive_events() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);

        let mut store = ChainStore::new();
        store.subscribe(move |event| sink.lock().unwrap().push(event.clone()));
        store.add_bead(&bead("a", BeadMaterial::Glass), 0);
        store.undo();
        store.toggle_edit_mode();

        let events = events.lock().unwrap();
        assert_eq!(
            events[0],
            StoreEvent::Committed {
                revision: 1,
                bead_count: 1
            }
        );
        assert!(matches!(events[1], StoreEvent::CursorMoved { cursor: 0, can_undo: false, can_redo: true }));
        assert_eq!(events[2], StoreEvent::EditModeChanged { editing: true });
        assert_eq!(store.revision(), 3);
    }
}
