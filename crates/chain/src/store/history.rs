//! Linear snapshot history with a cursor

use tracing::debug;

use crate::error::ChainError;
use crate::types::ChainStructure;

/// Snapshot list plus the index of the snapshot currently shown.
///
/// The cursor is always a valid index. Committing after an undo drops every
/// snapshot past the cursor, so there is never more than one redo branch.
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    snapshots: Vec<ChainStructure>,
    cursor: usize,
}

impl History {
    /// History containing a single snapshot
    pub fn new(initial: ChainStructure) -> Self {
        Self {
            snapshots: vec![initial],
            cursor: 0,
        }
    }

    /// Rebuild a history from persisted parts
    pub fn from_parts(snapshots: Vec<ChainStructure>, cursor: usize) -> Result<Self, ChainError> {
        if snapshots.is_empty() {
            return Err(ChainError::CorruptState("history is empty".to_string()));
        }
        if cursor >= snapshots.len() {
            return Err(ChainError::CorruptState(format!(
                "history cursor {} out of range ({} snapshots)",
                cursor,
                snapshots.len()
            )));
        }
        Ok(Self { snapshots, cursor })
    }

    /// Snapshot at the cursor
    pub fn current(&self) -> &ChainStructure {
        &self.snapshots[self.cursor]
    }

    /// Drop snapshots ahead of the cursor, then append `snapshot` and move onto it
    pub fn commit(&mut self, snapshot: ChainStructure) {
        let dropped = self.snapshots.len() - (self.cursor + 1);
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(snapshot);
        self.cursor = self.snapshots.len() - 1;
        if dropped > 0 {
            debug!("History commit discarded {} redo snapshots", dropped);
        }
    }

    /// Step back one snapshot. Returns false at the oldest snapshot.
    pub fn undo(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Step forward one snapshot. Returns false at the newest snapshot.
    pub fn redo(&mut self) -> bool {
        if self.cursor + 1 >= self.snapshots.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of snapshots; at least one
    pub(crate) fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn snapshots(&self) -> &[ChainStructure] {
        &self.snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PlacedBead;

    fn with_beads(n: u32) -> ChainStructure {
        let mut chain = ChainStructure::default();
        chain.beads = (0..n).map(|i| PlacedBead::new("x", i)).collect();
        chain
    }

    #[test]
    fn test_commit_moves_cursor() {
        let mut history = History::new(with_beads(0));
        history.commit(with_beads(1));
        history.commit(with_beads(2));
        assert_eq!(history.len(), 3);
        assert_eq!(history.cursor(), 2);
        assert_eq!(history.current().len(), 2);
    }

    #[test]
    fn test_undo_redo_bounds() {
        let mut history = History::new(with_beads(0));
        assert!(!history.undo());
        assert!(!history.redo());

        history.commit(with_beads(1));
        assert!(history.undo());
        assert!(!history.undo());
        assert_eq!(history.cursor(), 0);
        assert!(history.redo());
        assert!(!history.redo());
        assert_eq!(history.cursor(), 1);
    }

    #[test]
    fn test_commit_truncates_redo() {
        let mut history = History::new(with_beads(0));
        history.commit(with_beads(1));
        history.commit(with_beads(2));
        history.undo();
        history.undo();
        history.commit(with_beads(5));
        assert_eq!(history.len(), 2);
        assert!(!history.can_redo());
        assert_eq!(history.current().len(), 5);
    }

    #[test]
    fn test_from_parts_validates_cursor() {
        assert!(History::from_parts(vec![], 0).is_err());
        assert!(History::from_parts(vec![with_beads(0)], 1).is_err());
        let history = History::from_parts(vec![with_beads(0), with_beads(1)], 0).unwrap();
        assert!(history.can_redo());
    }
}
