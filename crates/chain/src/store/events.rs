/// Notifications emitted by [`super::ChainStore`] after a change is applied.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// A structural mutation appended a new snapshot
    Committed { revision: u64, bead_count: usize },
    /// Undo or redo moved the history cursor
    CursorMoved {
        cursor: usize,
        can_undo: bool,
        can_redo: bool,
    },
    /// The curve was edited outside the history
    CurveEdited { index: Option<usize> },
    /// Bead selection changed
    SelectionChanged { slot: Option<u32> },
    /// Curve edit handles toggled
    EditModeChanged { editing: bool },
    /// The catalog was refreshed
    CatalogChanged { bead_count: usize },
    /// The design and its history were discarded or replaced
    Reset,
}
