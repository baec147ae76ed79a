use crate::element::ObjectId;
use crate::state::InteractionState;

/// Advisory notifications for UI feedback (cursor, status text, button state).
///
/// Nothing in the editor depends on these being observed.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    StateChanged {
        old: InteractionState,
        new: InteractionState,
    },
    ToolChanged {
        old: &'static str,
        new: &'static str,
    },
    SelectionChanged {
        ids: Vec<ObjectId>,
    },
    HistoryChanged {
        can_undo: bool,
        can_redo: bool,
    },
    DocumentLoaded {
        object_count: usize,
    },
}
