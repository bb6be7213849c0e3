//! Click and drag selection over the weekly grid.
use log::debug;

use super::grid::{Hydrated, SelectedCellSet, TimeCell};

/// What a drag does to every cell it touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    Add,
    Remove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    Idle,
    Selecting(SelectionMode),
}

/// Pointer events reported by the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    /// Button pressed over a cell.
    Down(TimeCell),
    /// Pointer moved onto a cell.
    Enter(TimeCell),
    /// Button released.
    Up,
    /// Pointer left the grid container.
    Leave,
}

/// Owns the selection for the displayed week and the unsaved-changes flag.
///
/// A plain click is a drag of length zero: `Down` toggles the cell and `Up`
/// ends the drag.
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    selected: SelectedCellSet,
    state: SelectionState,
    dirty: bool,
    read_only: bool,
}

impl SelectionController {
    pub fn new(read_only: bool) -> Self {
        Self {
            read_only,
            ..Self::default()
        }
    }

    pub fn selected(&self) -> &SelectedCellSet {
        &self.selected
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Replaces the selection with a freshly hydrated one and clears the
    /// dirty flag. Returns whether unsaved changes were discarded.
    pub fn load(&mut self, hydrated: Hydrated) -> bool {
        let discarded = self.dirty;
        self.selected = hydrated.selected;
        self.state = SelectionState::Idle;
        self.dirty = false;
        discarded
    }

    /// Called once the persistence layer acknowledged a save.
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// Feeds one pointer event through the state machine. Returns `true`
    /// when the selected set changed.
    pub fn handle(&mut self, event: PointerEvent) -> bool {
        if self.read_only {
            return false;
        }

        match (self.state, event) {
            (_, PointerEvent::Down(cell)) => {
                let mode = if self.selected.contains(cell) {
                    SelectionMode::Remove
                } else {
                    SelectionMode::Add
                };
                debug!("Starting {:?} selection at {}", mode, cell);
                self.state = SelectionState::Selecting(mode);
                self.apply(mode, cell)
            }
            (SelectionState::Selecting(mode), PointerEvent::Enter(cell)) => self.apply(mode, cell),
            (SelectionState::Idle, PointerEvent::Enter(_)) => false,
            (_, PointerEvent::Up | PointerEvent::Leave) => {
                self.state = SelectionState::Idle;
                false
            }
        }
    }

    fn apply(&mut self, mode: SelectionMode, cell: TimeCell) -> bool {
        self.dirty = true;
        match mode {
            SelectionMode::Add => self.selected.insert(cell),
            SelectionMode::Remove => self.selected.remove(cell),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_while_idle_is_ignored() {
        let mut controller = SelectionController::new(false);
        assert!(!controller.handle(PointerEvent::Enter(TimeCell::new(1, 9))));
        assert!(controller.selected().is_empty());
        assert!(!controller.is_dirty());
    }

    #[test]
    fn down_on_selected_cell_starts_remove_mode() {
        let mut controller = SelectionController::new(false);
        controller.handle(PointerEvent::Down(TimeCell::new(1, 9)));
        controller.handle(PointerEvent::Up);
        controller.handle(PointerEvent::Down(TimeCell::new(1, 9)));
        assert_eq!(
            controller.state(),
            SelectionState::Selecting(SelectionMode::Remove)
        );
    }

    #[test]
    fn load_reports_discarded_changes() {
        let mut controller = SelectionController::new(false);
        controller.handle(PointerEvent::Down(TimeCell::new(4, 10)));
        assert!(controller.load(Hydrated::default()));
        assert!(!controller.is_dirty());
        assert_eq!(controller.state(), SelectionState::Idle);
        assert!(!controller.load(Hydrated::default()));
    }
}
