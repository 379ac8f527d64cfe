//! Undo/redo history.
//!
//! History is a pair of stacks of whole-state snapshots `(buffer, cursor,
//! timestamp)`. The executor pushes a snapshot *before* any mutation that
//! produces a new buffer; undo and redo themselves never push. Any new edit
//! clears the redo stack (branching model). The undo stack is bounded: past
//! the capacity the oldest entry is dropped for good.
//!
//! Because [`Buffer`](crate::Buffer) snapshots are rope clones, each entry
//! costs O(1) and shares line storage with its neighbours.

use crate::buffer::{Buffer, Cursor};
use std::time::SystemTime;

/// Default bound on the number of undo entries.
pub const DEFAULT_CAPACITY: usize = 1000;

/// One recorded editor state.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// The buffer value at the time of the snapshot.
    pub buffer: Buffer,
    /// The cursor at the time of the snapshot.
    pub cursor: Cursor,
    /// When the snapshot was taken.
    pub at: SystemTime,
}

impl Snapshot {
    fn new(buffer: Buffer, cursor: Cursor) -> Self {
        Self {
            buffer,
            cursor,
            at: SystemTime::now(),
        }
    }
}

/// Bounded, branching undo/redo stacks.
///
/// # Example
///
/// ```rust
/// use modal_core::{Buffer, Cursor, History};
///
/// let mut history = History::new();
/// let before = Buffer::from_text("one");
/// history.push(before.clone(), Cursor::default());
///
/// let after = Buffer::from_text("two");
/// let snapshot = history.undo(after.clone(), Cursor::default()).unwrap();
/// assert_eq!(snapshot.buffer.full_text(), "one");
/// assert!(history.can_redo());
/// ```
#[derive(Debug)]
pub struct History {
    undo: Vec<Snapshot>,
    redo: Vec<Snapshot>,
    capacity: usize,
    /// Saved position in the linear history, as an undo-stack depth. `None`
    /// when the saved state was trimmed away or sits on a discarded branch.
    clean_index: Option<usize>,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// Create a history with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a history bounded to `capacity` undo entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            capacity: capacity.max(1),
            clean_index: Some(0),
        }
    }

    /// Whether an undo entry is available.
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Whether a redo entry is available.
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Current undo stack depth.
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    /// Current redo stack depth.
    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    /// Record the pre-mutation state. Clears the redo stack and trims the
    /// oldest entry beyond the capacity.
    pub fn push(&mut self, buffer: Buffer, cursor: Cursor) {
        self.clear_redo_and_adjust_clean();

        if self.undo.len() >= self.capacity {
            self.undo.remove(0);
            self.clean_index = match self.clean_index {
                Some(0) | None => None,
                Some(i) => Some(i - 1),
            };
        }

        self.undo.push(Snapshot::new(buffer, cursor));
    }

    /// Pop the newest undo entry, saving the current state for redo. Returns
    /// `None` when there is nothing to undo.
    pub fn undo(&mut self, current_buffer: Buffer, current_cursor: Cursor) -> Option<Snapshot> {
        let snapshot = self.undo.pop()?;
        self.redo.push(Snapshot::new(current_buffer, current_cursor));
        Some(snapshot)
    }

    /// Pop the newest redo entry, saving the current state for undo. Returns
    /// `None` when there is nothing to redo.
    pub fn redo(&mut self, current_buffer: Buffer, current_cursor: Cursor) -> Option<Snapshot> {
        let snapshot = self.redo.pop()?;
        self.undo.push(Snapshot::new(current_buffer, current_cursor));
        Some(snapshot)
    }

    /// Whether the current state coincides with the last saved state.
    pub fn is_clean(&self) -> bool {
        self.clean_index == Some(self.undo.len())
    }

    /// Mark the current state as the saved state.
    pub fn mark_clean(&mut self) {
        self.clean_index = Some(self.undo.len());
    }

    /// Forget everything, marking the fresh state clean.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
        self.clean_index = Some(0);
    }

    fn clear_redo_and_adjust_clean(&mut self) {
        if self.redo.is_empty() {
            return;
        }
        // A clean point sitting in the redo area becomes unreachable once the
        // branch is discarded.
        if let Some(clean_index) = self.clean_index {
            if clean_index > self.undo.len() {
                self.clean_index = None;
            }
        }
        self.redo.clear();
    }
}
