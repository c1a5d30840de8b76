//! # Undo/Redo Stack
//!
//! Snapshot history for any cloneable state.
//!
//! ## Design
//!
//! - Every committed state is stored whole; the cursor points at the current one
//! - Undo and redo only move the cursor
//! - Committing while the cursor is behind the tip discards the redo branch
//! - History is unbounded unless a level cap is configured
//!
//! ## Example
//!
//! ```rust
//! use blockdoc_editor::UndoStack;
//!
//! let mut stack = UndoStack::new("a");
//! stack.commit("b");
//! assert_eq!(*stack.current(), "b");
//!
//! stack.undo();
//! assert_eq!(*stack.current(), "a");
//!
//! stack.redo();
//! assert_eq!(*stack.current(), "b");
//! ```

/// Undo/redo history over snapshots of `T`
#[derive(Debug, Clone)]
pub struct UndoStack<T> {
    /// Committed snapshots, oldest first
    snapshots: Vec<T>,

    /// Index of the current snapshot
    cursor: usize,

    /// Maximum number of snapshots kept (0 = unlimited)
    max_levels: usize,
}

impl<T> UndoStack<T> {
    /// Create a stack whose only snapshot is `initial`
    pub fn new(initial: T) -> Self {
        Self::with_max_levels(initial, 0)
    }

    /// Create a stack that keeps at most `max_levels` snapshots (0 = unlimited)
    pub fn with_max_levels(initial: T, max_levels: usize) -> Self {
        Self {
            snapshots: vec![initial],
            cursor: 0,
            max_levels,
        }
    }

    /// Current state
    pub fn current(&self) -> &T {
        &self.snapshots[self.cursor]
    }

    /// Make `state` current, discarding any redo branch
    pub fn commit(&mut self, state: T) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(state);
        self.cursor = self.snapshots.len() - 1;

        // Cap 1 would leave nothing to undo to; treat it like 2
        if self.max_levels > 0 && self.snapshots.len() > self.max_levels.max(2) {
            let excess = self.snapshots.len() - self.max_levels.max(2);
            self.snapshots.drain(..excess);
            self.cursor -= excess;
        }
    }

    /// Step back one snapshot. Returns false when already at the oldest.
    pub fn undo(&mut self) -> bool {
        if self.cursor > 0 {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    /// Step forward one snapshot. Returns false when already at the newest.
    pub fn redo(&mut self) -> bool {
        if self.cursor + 1 < self.snapshots.len() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// Number of undo steps available
    pub fn undo_levels(&self) -> usize {
        self.cursor
    }

    /// Number of redo steps available
    pub fn redo_levels(&self) -> usize {
        self.snapshots.len() - 1 - self.cursor
    }

    /// Index of the current snapshot
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Never true: the stack always holds the current state
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Drop all history and start over from `state`
    pub fn reset(&mut self, state: T) {
        self.snapshots.clear();
        self.snapshots.push(state);
        self.cursor = 0;
    }
}

impl<T: Default> Default for UndoStack<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
