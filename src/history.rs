//! Bounded undo/redo stacks over full canvas snapshots.
//!
//! Every mutating gesture records the state it is about to overwrite, so
//! undo is a direct restore rather than a replay. Snapshots pair the raster
//! pixel buffer with the anchor-point list; the two must always travel
//! together or ruler/compass snapping would desynchronize from the pixels.

use crate::util::Point;
use log::debug;
use std::collections::VecDeque;

/// Default bound on the undo stack; the oldest entry is evicted beyond this.
pub const DEFAULT_MAX_UNDO_STEPS: usize = 20;

/// A full copy of the persistent layer and the anchor-point list.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub pixels: Vec<u8>,
    pub anchors: Vec<Point>,
}

/// Dual-stack linear history with a bounded undo depth.
///
/// Recording a new entry always clears the redo stack: after undoing, any
/// fresh mutating action permanently discards the redone-able future.
#[derive(Debug)]
pub struct History {
    undo: VecDeque<Snapshot>,
    redo: Vec<Snapshot>,
    max_depth: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_UNDO_STEPS)
    }
}

impl History {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Records the state captured immediately before a mutating action.
    ///
    /// Must be called synchronously before the mutation is applied so that
    /// undo always restores a state strictly prior to the action.
    pub fn record(&mut self, snapshot: Snapshot) {
        self.redo.clear();
        if self.undo.len() >= self.max_depth {
            self.undo.pop_front();
            debug!("undo stack full, evicted oldest entry");
        }
        self.undo.push_back(snapshot);
    }

    /// Pops the most recent undo entry, saving `current` for redo.
    ///
    /// Returns `None` (and leaves `current` unused) when there is nothing to
    /// undo; an empty-stack undo is a no-op, not an error.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let restored = self.undo.pop_back()?;
        self.redo.push(current);
        Some(restored)
    }

    /// Pops the most recent redo entry, saving `current` for undo.
    ///
    /// The undo side keeps its bound even when fed from redo.
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let restored = self.redo.pop()?;
        if self.undo.len() >= self.max_depth {
            self.undo.pop_front();
        }
        self.undo.push_back(current);
        Some(restored)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Drops both stacks. Used when a persisted session replaces the state.
    pub fn reset(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}
