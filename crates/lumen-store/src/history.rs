//! Snapshot undo/redo stacks.
//!
//! Entries are `Arc`s of whole states. Because [`ProjectState`] is built on
//! persistent vectors, keeping hundreds of entries costs little more than
//! the records that actually changed between them.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use crate::state::ProjectState;

pub(crate) struct History {
    /// Pre-mutation states, most recent at the back.
    past: VecDeque<Arc<ProjectState>>,
    /// States undone since the last fresh mutation, most recent at the back.
    future: VecDeque<Arc<ProjectState>>,
    max_depth: usize,
}

impl fmt::Debug for History {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("History")
            .field("undo_depth", &self.past.len())
            .field("redo_depth", &self.future.len())
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

impl History {
    pub(crate) fn new(max_depth: usize) -> Self {
        Self {
            past: VecDeque::new(),
            future: VecDeque::new(),
            max_depth,
        }
    }

    /// Record the state a fresh mutation is about to replace.
    ///
    /// Starts a new branch: everything on the redo stack is dropped.
    pub(crate) fn record(&mut self, before: Arc<ProjectState>) {
        self.future.clear();
        self.past.push_back(before);
        self.enforce_depth();
    }

    /// Swap `current` for the most recent past state.
    pub(crate) fn undo(&mut self, current: Arc<ProjectState>) -> Option<Arc<ProjectState>> {
        let previous = self.past.pop_back()?;
        self.future.push_back(current);
        Some(previous)
    }

    /// Swap `current` for the most recently undone state.
    pub(crate) fn redo(&mut self, current: Arc<ProjectState>) -> Option<Arc<ProjectState>> {
        let next = self.future.pop_back()?;
        self.past.push_back(current);
        self.enforce_depth();
        Some(next)
    }

    pub(crate) fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }

    pub(crate) fn undo_depth(&self) -> usize {
        self.past.len()
    }

    pub(crate) fn redo_depth(&self) -> usize {
        self.future.len()
    }

    fn enforce_depth(&mut self) {
        while self.past.len() > self.max_depth {
            self.past.pop_front();
        }
    }
}
