//! Bounded linear undo/redo buffer of scene snapshots.
//!
//! DESIGN
//! ======
//! Every committed mutation pushes a full snapshot; undo and redo only move
//! the cursor and hand back the snapshot to restore. Committing after an
//! undo drops the redo tail, so history never branches. The oldest entry is
//! evicted once the buffer exceeds [`HISTORY_LIMIT`], with the cursor
//! shifted so it keeps pointing at the same logical entry.
//!
//! The buffer never touches the scene; restoring is the caller's job.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::collections::VecDeque;

use crate::consts::HISTORY_LIMIT;
use crate::scene::Snapshot;

#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<Snapshot>,
    /// Index of the current entry; `None` only before the first commit.
    cursor: Option<usize>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// Create an empty buffer holding at most [`HISTORY_LIMIT`] entries.
    #[must_use]
    pub fn new() -> Self {
        Self::with_limit(HISTORY_LIMIT)
    }

    pub(crate) fn with_limit(limit: usize) -> Self {
        Self { entries: VecDeque::with_capacity(limit.min(HISTORY_LIMIT) + 1), cursor: None, limit: limit.max(1) }
    }

    /// Record a new current state, discarding any redo tail.
    pub fn commit(&mut self, snapshot: Snapshot) {
        let keep = self.cursor.map_or(0, |c| c + 1);
        self.entries.truncate(keep);
        self.entries.push_back(snapshot);
        let mut cursor = self.entries.len() - 1;
        if self.entries.len() > self.limit {
            self.entries.pop_front();
            cursor -= 1;
        }
        self.cursor = Some(cursor);
    }

    /// Step back one entry. `None` at the oldest entry (or when empty).
    pub fn undo(&mut self) -> Option<&Snapshot> {
        let cursor = self.cursor.filter(|&c| c > 0)? - 1;
        self.cursor = Some(cursor);
        self.entries.get(cursor)
    }

    /// Step forward one entry. `None` at the newest entry (or when empty).
    pub fn redo(&mut self) -> Option<&Snapshot> {
        let cursor = self.cursor.filter(|&c| c + 1 < self.entries.len())? + 1;
        self.cursor = Some(cursor);
        self.entries.get(cursor)
    }

    /// Drop everything and start over from `snapshot`.
    pub fn reset(&mut self, snapshot: Snapshot) {
        self.entries.clear();
        self.cursor = None;
        self.commit(snapshot);
    }

    /// The entry the cursor points at.
    #[must_use]
    pub fn current(&self) -> Option<&Snapshot> {
        self.entries.get(self.cursor?)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 < self.entries.len())
    }

    /// Cursor position; `None` before the first commit.
    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
