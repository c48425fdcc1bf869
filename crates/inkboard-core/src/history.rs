//! Snapshot-based undo/redo history.

use crate::surface::PixelBuffer;

/// Linear undo history of full raster snapshots.
///
/// The entry under the cursor always matches the displayed pixels. Pushing
/// while the cursor is behind the newest entry discards the redo branch.
#[derive(Debug, Clone, Default)]
pub struct HistoryStore {
    entries: Vec<PixelBuffer>,
    cursor: usize,
    /// Maximum number of entries to keep (`None` = unbounded).
    limit: Option<usize>,
}

impl HistoryStore {
    /// Create an empty, unbounded history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty history keeping at most `limit` entries (minimum 1).
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            limit: limit.map(|l| l.max(1)),
            ..Self::default()
        }
    }

    /// Record a new state, pruning anything that could have been redone.
    pub fn push(&mut self, buffer: PixelBuffer) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push(buffer);
        self.cursor = self.entries.len() - 1;

        if let Some(limit) = self.limit {
            if self.entries.len() > limit {
                let excess = self.entries.len() - limit;
                self.entries.drain(..excess);
                self.cursor -= excess;
            }
        }
    }

    /// Step back one entry and return it, or `None` at the oldest entry.
    pub fn undo(&mut self) -> Option<&PixelBuffer> {
        if self.can_undo() {
            self.cursor -= 1;
            self.entries.get(self.cursor)
        } else {
            None
        }
    }

    /// Step forward one entry and return it, or `None` at the newest entry.
    pub fn redo(&mut self) -> Option<&PixelBuffer> {
        if self.can_redo() {
            self.cursor += 1;
            self.entries.get(self.cursor)
        } else {
            None
        }
    }

    /// Drop all entries and seed the history with `buffer`.
    pub fn reset(&mut self, buffer: PixelBuffer) {
        self.entries.clear();
        self.entries.push(buffer);
        self.cursor = 0;
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }

    /// The entry matching the displayed pixels.
    pub fn current(&self) -> Option<&PixelBuffer> {
        self.entries.get(self.cursor)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
