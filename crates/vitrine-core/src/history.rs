//! Linear undo/redo history over full document snapshots.

use crate::canvas::CanvasDocument;
use std::sync::Arc;

/// An immutable capture of the document.
#[derive(Debug, Clone)]
pub struct HistorySnapshot {
    /// Monotonic sequence number, unique within one history.
    pub seq: u64,
    pub document: Arc<CanvasDocument>,
}

/// Snapshot list with a cursor.
///
/// Index 0 is the base state (the loaded or blank document) and cannot be
/// undone past. Pushing while the cursor is behind the tip drops the redo tail.
/// An optional limit evicts the oldest step after the base; the base itself is
/// never evicted.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<HistorySnapshot>,
    cursor: usize,
    next_seq: u64,
    limit: Option<usize>,
}

impl History {
    /// Start a history whose base is `initial`, keeping at most `limit`
    /// entries (at least two) when a limit is given.
    pub fn new(initial: CanvasDocument, limit: Option<usize>) -> Self {
        Self {
            entries: vec![HistorySnapshot {
                seq: 0,
                document: Arc::new(initial),
            }],
            cursor: 0,
            next_seq: 1,
            limit: limit.map(|l| l.max(2)),
        }
    }

    /// Record a new state after the cursor.
    pub fn push(&mut self, document: CanvasDocument) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(HistorySnapshot {
            seq: self.next_seq,
            document: Arc::new(document),
        });
        self.next_seq += 1;

        if let Some(limit) = self.limit {
            while self.entries.len() > limit {
                self.entries.remove(1);
            }
        }
        self.cursor = self.entries.len() - 1;
        log::debug!("History push: {} entries", self.entries.len());
    }

    /// Step back. Returns the state to reload, or None at the base.
    pub fn undo(&mut self) -> Option<&CanvasDocument> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        log::debug!("History undo to {}", self.cursor);
        Some(&self.entries[self.cursor].document)
    }

    /// Step forward. Returns the state to reload, or None at the tip.
    pub fn redo(&mut self) -> Option<&CanvasDocument> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        log::debug!("History redo to {}", self.cursor);
        Some(&self.entries[self.cursor].document)
    }

    /// Snapshot at the cursor.
    pub fn current(&self) -> &HistorySnapshot {
        &self.entries[self.cursor]
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

    /// Drop everything and start again from `base`.
    pub fn reset(&mut self, base: CanvasDocument) {
        let limit = self.limit;
        *self = Self::new(base, limit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(width: f64) -> CanvasDocument {
        CanvasDocument::new(width, 100.0)
    }

    #[test]
    fn test_base_cannot_be_undone() {
        let mut history = History::new(doc(1.0), None);
        assert!(!history.can_undo());
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_undo_redo_walks_the_list() {
        let mut history = History::new(doc(1.0), None);
        history.push(doc(2.0));
        history.push(doc(3.0));

        assert_eq!(history.undo().unwrap().width, 2.0);
        assert_eq!(history.undo().unwrap().width, 1.0);
        assert!(history.undo().is_none());
        assert_eq!(history.redo().unwrap().width, 2.0);
        assert_eq!(history.redo().unwrap().width, 3.0);
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_push_discards_redo_tail() {
        let mut history = History::new(doc(1.0), None);
        history.push(doc(2.0));
        history.push(doc(3.0));
        history.undo();
        history.undo();

        history.push(doc(4.0));
        assert!(!history.can_redo());
        assert_eq!(history.len(), 2);
        assert_eq!(history.current().document.width, 4.0);
        assert_eq!(history.undo().unwrap().width, 1.0);
    }

    #[test]
    fn test_limit_keeps_base() {
        let mut history = History::new(doc(1.0), Some(3));
        for w in 2..=5 {
            history.push(doc(w as f64));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.undo().unwrap().width, 4.0);
        assert_eq!(history.undo().unwrap().width, 1.0);
        assert!(history.undo().is_none());
    }

    #[test]
    fn test_unbounded_by_default() {
        let mut history = History::new(doc(1.0), None);
        for w in 2..=500 {
            history.push(doc(w as f64));
        }
        assert_eq!(history.len(), 500);
        let mut undos = 0;
        while history.undo().is_some() {
            undos += 1;
        }
        assert_eq!(undos, 499);
        assert_eq!(history.current().document.width, 1.0);
    }

    #[test]
    fn test_sequence_numbers_increase() {
        let mut history = History::new(doc(1.0), None);
        history.push(doc(2.0));
        let first = history.current().seq;
        history.undo();
        history.push(doc(3.0));
        assert!(history.current().seq > first);
    }
}
