//! Undo/redo history for the mirror view.
//!
//! Each recorded event holds the inverse change sets of one or more user
//! transactions. Consecutive edits within `group_delay` of each other are
//! grouped into one event, so undo removes a typed word rather than a
//! single character.

use std::time::Duration;

use web_time::Instant;

use super::state::ChangeSet;
use crate::types::Selection;

/// Default maximum number of undo events.
pub const DEFAULT_DEPTH: usize = 100;

/// Edits closer together than this are grouped.
pub const DEFAULT_GROUP_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub(crate) struct HistoryEvent {
    /// Change sets to apply, last first, to revert the event.
    pub(crate) changes: Vec<ChangeSet>,
    /// Selection to restore after reverting, if any.
    pub(crate) selection: Option<Selection>,
}

#[derive(Debug)]
pub struct History {
    done: Vec<HistoryEvent>,
    undone: Vec<HistoryEvent>,
    depth: usize,
    group_delay: Duration,
    last_push: Option<Instant>,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_DEPTH, DEFAULT_GROUP_DELAY)
    }
}

impl History {
    pub fn new(depth: usize, group_delay: Duration) -> Self {
        Self {
            done: Vec::new(),
            undone: Vec::new(),
            depth: depth.max(1),
            group_delay,
            last_push: None,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.done.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.done.len()
    }

    /// Record the inverse of a user transaction.
    pub(crate) fn record(&mut self, inverse: ChangeSet, selection_before: Selection, now: Instant) {
        self.undone.clear();

        let grouped = self
            .last_push
            .is_some_and(|last| now.saturating_duration_since(last) < self.group_delay);
        match self.done.last_mut() {
            Some(event) if grouped => event.changes.push(inverse),
            _ => {
                self.done.push(HistoryEvent {
                    changes: vec![inverse],
                    selection: Some(selection_before),
                });
                while self.done.len() > self.depth {
                    self.done.remove(0);
                }
            }
        }
        self.last_push = Some(now);
    }

    /// Close the current group so the next edit starts a new event.
    pub fn break_group(&mut self) {
        self.last_push = None;
    }

    pub(crate) fn pop_undo(&mut self) -> Option<HistoryEvent> {
        self.last_push = None;
        self.done.pop()
    }

    pub(crate) fn pop_redo(&mut self) -> Option<HistoryEvent> {
        self.last_push = None;
        self.undone.pop()
    }

    pub(crate) fn push_undone(&mut self, event: HistoryEvent) {
        self.undone.push(event);
    }

    pub(crate) fn push_done(&mut self, event: HistoryEvent) {
        self.done.push(event);
    }

    /// Drop all events. Their change sets no longer line up with the document.
    pub fn clear(&mut self) {
        self.done.clear();
        self.undone.clear();
        self.last_push = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_edits_are_grouped() {
        let mut history = History::default();
        let start = Instant::now();
        history.record(ChangeSet::single(0, 1, ""), Selection::collapsed(0), start);
        history.record(
            ChangeSet::single(1, 2, ""),
            Selection::collapsed(1),
            start + Duration::from_millis(100),
        );
        assert_eq!(history.undo_depth(), 1);

        history.record(
            ChangeSet::single(2, 3, ""),
            Selection::collapsed(2),
            start + Duration::from_secs(5),
        );
        assert_eq!(history.undo_depth(), 2);
    }

    #[test]
    fn depth_is_bounded_and_new_edits_clear_redo() {
        let mut history = History::new(2, Duration::ZERO);
        let now = Instant::now();
        for i in 0..4 {
            history.record(ChangeSet::single(i, i + 1, ""), Selection::collapsed(i), now);
        }
        assert_eq!(history.undo_depth(), 2);

        let event = history.pop_undo().unwrap();
        history.push_undone(event);
        assert!(history.can_redo());
        history.record(ChangeSet::single(0, 1, ""), Selection::collapsed(0), now);
        assert!(!history.can_redo());
    }
}
