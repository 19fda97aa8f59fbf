//! Bounded undo/redo history.

use std::collections::VecDeque;

use serde_json::Value;

use crate::op::EditError;
use crate::transaction::Transaction;

/// Default number of transactions kept in a [`History`].
pub const DEFAULT_CAPACITY: usize = 50;

/// Options for [`History`].
#[derive(Debug, Clone)]
pub struct HistoryOptions {
    /// Maximum number of transactions retained. The oldest entry is evicted
    /// when a push would exceed it.
    pub capacity: usize,
}

impl Default for HistoryOptions {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

/// A pointer-addressed stack of transactions.
///
/// Entries before the pointer have been applied to the document; entries
/// after it are only reachable through [`History::redo`] and are dropped as
/// soon as a new transaction is pushed.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<Transaction>,
    // Number of entries currently applied; the pointer is `applied - 1`.
    applied: usize,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_options(HistoryOptions::default())
    }
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: HistoryOptions) -> Self {
        Self {
            entries: VecDeque::new(),
            applied: 0,
            capacity: options.capacity,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_options(HistoryOptions { capacity })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the last applied transaction, `None` when nothing is applied.
    pub fn pointer(&self) -> Option<usize> {
        self.applied.checked_sub(1)
    }

    pub fn can_undo(&self) -> bool {
        self.applied > 0
    }

    pub fn can_redo(&self) -> bool {
        self.applied < self.entries.len()
    }

    pub fn get(&self, index: usize) -> Option<&Transaction> {
        self.entries.get(index)
    }

    /// All retained transactions, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &Transaction> {
        self.entries.iter()
    }

    /// Record a transaction that has already been applied to the document.
    ///
    /// Discards every redo-only entry, then evicts from the front while the
    /// history is over capacity.
    pub fn push(&mut self, tx: Transaction) {
        let discarded = self.entries.len() - self.applied;
        if discarded > 0 {
            log::debug!("history: discarding {discarded} redo-only entries");
            self.entries.truncate(self.applied);
        }
        self.entries.push_back(tx);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
            log::debug!("history: capacity {} reached, evicted oldest entry", self.capacity);
        }
        self.applied = self.entries.len();
    }

    /// Undo the transaction at the pointer.
    ///
    /// Returns `Ok(false)` when there is nothing to undo. If the inverse
    /// sequence cannot be applied, the document is restored, the pointer does
    /// not move, and the error is returned.
    pub fn undo(&mut self, doc: &mut Value) -> Result<bool, EditError> {
        let Some(pointer) = self.pointer() else {
            return Ok(false);
        };
        self.entries[pointer].revert(doc)?;
        self.applied -= 1;
        log::debug!("history: undo #{pointer}");
        Ok(true)
    }

    /// Redo the transaction after the pointer.
    ///
    /// Returns `Ok(false)` when there is nothing to redo. Failures behave as
    /// in [`History::undo`].
    pub fn redo(&mut self, doc: &mut Value) -> Result<bool, EditError> {
        if !self.can_redo() {
            return Ok(false);
        }
        let next = self.applied;
        self.entries[next].apply(doc)?;
        self.applied += 1;
        log::debug!("history: redo #{next}");
        Ok(true)
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            log::debug!("history: cleared {} entries", self.entries.len());
        }
        self.entries.clear();
        self.applied = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::op::{Op, SetOp};
    use serde_json::json;
    use tree_edit_address::Address;

    fn set_counter(doc: &mut Value, value: i64) -> Transaction {
        let op = Op::Set(SetOp::new(Address::root().key("n"), json!(value)));
        Transaction::record(doc, vec![op]).unwrap()
    }

    #[test]
    fn empty_history() {
        let mut history = History::new();
        let mut doc = json!({"n": 0});
        assert_eq!(history.capacity(), DEFAULT_CAPACITY);
        assert_eq!(history.pointer(), None);
        assert!(!history.undo(&mut doc).unwrap());
        assert!(!history.redo(&mut doc).unwrap());
        assert_eq!(doc, json!({"n": 0}));
    }

    #[test]
    fn push_moves_pointer_to_top() {
        let mut history = History::new();
        let mut doc = json!({"n": 0});
        history.push(set_counter(&mut doc, 1));
        history.push(set_counter(&mut doc, 2));
        assert_eq!(history.len(), 2);
        assert_eq!(history.pointer(), Some(1));
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn undo_undo_redo_leaves_first_state() {
        let mut history = History::new();
        let mut doc = json!({"n": 0});
        history.push(set_counter(&mut doc, 1));
        history.push(set_counter(&mut doc, 2));

        assert!(history.undo(&mut doc).unwrap());
        assert!(history.undo(&mut doc).unwrap());
        assert_eq!(doc, json!({"n": 0}));
        assert_eq!(history.pointer(), None);
        assert!(history.redo(&mut doc).unwrap());
        assert_eq!(doc, json!({"n": 1}));
        assert_eq!(history.pointer(), Some(0));
    }

    #[test]
    fn undo_at_bottom_and_redo_at_top_are_noops() {
        let mut history = History::new();
        let mut doc = json!({"n": 0});
        history.push(set_counter(&mut doc, 1));
        assert!(!history.redo(&mut doc).unwrap());
        assert!(history.undo(&mut doc).unwrap());
        assert!(!history.undo(&mut doc).unwrap());
        assert_eq!(doc, json!({"n": 0}));
    }

    #[test]
    fn push_after_undo_discards_redo_branch() {
        let mut history = History::new();
        let mut doc = json!({"n": 0});
        history.push(set_counter(&mut doc, 1));
        history.push(set_counter(&mut doc, 2));
        history.undo(&mut doc).unwrap();
        history.push(set_counter(&mut doc, 3));

        assert_eq!(history.len(), 2);
        assert!(!history.can_redo());
        assert!(!history.redo(&mut doc).unwrap());
        assert_eq!(doc, json!({"n": 3}));
        history.undo(&mut doc).unwrap();
        assert_eq!(doc, json!({"n": 1}));
    }

    #[test]
    fn capacity_evicts_oldest() {
        let mut history = History::with_capacity(3);
        let mut doc = json!({"n": 0});
        for i in 1..=5 {
            history.push(set_counter(&mut doc, i));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.pointer(), Some(2));

        while history.undo(&mut doc).unwrap() {}
        // Transactions 1 and 2 were evicted, so undo stops at their result.
        assert_eq!(doc, json!({"n": 2}));
    }

    #[test]
    fn zero_capacity_keeps_nothing() {
        let mut history = History::with_capacity(0);
        let mut doc = json!({"n": 0});
        history.push(set_counter(&mut doc, 1));
        assert!(history.is_empty());
        assert_eq!(history.pointer(), None);
        assert!(!history.undo(&mut doc).unwrap());
    }

    #[test]
    fn clear_resets_pointer() {
        let mut history = History::new();
        let mut doc = json!({"n": 0});
        history.push(set_counter(&mut doc, 1));
        history.undo(&mut doc).unwrap();
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.pointer(), None);
        assert!(!history.redo(&mut doc).unwrap());
    }

    #[test]
    fn undo_against_diverged_document_keeps_pointer() {
        let mut history = History::new();
        let mut doc = json!({"n": 0});
        history.push(set_counter(&mut doc, 1));

        let mut unrelated = json!({"other": true});
        let err = history.undo(&mut unrelated).unwrap_err();
        assert!(matches!(err, EditError::AddressNotFound(_)));
        assert_eq!(unrelated, json!({"other": true}));
        assert_eq!(history.pointer(), Some(0));
    }
}
