//! Bounded undo ledger for destructive board actions.
//!
//! Completing and deleting a task push a full pre-mutation snapshot here.
//! The ledger is a LIFO stack capped at ten entries with FIFO eviction:
//! once full, recording drops the single oldest entry. Entries are never
//! re-promoted.

use crate::models::Task;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Maximum number of snapshots retained.
pub const LEDGER_CAPACITY: usize = 10;

/// A reversible action snapshot.
///
/// Each variant carries the affected task exactly as it existed before the
/// action, so replay can restore prior state verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum UndoEntry {
    /// A completion flag flip (either direction; the snapshot holds the
    /// pre-toggle flag and timestamp)
    CompleteToggle { task: Task },
    /// A deletion
    Delete { task: Task },
}

impl UndoEntry {
    /// The snapshot carried by this entry.
    pub fn task(&self) -> &Task {
        match self {
            UndoEntry::CompleteToggle { task } | UndoEntry::Delete { task } => task,
        }
    }
}

/// Bounded history of reversible actions.
#[derive(Debug, Default)]
pub struct UndoLedger {
    entries: VecDeque<UndoEntry>,
}

impl UndoLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, evicting the oldest if the ledger is full.
    ///
    /// Size grows by at most one per call, so a single eviction always
    /// suffices.
    pub fn record(&mut self, entry: UndoEntry) {
        self.entries.push_back(entry);
        if self.entries.len() > LEDGER_CAPACITY {
            self.entries.pop_front();
        }
    }

    /// Remove and return the most recently recorded entry.
    ///
    /// An empty ledger is a benign condition; callers surface
    /// `Error::UndoEmpty` as a notice, not a failure.
    pub fn pop(&mut self) -> Result<UndoEntry> {
        self.entries.pop_back().ok_or(Error::UndoEmpty)
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries oldest-first, for persisting the ledger between sessions.
    pub fn snapshot(&self) -> Vec<UndoEntry> {
        self.entries.iter().cloned().collect()
    }

    /// Rebuild a ledger from a persisted snapshot, oldest-first. The
    /// capacity bound still applies.
    pub fn from_snapshot(entries: Vec<UndoEntry>) -> Self {
        let mut ledger = Self::new();
        for entry in entries {
            ledger.record(entry);
        }
        ledger
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeFrame;
    use chrono::Utc;

    fn entry(id: &str) -> UndoEntry {
        let now = Utc::now();
        UndoEntry::Delete {
            task: Task {
                id: id.to_string(),
                team_id: "team".to_string(),
                name: id.to_string(),
                memo: String::new(),
                due_date: None,
                due_time: None,
                time_frame: TimeFrame::Today,
                important: false,
                pinned: false,
                completed: false,
                completed_at: None,
                project_id: None,
                assignees: vec![],
                rank: 0,
                created_at: now,
                updated_at: now,
            },
        }
    }

    #[test]
    fn test_pop_is_lifo() {
        let mut ledger = UndoLedger::new();
        ledger.record(entry("first"));
        ledger.record(entry("second"));

        assert_eq!(ledger.pop().unwrap().task().id, "second");
        assert_eq!(ledger.pop().unwrap().task().id, "first");
    }

    #[test]
    fn test_pop_empty_signals_undo_empty() {
        let mut ledger = UndoLedger::new();
        assert!(matches!(ledger.pop(), Err(Error::UndoEmpty)));
    }

    #[test]
    fn test_eleventh_record_evicts_the_oldest() {
        let mut ledger = UndoLedger::new();
        for i in 0..11 {
            ledger.record(entry(&format!("t{i}")));
        }

        assert_eq!(ledger.len(), LEDGER_CAPACITY);

        // drain back-to-front: t10 down to t1, t0 evicted
        let mut popped = Vec::new();
        while let Ok(e) = ledger.pop() {
            popped.push(e.task().id.clone());
        }
        let expected: Vec<String> = (1..=10).rev().map(|i| format!("t{i}")).collect();
        assert_eq!(popped, expected);
    }
}
