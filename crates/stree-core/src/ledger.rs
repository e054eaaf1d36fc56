//! Ranked ledger: leaf entries kept sorted by combined score
//!
//! Entries are unique by [`EntryId`], never by score. Equal scores are kept
//! side by side in insertion order, so duplicates are neither merged nor
//! dropped.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::polarity::Polarity;

/// Identity of a leaf entry, allocated by the coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single ranked entry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: EntryId,
    pub score: f64,
    pub polarity: Polarity,
}

/// Traversal order over the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "ascending"),
            SortDirection::Descending => write!(f, "descending"),
        }
    }
}

/// Ordered multiset of entries, ascending by score
#[derive(Debug, Clone, Default)]
pub struct RankedLedger {
    entries: Vec<LedgerEntry>,
}

impl RankedLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert after every entry whose score is less than or equal to `entry.score`
    pub fn insert(&mut self, entry: LedgerEntry) {
        let at = self
            .entries
            .partition_point(|e| e.score.total_cmp(&entry.score) != Ordering::Greater);
        self.entries.insert(at, entry);
    }

    /// Remove the entry with the same identity as `entry`.
    ///
    /// Only the run of equal scores is searched. Returns `None` when no such
    /// entry exists; callers treat that as an already-completed removal.
    pub fn remove(&mut self, entry: &LedgerEntry) -> Option<LedgerEntry> {
        let start = self
            .entries
            .partition_point(|e| e.score.total_cmp(&entry.score) == Ordering::Less);
        let offset = self.entries[start..]
            .iter()
            .take_while(|e| e.score.total_cmp(&entry.score) == Ordering::Equal)
            .position(|e| e.id == entry.id)?;
        Some(self.entries.remove(start + offset))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter_ascending(&self) -> impl DoubleEndedIterator<Item = &LedgerEntry> + '_ {
        self.entries.iter()
    }

    /// Exact reverse of [`iter_ascending`](Self::iter_ascending)
    pub fn iter_descending(&self) -> impl Iterator<Item = &LedgerEntry> + '_ {
        self.entries.iter().rev()
    }

    /// Entry identities in the requested order
    pub fn snapshot(&self, direction: SortDirection) -> Vec<EntryId> {
        match direction {
            SortDirection::Ascending => self.iter_ascending().map(|e| e.id).collect(),
            SortDirection::Descending => self.iter_descending().map(|e| e.id).collect(),
        }
    }
}
