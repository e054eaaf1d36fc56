//! Property-based invariant tests for the slot grid and ranked ledger.
//!
//! 1. A leaf slot is never handed out twice until it is released or reset.
//! 2. A reserved leaf's rank equals the count of occupied leaf cells at or
//!    before it in row-major order (trunk column excluded).
//! 3. Ledger ascending traversal is non-decreasing and keeps every entry.
//! 4. Removing one identity leaves every other entry in place.

use std::collections::HashSet;

use proptest::prelude::*;
use stree_core::{
    EntryId, LedgerEntry, Polarity, RankedLedger, SlotGrid, SlotState, SortDirection, TreePart,
};

// ── Helpers ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum GridOp {
    Reserve,
    Release(usize),
    Reset,
}

fn grid_ops() -> impl Strategy<Value = Vec<GridOp>> {
    prop::collection::vec(
        prop_oneof![
            6 => Just(GridOp::Reserve),
            3 => (0usize..64).prop_map(GridOp::Release),
            1 => Just(GridOp::Reset),
        ],
        1..120,
    )
}

fn naive_rank(grid: &SlotGrid, row: usize, column: usize) -> usize {
    let mut count = 0;
    for r in 0..grid.rows() {
        for c in 0..grid.columns() {
            if (r, c) > (row, column) {
                return count;
            }
            if c != grid.trunk_column() && grid.state(r, c) == Some(SlotState::Occupied) {
                count += 1;
            }
        }
    }
    count
}

fn ledger_entries(scores: &[u8]) -> Vec<LedgerEntry> {
    scores
        .iter()
        .enumerate()
        .map(|(i, s)| LedgerEntry {
            id: EntryId(i as u64),
            score: f64::from(*s % 8),
            polarity: Polarity::Neutral,
        })
        .collect()
}

// ═════════════════════════════════════════════════════════════════════════
// 1 + 2. Grid reservations are unique and ranks follow occupancy
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn reservations_unique_and_ranked(ops in grid_ops()) {
        let mut grid = SlotGrid::tree();
        let mut held: Vec<(usize, usize)> = Vec::new();

        for op in ops {
            match op {
                GridOp::Reserve => match grid.find_and_reserve(TreePart::Leaf) {
                    Ok(slot) => {
                        prop_assert!(
                            !held.contains(&(slot.row, slot.column)),
                            "slot {:?} handed out twice", slot
                        );
                        prop_assert_eq!(slot.rank, naive_rank(&grid, slot.row, slot.column));
                        prop_assert_eq!(grid.rank_at(slot.row, slot.column), Some(slot.rank));
                        held.push((slot.row, slot.column));
                    }
                    Err(_) => {
                        prop_assert_eq!(held.len(), grid.leaf_capacity());
                    }
                },
                GridOp::Release(i) => {
                    if !held.is_empty() {
                        let (row, column) = held.remove(i % held.len());
                        prop_assert!(grid.release(row, column));
                    }
                }
                GridOp::Reset => {
                    grid.reset_leaf_slots();
                    held.clear();
                }
            }
            prop_assert_eq!(grid.occupied_leaves(), held.len());
        }
    }
}

proptest! {
    #[test]
    fn trunk_growth_never_touches_leaves(leaves in 0usize..28, trunk in 0usize..20) {
        let mut grid = SlotGrid::tree();
        for _ in 0..leaves {
            grid.find_and_reserve(TreePart::Leaf).unwrap();
        }
        for _ in 0..trunk {
            let _ = grid.find_and_reserve(TreePart::Trunk);
        }
        prop_assert_eq!(grid.occupied_leaves(), leaves);
        prop_assert_eq!(grid.grown_trunk(), trunk.min(14));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Ascending traversal is sorted and lossless
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn ascending_is_sorted_and_complete(scores in prop::collection::vec(any::<u8>(), 0..60)) {
        let mut ledger = RankedLedger::new();
        for entry in ledger_entries(&scores) {
            ledger.insert(entry);
        }

        prop_assert_eq!(ledger.len(), scores.len());
        let asc: Vec<f64> = ledger.iter_ascending().map(|e| e.score).collect();
        prop_assert!(asc.windows(2).all(|w| w[0] <= w[1]));

        let ids: HashSet<EntryId> = ledger.iter_ascending().map(|e| e.id).collect();
        prop_assert_eq!(ids.len(), scores.len());

        let mut desc = ledger.snapshot(SortDirection::Descending);
        desc.reverse();
        prop_assert_eq!(desc, ledger.snapshot(SortDirection::Ascending));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Removal by identity is exact
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn remove_is_exact(scores in prop::collection::vec(any::<u8>(), 1..60), pick in any::<usize>()) {
        let entries = ledger_entries(&scores);
        let mut ledger = RankedLedger::new();
        for entry in &entries {
            ledger.insert(*entry);
        }

        let victim = entries[pick % entries.len()];
        let before: Vec<EntryId> = ledger.snapshot(SortDirection::Ascending);

        prop_assert_eq!(ledger.remove(&victim).map(|e| e.id), Some(victim.id));

        let expected: Vec<EntryId> = before.into_iter().filter(|id| *id != victim.id).collect();
        prop_assert_eq!(ledger.snapshot(SortDirection::Ascending), expected);
        prop_assert!(ledger.remove(&victim).is_none());
    }
}
