//! Immediate leaf operations: insertion, deletion and label toggling
//!
//! Insertion and deletion are rejected (as no-ops) while a re-sort is in
//! flight. Trunk growth does not block them.

use stree_core::{Classification, EntryId, LedgerEntry, TreePart};
use tracing::{debug, info, warn};

use crate::engine_event::EngineEvent;
use crate::state::{AppState, Leaf};

use super::{UpdateAction, UpdateResult};

/// Validate a submission and hand it to the scorer
pub fn handle_submit_text(state: &mut AppState, text: String) -> UpdateResult {
    let text = text.trim();
    if text.is_empty() {
        debug!("Ignoring blank submission");
        return UpdateResult::none();
    }
    if state.sequencer.is_sorting() {
        debug!("Submission rejected: sort in progress");
        return UpdateResult::none();
    }

    UpdateResult::action(UpdateAction::ClassifyText {
        text: text.to_string(),
    })
}

/// Reserve a slot, then record the entry in the ledger and statistics
pub fn handle_add_leaf(
    state: &mut AppState,
    text: String,
    classification: Classification,
) -> UpdateResult {
    // Re-checked here: a sort may have started while the text was scored
    if state.sequencer.is_sorting() {
        debug!("Leaf insertion rejected: sort in progress");
        return UpdateResult::none();
    }

    let slot = match state.grid.find_and_reserve(TreePart::Leaf) {
        Ok(slot) => slot,
        Err(e) => {
            warn!("Cannot place leaf '{}': {}", text, e);
            state.emit(EngineEvent::PlacementFailed {
                part: TreePart::Leaf,
                reason: e.to_string(),
            });
            return UpdateResult::none();
        }
    };

    let id = state.allocate_entry_id();
    let score = state.encoding.encode(&classification);
    state.ledger.insert(LedgerEntry {
        id,
        score,
        polarity: classification.polarity,
    });
    state.stats.record(classification.polarity, score);
    state.leaves.insert(
        id,
        Leaf {
            text: text.clone(),
            classification,
            score,
            slot: Some(slot),
        },
    );

    info!(
        "Leaf {} placed at ({}, {}) rank {} [{} {:.2}]",
        id, slot.row, slot.column, slot.rank, classification.polarity, classification.confidence
    );
    state.emit(EngineEvent::LeafPlaced {
        entry: id,
        slot,
        polarity: classification.polarity,
        confidence: classification.confidence,
        text,
    });
    state.emit_statistics();

    UpdateResult::none()
}

pub fn handle_scoring_failed(state: &mut AppState, text: String, error: String) -> UpdateResult {
    warn!("Scoring failed for '{}': {}", text, error);
    state.emit(EngineEvent::ScoringFailed {
        text,
        reason: error,
    });
    UpdateResult::none()
}

/// Remove one leaf by identity and free its slot
pub fn handle_delete_leaf(state: &mut AppState, entry: EntryId) -> UpdateResult {
    if state.sequencer.is_sorting() {
        debug!("Deletion of {} rejected: sort in progress", entry);
        return UpdateResult::none();
    }

    let Some(leaf) = state.leaves.remove(&entry) else {
        debug!("Deletion of unknown leaf {} ignored", entry);
        return UpdateResult::none();
    };

    let polarity = leaf.classification.polarity;
    if state
        .ledger
        .remove(&LedgerEntry {
            id: entry,
            score: leaf.score,
            polarity,
        })
        .is_none()
    {
        warn!("Leaf {} had no ledger entry", entry);
    }
    state.stats.unrecord(polarity, leaf.score);
    if let Some(slot) = leaf.slot {
        state.grid.release(slot.row, slot.column);
    }

    info!("Leaf {} removed", entry);
    state.emit(EngineEvent::LeafRemoved { entry });
    state.emit_statistics();

    UpdateResult::none()
}

pub fn handle_toggle_labels(state: &mut AppState) -> UpdateResult {
    if state.ledger.is_empty() {
        return UpdateResult::none();
    }

    state.label_mode = state.label_mode.toggled();
    debug!("Labels now show {:?}", state.label_mode);
    state.emit(EngineEvent::LabelsToggled {
        mode: state.label_mode,
    });
    UpdateResult::none()
}
