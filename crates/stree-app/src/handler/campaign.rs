//! Campaign handlers: trunk growth and full re-sort
//!
//! A campaign is opened here, its steps are fired by a timer task, and each
//! fired step comes back as `Message::CampaignStep` so every grid and ledger
//! mutation happens on the message loop.

use stree_core::{Error, SortDirection, TreePart};
use tracing::{debug, info, warn};

use crate::engine_event::EngineEvent;
use crate::sequencer::{ScheduledStep, SequencerPhase};
use crate::state::AppState;

use super::{UpdateAction, UpdateResult};

/// Open a trunk growth campaign for every trunk cell not grown yet
pub fn handle_grow_trunk(state: &mut AppState) -> UpdateResult {
    let remaining = state.grid.rows() - state.grid.grown_trunk();
    if remaining == 0 {
        debug!("Trunk already fully grown");
        return UpdateResult::none();
    }

    let (lead, step) = (state.timing.lead(), state.timing.trunk_step());
    match state.sequencer.begin_trunk(remaining, lead, step) {
        Ok(campaign) => UpdateResult::action(UpdateAction::ScheduleCampaign(campaign)),
        Err(e) => {
            log_rejection("Trunk growth", &e);
            UpdateResult::none()
        }
    }
}

/// Detach every leaf and schedule re-placement in the next sort direction
pub fn handle_sort(state: &mut AppState) -> UpdateResult {
    if state.ledger.is_empty() {
        debug!("Sort rejected: ledger is empty");
        return UpdateResult::none();
    }

    let direction = state.sequencer.next_direction();
    let order = state.ledger.snapshot(direction);
    let campaign = match state.sequencer.begin_sort(
        order,
        direction,
        state.timing.lead(),
        state.timing.sort_step(),
    ) {
        Ok(campaign) => campaign,
        Err(e) => {
            log_rejection("Sort", &e);
            return UpdateResult::none();
        }
    };

    state.grid.reset_leaf_slots();

    info!("Sorting {} leaves {}", campaign.steps.len(), direction);
    state.emit(EngineEvent::SortStarted {
        direction,
        count: campaign.steps.len(),
    });
    for step in &campaign.steps {
        let Some(entry) = step.op.entry else { continue };
        if let Some(leaf) = state.leaves.get_mut(&entry) {
            leaf.slot = None;
        }
        state.emit(EngineEvent::LeafDetached { entry });
    }

    UpdateResult::action(UpdateAction::ScheduleCampaign(campaign))
}

/// Execute one fired step of the open campaign
pub fn handle_campaign_step(state: &mut AppState, step: ScheduledStep) -> UpdateResult {
    if !state.sequencer.is_current(&step) {
        debug!(
            "Dropping stale step {}/{} of campaign {}",
            step.index + 1,
            step.total,
            step.campaign
        );
        return UpdateResult::none();
    }

    match step.op.target {
        TreePart::Trunk => grow_trunk_step(state, &step),
        TreePart::Leaf => sort_step(state, &step),
    }

    UpdateResult::none()
}

fn grow_trunk_step(state: &mut AppState, step: &ScheduledStep) {
    match state.grid.find_and_reserve(TreePart::Trunk) {
        Ok(slot) => state.emit(EngineEvent::TrunkGrown { slot }),
        Err(e) => report_placement_failure(state, TreePart::Trunk, &e),
    }

    if step.is_last() {
        state.sequencer.finish();
        info!("Trunk fully grown");
        state.emit(EngineEvent::TrunkCompleted);
    }
}

fn sort_step(state: &mut AppState, step: &ScheduledStep) {
    let SequencerPhase::Sorting { direction, .. } = state.sequencer.phase() else {
        return;
    };

    let placed = step.op.entry.and_then(|entry| {
        let leaf = state.leaves.get(&entry)?;
        Some((entry, leaf.classification, leaf.text.clone()))
    });

    let Some((entry, classification, text)) = placed else {
        warn!(
            "Sort step {}/{} refers to a missing leaf; skipping",
            step.index + 1,
            step.total
        );
        if step.is_last() {
            finish_sort(state, direction);
        }
        return;
    };

    let slot = match state.grid.find_and_reserve(TreePart::Leaf) {
        Ok(slot) => slot,
        Err(e) => {
            // Nothing later in this campaign can succeed either
            report_placement_failure(state, TreePart::Leaf, &e);
            finish_sort(state, direction);
            return;
        }
    };

    if let Some(leaf) = state.leaves.get_mut(&entry) {
        leaf.slot = Some(slot);
    }
    state.emit(EngineEvent::LeafPlaced {
        entry,
        slot,
        polarity: classification.polarity,
        confidence: classification.confidence,
        text,
    });

    if slot.rank == state.ledger.len() {
        finish_sort(state, direction);
    } else if step.is_last() {
        // Only reachable after a skipped step
        warn!(
            "Sort ended at rank {} of {}",
            slot.rank,
            state.ledger.len()
        );
        finish_sort(state, direction);
    }
}

fn finish_sort(state: &mut AppState, direction: SortDirection) {
    state.sequencer.finish();
    info!("Sort {} complete", direction);
    state.emit(EngineEvent::SortCompleted { direction });
    state.emit_statistics();
}

fn log_rejection(what: &str, error: &Error) {
    if error.is_recoverable() {
        debug!("{} rejected: {}", what, error);
    } else {
        warn!("{} rejected: {}", what, error);
    }
}

fn report_placement_failure(state: &mut AppState, part: TreePart, error: &Error) {
    warn!("Placement failed: {}", error);
    state.emit(EngineEvent::PlacementFailed {
        part,
        reason: error.to_string(),
    });
}
