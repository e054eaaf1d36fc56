//! Main update function - handles state transitions (TEA pattern)

use crate::message::Message;
use crate::state::AppState;
use tracing::info;

use super::{campaign, leaf, UpdateResult};

/// Process a message and update state
/// Returns optional follow-up message and/or action
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        Message::Quit => {
            if !state.sequencer.is_idle() {
                info!("Quit requested; waiting for the open campaign to finish");
            }
            state.request_quit();
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Leaves
        // ─────────────────────────────────────────────────────────
        Message::SubmitText { text } => leaf::handle_submit_text(state, text),
        Message::AddLeaf {
            text,
            classification,
        } => leaf::handle_add_leaf(state, text, classification),
        Message::ScoringFailed { text, error } => leaf::handle_scoring_failed(state, text, error),
        Message::DeleteLeaf { entry } => leaf::handle_delete_leaf(state, entry),
        Message::ToggleLabels => leaf::handle_toggle_labels(state),

        // ─────────────────────────────────────────────────────────
        // Campaigns
        // ─────────────────────────────────────────────────────────
        Message::GrowTrunk => campaign::handle_grow_trunk(state),
        Message::Sort => campaign::handle_sort(state),
        Message::CampaignStep(step) => campaign::handle_campaign_step(state, step),
    }
}
