//! Message processing
//!
//! Runs the TEA update loop for one incoming message, resolves scorer
//! requests inline and starts campaign timers.

use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tracing::debug;

use crate::actions::spawn_campaign;
use crate::handler::{self, UpdateAction};
use crate::message::Message;
use crate::scorer::Scorer;
use crate::state::AppState;

/// Process a message through the TEA update function
pub fn process_message(
    state: &mut AppState,
    message: Message,
    scorer: &dyn Scorer,
    msg_tx: &mpsc::Sender<Message>,
    shutdown_rx: &watch::Receiver<bool>,
    campaign_tasks: &mut JoinSet<()>,
) {
    // Reap finished campaign timers
    while campaign_tasks.try_join_next().is_some() {}

    let mut msg = Some(message);
    while let Some(m) = msg.take() {
        match handler::update(state, m).action {
            Some(UpdateAction::ScheduleCampaign(campaign)) => {
                spawn_campaign(campaign, msg_tx.clone(), shutdown_rx.clone(), campaign_tasks);
            }
            // The scorer answer is handled in this same cycle
            Some(UpdateAction::ClassifyText { text }) => msg = Some(classify(scorer, text)),
            None => {}
        }
    }
}

/// Ask the scorer about submitted text and turn the answer into the message
/// that places the leaf or reports the failure
fn classify(scorer: &dyn Scorer, submitted: String) -> Message {
    match scorer.classify(&submitted) {
        Ok(scored) => {
            debug!(
                "Classified '{}' as {} ({:.2})",
                submitted, scored.classification.polarity, scored.classification.confidence
            );
            Message::AddLeaf {
                text: scored.text,
                classification: scored.classification,
            }
        }
        Err(e) => Message::ScoringFailed {
            text: submitted,
            error: e.to_string(),
        },
    }
}
