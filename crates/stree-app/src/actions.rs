//! Campaign timer tasks
//!
//! Steps are never executed here. A campaign task only sleeps until each
//! step is due and posts it back to the engine as `Message::CampaignStep`,
//! so the grid and ledger are mutated on the message loop alone.

use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::debug;

use crate::message::Message;
use crate::sequencer::Campaign;

/// Spawn the timer task for one campaign.
///
/// Every delay is measured from the moment the campaign is spawned. Steps
/// are posted strictly in order; the task exits early on shutdown or when
/// the engine's channel closes.
pub fn spawn_campaign(
    campaign: Campaign,
    msg_tx: mpsc::Sender<Message>,
    mut shutdown_rx: watch::Receiver<bool>,
    campaign_tasks: &mut JoinSet<()>,
) {
    let start = Instant::now();

    campaign_tasks.spawn(async move {
        let id = campaign.id;
        for step in campaign.steps {
            if *shutdown_rx.borrow() {
                debug!("Campaign {} cancelled by shutdown", id);
                return;
            }

            tokio::select! {
                _ = tokio::time::sleep_until(start + step.op.delay) => {}
                _ = shutdown_rx.changed() => {
                    debug!("Campaign {} cancelled by shutdown", id);
                    return;
                }
            }

            if msg_tx.send(Message::CampaignStep(step)).await.is_err() {
                debug!("Campaign {} stopped: message channel closed", id);
                return;
            }
        }
        debug!("Campaign {} timer task finished", id);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencer::Sequencer;
    use std::time::Duration;
    use stree_core::{EntryId, SortDirection};

    #[tokio::test(start_paused = true)]
    async fn test_campaign_steps_arrive_in_order_on_time() {
        let (msg_tx, mut msg_rx) = mpsc::channel(16);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let mut tasks = JoinSet::new();

        let campaign = Sequencer::new()
            .begin_sort(
                vec![EntryId(3), EntryId(1), EntryId(2)],
                SortDirection::Ascending,
                Duration::from_millis(100),
                Duration::from_millis(100),
            )
            .unwrap();

        let start = Instant::now();
        spawn_campaign(campaign, msg_tx, shutdown_rx, &mut tasks);

        let mut seen = Vec::new();
        while let Some(Message::CampaignStep(step)) = msg_rx.recv().await {
            assert_eq!(start.elapsed(), step.op.delay);
            seen.push(step.op.entry.unwrap());
            if step.is_last() {
                break;
            }
        }
        assert_eq!(seen, vec![EntryId(3), EntryId(1), EntryId(2)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_pending_steps() {
        let (msg_tx, mut msg_rx) = mpsc::channel(16);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let mut tasks = JoinSet::new();

        let campaign = Sequencer::new()
            .begin_trunk(5, Duration::ZERO, Duration::from_secs(1))
            .unwrap();
        spawn_campaign(campaign, msg_tx, shutdown_rx, &mut tasks);

        assert!(matches!(
            msg_rx.recv().await,
            Some(Message::CampaignStep(step)) if step.index == 0
        ));

        shutdown_tx.send(true).unwrap();
        while tasks.join_next().await.is_some() {}

        assert!(msg_rx.recv().await.is_none());
    }
}
