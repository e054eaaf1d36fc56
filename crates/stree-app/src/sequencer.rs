//! Campaign sequencer
//!
//! A campaign is a bounded run of one-shot steps with strictly increasing
//! delays: either trunk growth or a full re-sort of the ledger. At most one
//! campaign is open at a time. Steps carry an immutable snapshot of what
//! they act on (target part, delay, entry id) and are executed on the
//! engine's message loop when their timer fires.

use std::fmt;
use std::time::Duration;

use stree_core::prelude::*;
use stree_core::{EntryId, SortDirection, TreePart};

/// Monotonic campaign identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CampaignId(pub u64);

impl fmt::Display for CampaignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single scheduled placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingSequenceOp {
    pub target: TreePart,
    /// Delay from campaign start
    pub delay: Duration,
    /// Entry to re-place (sort campaigns only)
    pub entry: Option<EntryId>,
}

/// A pending op tagged with its position in its campaign
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledStep {
    pub campaign: CampaignId,
    /// 0-based position in the campaign
    pub index: usize,
    pub total: usize,
    pub op: PendingSequenceOp,
}

impl ScheduledStep {
    pub fn is_last(&self) -> bool {
        self.index + 1 == self.total
    }
}

/// A full batch of steps handed to the timer task
#[derive(Debug, Clone, PartialEq)]
pub struct Campaign {
    pub id: CampaignId,
    pub steps: Vec<ScheduledStep>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SequencerPhase {
    #[default]
    Idle,
    GrowingTrunk {
        campaign: CampaignId,
        total: usize,
    },
    Sorting {
        campaign: CampaignId,
        direction: SortDirection,
        total: usize,
    },
}

/// Tracks the open campaign and the next sort direction
#[derive(Debug, Clone, Default)]
pub struct Sequencer {
    phase: SequencerPhase,
    next_direction: SortDirection,
    next_campaign: u64,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SequencerPhase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == SequencerPhase::Idle
    }

    /// True while a re-sort is running; gates leaf insertion and deletion
    pub fn is_sorting(&self) -> bool {
        matches!(self.phase, SequencerPhase::Sorting { .. })
    }

    /// Direction the next accepted sort will use
    pub fn next_direction(&self) -> SortDirection {
        self.next_direction
    }

    pub fn current_campaign(&self) -> Option<CampaignId> {
        match self.phase {
            SequencerPhase::Idle => None,
            SequencerPhase::GrowingTrunk { campaign, .. }
            | SequencerPhase::Sorting { campaign, .. } => Some(campaign),
        }
    }

    /// Whether `step` belongs to the open campaign
    pub fn is_current(&self, step: &ScheduledStep) -> bool {
        self.current_campaign() == Some(step.campaign)
    }

    /// Open a trunk growth campaign of `count` steps
    pub fn begin_trunk(&mut self, count: usize, lead: Duration, step: Duration) -> Result<Campaign> {
        self.ensure_idle()?;

        let id = self.allocate_id();
        let ops = (0..count).map(|_| (TreePart::Trunk, None));
        let campaign = build_campaign(id, ops, lead, step);

        self.phase = SequencerPhase::GrowingTrunk {
            campaign: id,
            total: campaign.steps.len(),
        };
        debug!("Trunk campaign {} opened with {} steps", id, count);
        Ok(campaign)
    }

    /// Open a re-sort campaign over `order`.
    ///
    /// The sort direction toggles only when the campaign is accepted.
    pub fn begin_sort(
        &mut self,
        order: Vec<EntryId>,
        direction: SortDirection,
        lead: Duration,
        step: Duration,
    ) -> Result<Campaign> {
        self.ensure_idle()?;

        let id = self.allocate_id();
        let ops = order.into_iter().map(|e| (TreePart::Leaf, Some(e)));
        let campaign = build_campaign(id, ops, lead, step);

        self.phase = SequencerPhase::Sorting {
            campaign: id,
            direction,
            total: campaign.steps.len(),
        };
        self.next_direction = direction.toggled();
        debug!(
            "Sort campaign {} opened: {} entries {}",
            id,
            campaign.steps.len(),
            direction
        );
        Ok(campaign)
    }

    /// Close the open campaign and return to `Idle`
    pub fn finish(&mut self) -> SequencerPhase {
        if let Some(id) = self.current_campaign() {
            debug!("Campaign {} closed", id);
        }
        std::mem::take(&mut self.phase)
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.is_idle() {
            Ok(())
        } else {
            Err(Error::CampaignInProgress)
        }
    }

    fn allocate_id(&mut self) -> CampaignId {
        self.next_campaign += 1;
        CampaignId(self.next_campaign)
    }
}

/// Step `k` (1-based) fires at `lead + k * step`
fn build_campaign(
    id: CampaignId,
    ops: impl ExactSizeIterator<Item = (TreePart, Option<EntryId>)>,
    lead: Duration,
    step: Duration,
) -> Campaign {
    let total = ops.len();
    let steps = ops
        .enumerate()
        .map(|(index, (target, entry))| ScheduledStep {
            campaign: id,
            index,
            total,
            op: PendingSequenceOp {
                target,
                delay: lead + step * (index as u32 + 1),
                entry,
            },
        })
        .collect();
    Campaign { id, steps }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEAD: Duration = Duration::from_millis(100);
    const STEP: Duration = Duration::from_millis(200);

    fn ids(n: u64) -> Vec<EntryId> {
        (1..=n).map(EntryId).collect()
    }

    #[test]
    fn test_trunk_delays_strictly_increase() {
        let mut seq = Sequencer::new();
        let campaign = seq.begin_trunk(14, LEAD, STEP).unwrap();

        assert_eq!(campaign.steps.len(), 14);
        assert_eq!(campaign.steps[0].op.delay, Duration::from_millis(300));
        assert_eq!(campaign.steps[13].op.delay, Duration::from_millis(2900));
        assert!(campaign
            .steps
            .windows(2)
            .all(|w| w[0].op.delay < w[1].op.delay));
        assert!(campaign.steps.iter().all(|s| s.op.target == TreePart::Trunk));
        assert!(campaign.steps[13].is_last());
        assert!(matches!(seq.phase(), SequencerPhase::GrowingTrunk { total: 14, .. }));
    }

    #[test]
    fn test_sort_schedules_one_step_per_entry() {
        let mut seq = Sequencer::new();
        let campaign = seq
            .begin_sort(ids(5), SortDirection::Ascending, LEAD, Duration::from_millis(100))
            .unwrap();

        assert_eq!(campaign.steps.len(), 5);
        let entries: Vec<_> = campaign.steps.iter().filter_map(|s| s.op.entry).collect();
        assert_eq!(entries, ids(5));
        assert_eq!(campaign.steps[4].op.delay, Duration::from_millis(600));
        assert!(seq.is_sorting());
    }

    #[test]
    fn test_second_campaign_rejected() {
        let mut seq = Sequencer::new();
        seq.begin_trunk(3, LEAD, STEP).unwrap();

        let err = seq
            .begin_sort(ids(2), SortDirection::Ascending, LEAD, STEP)
            .unwrap_err();
        assert!(matches!(err, Error::CampaignInProgress));
        assert!(!seq.is_sorting());

        // Rejected sorts do not consume a direction toggle
        assert_eq!(seq.next_direction(), SortDirection::Ascending);
    }

    #[test]
    fn test_direction_toggles_per_accepted_sort() {
        let mut seq = Sequencer::new();

        let dir = seq.next_direction();
        seq.begin_sort(ids(1), dir, LEAD, STEP).unwrap();
        assert_eq!(dir, SortDirection::Ascending);
        seq.finish();

        let dir = seq.next_direction();
        seq.begin_sort(ids(1), dir, LEAD, STEP).unwrap();
        assert_eq!(dir, SortDirection::Descending);
        seq.finish();

        assert_eq!(seq.next_direction(), SortDirection::Ascending);
    }

    #[test]
    fn test_steps_from_closed_campaign_are_stale() {
        let mut seq = Sequencer::new();
        let first = seq.begin_trunk(2, LEAD, STEP).unwrap();
        seq.finish();
        let second = seq
            .begin_sort(ids(1), SortDirection::Ascending, LEAD, STEP)
            .unwrap();

        assert_ne!(first.id, second.id);
        assert!(!seq.is_current(&first.steps[0]));
        assert!(seq.is_current(&second.steps[0]));
    }

    #[test]
    fn test_finish_returns_previous_phase() {
        let mut seq = Sequencer::new();
        assert_eq!(seq.finish(), SequencerPhase::Idle);

        seq.begin_trunk(1, LEAD, STEP).unwrap();
        assert!(matches!(seq.finish(), SequencerPhase::GrowingTrunk { .. }));
        assert!(seq.is_idle());
        assert_eq!(seq.current_campaign(), None);
    }
}
