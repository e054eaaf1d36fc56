//! Domain events emitted by the Engine for external consumers
//!
//! Events are queued on [`AppState`](crate::state::AppState) while a message
//! is processed and broadcast once processing finishes, via
//! `Engine::subscribe()`. A presentation layer only ever needs these events
//! to mirror the tree.

use crate::state::LabelMode;
use stree_core::{EntryId, Polarity, Slot, SortDirection, StatsSummary, TreePart};

/// Domain events emitted by the Engine for external consumers.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    // ─────────────────────────────────────────────────────────
    // Trunk
    // ─────────────────────────────────────────────────────────
    /// One trunk cell was grown
    TrunkGrown { slot: Slot },

    /// The trunk growth campaign finished
    TrunkCompleted,

    // ─────────────────────────────────────────────────────────
    // Leaves
    // ─────────────────────────────────────────────────────────
    /// A leaf was placed at `slot` (new insertion or re-sort placement)
    LeafPlaced {
        entry: EntryId,
        slot: Slot,
        polarity: Polarity,
        confidence: f64,
        text: String,
    },

    /// A leaf was lifted off the grid at the start of a re-sort
    LeafDetached { entry: EntryId },

    /// A leaf was deleted
    LeafRemoved { entry: EntryId },

    /// Every leaf label switched mode
    LabelsToggled { mode: LabelMode },

    // ─────────────────────────────────────────────────────────
    // Sorting
    // ─────────────────────────────────────────────────────────
    SortStarted {
        direction: SortDirection,
        count: usize,
    },

    SortCompleted { direction: SortDirection },

    // ─────────────────────────────────────────────────────────
    // Statistics & Failures
    // ─────────────────────────────────────────────────────────
    StatisticsUpdated(StatsSummary),

    /// The grid had no free slot for the requested part
    PlacementFailed { part: TreePart, reason: String },

    /// The scorer rejected a submission
    ScoringFailed { text: String, reason: String },

    // ─────────────────────────────────────────────────────────
    // Engine Lifecycle
    // ─────────────────────────────────────────────────────────
    /// Engine is shutting down
    Shutdown,
}

impl EngineEvent {
    /// Get a string label for the event type (useful for logging/filtering).
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::TrunkGrown { .. } => "trunk_grown",
            Self::TrunkCompleted => "trunk_completed",
            Self::LeafPlaced { .. } => "leaf_placed",
            Self::LeafDetached { .. } => "leaf_detached",
            Self::LeafRemoved { .. } => "leaf_removed",
            Self::LabelsToggled { .. } => "labels_toggled",
            Self::SortStarted { .. } => "sort_started",
            Self::SortCompleted { .. } => "sort_completed",
            Self::StatisticsUpdated(_) => "statistics_updated",
            Self::PlacementFailed { .. } => "placement_failed",
            Self::ScoringFailed { .. } => "scoring_failed",
            Self::Shutdown => "shutdown",
        }
    }
}
