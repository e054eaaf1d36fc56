//! Message types for the application (TEA pattern)

use crate::sequencer::ScheduledStep;
use stree_core::{Classification, EntryId};

/// All possible messages/actions in the application
#[derive(Debug, Clone)]
pub enum Message {
    /// Start the trunk growth campaign
    GrowTrunk,

    /// Raw text submitted for scoring and placement
    SubmitText { text: String },

    /// Scored text ready for immediate placement
    AddLeaf {
        text: String,
        classification: Classification,
    },

    /// The scorer rejected a submission
    ScoringFailed { text: String, error: String },

    /// Remove a leaf by identity; unknown ids are ignored
    DeleteLeaf { entry: EntryId },

    /// Start a re-sort campaign
    Sort,

    /// Flip every leaf label between its text and its confidence
    ToggleLabels,

    /// A campaign timer fired
    CampaignStep(ScheduledStep),

    /// Quit once no campaign is open
    Quit,
}
