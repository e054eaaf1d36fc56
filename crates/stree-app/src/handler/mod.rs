//! Handler module - TEA update function and event handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `leaf`: Immediate leaf insertion, deletion and label toggling
//! - `campaign`: Trunk growth and re-sort campaigns

pub(crate) mod campaign;
pub(crate) mod leaf;
pub(crate) mod update;


use crate::sequencer::Campaign;

// Re-export main entry point
pub use update::update;

/// Side effects the message loop performs after update.
///
/// `process::process_message` handles both kinds itself: campaigns go to a
/// timer task, and classification runs inline with the scorer's answer fed
/// back into the same update cycle as `AddLeaf` or `ScoringFailed`.
#[derive(Debug, Clone)]
pub enum UpdateAction {
    /// Start the timer task that fires every step of a campaign
    ScheduleCampaign(Campaign),

    /// Ask the scorer to classify submitted text
    ClassifyText { text: String },
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional action for the message loop to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            action: Some(action),
        }
    }
}
