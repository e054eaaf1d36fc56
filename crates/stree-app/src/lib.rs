//! stree-app - Coordinator state and orchestration for the sentiment tree
//!
//! This crate implements the TEA (The Elm Architecture) pattern for state
//! management: messages go through `handler::update`, which mutates
//! [`AppState`] and returns actions; campaign timers run as tokio tasks that
//! post their steps back as messages. The [`Engine`] ties it together and
//! broadcasts [`EngineEvent`]s to runners.

pub mod actions;
pub mod config;
pub mod engine;
pub mod engine_event;
pub mod handler;
pub mod message;
pub mod process;
pub mod scorer;
pub mod sequencer;
pub mod state;

// Re-export primary types
pub use engine::Engine;
pub use engine_event::EngineEvent;
pub use handler::{UpdateAction, UpdateResult};
pub use message::Message;
pub use scorer::{Scored, Scorer, TaggedScorer};
pub use sequencer::{Campaign, CampaignId, PendingSequenceOp, ScheduledStep, Sequencer, SequencerPhase};
pub use state::{AppState, LabelMode, Leaf};
