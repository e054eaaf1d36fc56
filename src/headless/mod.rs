//! Headless mode - JSON event output
//!
//! Drives the engine from stdin commands and writes every engine event to
//! stdout as NDJSON (newline-delimited JSON), one event per line. Each event
//! has an "event" field indicating its type, along with event-specific data.
//!
//! # Example Output
//!
//! ```json
//! {"event":"trunk_grown","row":0,"column":3,"timestamp":1704700001000}
//! {"event":"leaf_placed","entry":1,"rank":1,"row":1,"column":2,"polarity":"negative","confidence":0.5,"label":"I hate Mondays","timestamp":1704700002000}
//! {"event":"sort_started","direction":"ascending","count":3,"timestamp":1704700003000}
//! ```

pub mod runner;

use chrono::Utc;
use serde::Serialize;
use std::io::{self, Write};
use tracing::error;

use stree_app::{AppState, EngineEvent, LabelMode};
use stree_core::{EntryId, Polarity, SortDirection, StatsSummary, TreePart};

/// Current label of one leaf
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeafLabel {
    pub entry: EntryId,
    /// `None` while the leaf is detached by a sort
    pub rank: Option<usize>,
    pub label: String,
}

/// Events emitted in headless mode
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeadlessEvent {
    TrunkGrown {
        row: usize,
        column: usize,
        timestamp: i64,
    },

    TrunkCompleted { timestamp: i64 },

    /// A leaf appeared at a slot (new or re-sorted)
    LeafPlaced {
        entry: EntryId,
        rank: usize,
        row: usize,
        column: usize,
        polarity: Polarity,
        confidence: f64,
        label: String,
        timestamp: i64,
    },

    LeafDetached { entry: EntryId, timestamp: i64 },

    LeafRemoved { entry: EntryId, timestamp: i64 },

    /// Every leaf's label after a swap
    LabelsToggled {
        mode: LabelMode,
        labels: Vec<LeafLabel>,
        timestamp: i64,
    },

    SortStarted {
        direction: SortDirection,
        count: usize,
        timestamp: i64,
    },

    SortCompleted {
        direction: SortDirection,
        timestamp: i64,
    },

    Statistics {
        stats: StatsSummary,
        timestamp: i64,
    },

    PlacementFailed {
        part: TreePart,
        reason: String,
        timestamp: i64,
    },

    ScoringFailed {
        text: String,
        reason: String,
        timestamp: i64,
    },

    /// Error occurred
    Error {
        message: String,
        fatal: bool,
        timestamp: i64,
    },

    Shutdown { timestamp: i64 },
}

impl HeadlessEvent {
    /// Emit this event to stdout as JSON
    pub fn emit(&self) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize headless event: {}", e);
                return;
            }
        };

        let mut stdout = io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", json) {
            error!("Failed to write headless event to stdout: {}", e);
            return;
        }

        // Flush to ensure immediate output
        if let Err(e) = stdout.flush() {
            error!("Failed to flush headless stdout: {}", e);
        }
    }

    /// Get current timestamp in milliseconds
    fn now() -> i64 {
        Utc::now().timestamp_millis()
    }

    /// Translate an engine event, resolving labels against current state
    pub fn from_engine(event: &EngineEvent, state: &AppState) -> Self {
        let timestamp = Self::now();
        match event {
            EngineEvent::TrunkGrown { slot } => Self::TrunkGrown {
                row: slot.row,
                column: slot.column,
                timestamp,
            },
            EngineEvent::TrunkCompleted => Self::TrunkCompleted { timestamp },
            EngineEvent::LeafPlaced {
                entry,
                slot,
                polarity,
                confidence,
                text,
            } => Self::LeafPlaced {
                entry: *entry,
                rank: slot.rank,
                row: slot.row,
                column: slot.column,
                polarity: *polarity,
                confidence: *confidence,
                label: state.label_of(*entry).unwrap_or_else(|| text.clone()),
                timestamp,
            },
            EngineEvent::LeafDetached { entry } => Self::LeafDetached {
                entry: *entry,
                timestamp,
            },
            EngineEvent::LeafRemoved { entry } => Self::LeafRemoved {
                entry: *entry,
                timestamp,
            },
            EngineEvent::LabelsToggled { mode } => Self::LabelsToggled {
                mode: *mode,
                labels: current_labels(state),
                timestamp,
            },
            EngineEvent::SortStarted { direction, count } => Self::SortStarted {
                direction: *direction,
                count: *count,
                timestamp,
            },
            EngineEvent::SortCompleted { direction } => Self::SortCompleted {
                direction: *direction,
                timestamp,
            },
            EngineEvent::StatisticsUpdated(stats) => Self::Statistics {
                stats: *stats,
                timestamp,
            },
            EngineEvent::PlacementFailed { part, reason } => Self::PlacementFailed {
                part: *part,
                reason: reason.clone(),
                timestamp,
            },
            EngineEvent::ScoringFailed { text, reason } => Self::ScoringFailed {
                text: text.clone(),
                reason: reason.clone(),
                timestamp,
            },
            EngineEvent::Shutdown => Self::Shutdown { timestamp },
        }
    }

    pub fn error(message: String, fatal: bool) -> Self {
        Self::Error {
            message,
            fatal,
            timestamp: Self::now(),
        }
    }
}

/// Labels of every leaf, ordered by entry id
fn current_labels(state: &AppState) -> Vec<LeafLabel> {
    let mut entries: Vec<EntryId> = state.leaves.keys().copied().collect();
    entries.sort();
    entries
        .into_iter()
        .filter_map(|entry| {
            state
                .label_of(entry)
                .map(|label| LeafLabel {
                    entry,
                    rank: state.rank_of(entry),
                    label,
                })
        })
        .collect()
}
