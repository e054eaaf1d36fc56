//! Application state (Model in TEA pattern)

use std::collections::HashMap;

use serde::Serialize;
use stree_core::{
    CategoryStats, Classification, EntryId, RankedLedger, Result, ScoreEncoding, Slot, SlotGrid,
    StatsSummary,
};

use crate::config::{Settings, TimingSettings};
use crate::engine_event::EngineEvent;
use crate::sequencer::Sequencer;

/// What every leaf label currently shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelMode {
    /// The submitted text
    #[default]
    Text,
    /// The scorer's confidence as a whole percentage
    Confidence,
}

impl LabelMode {
    pub fn toggled(self) -> Self {
        match self {
            LabelMode::Text => LabelMode::Confidence,
            LabelMode::Confidence => LabelMode::Text,
        }
    }
}

/// Payload owned by the coordinator for one ledger entry
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    pub text: String,
    pub classification: Classification,
    /// Combined ledger score
    pub score: f64,
    /// `None` while detached during a re-sort
    pub slot: Option<Slot>,
}

/// Complete application state (the Model in TEA)
#[derive(Debug)]
pub struct AppState {
    pub grid: SlotGrid,
    pub ledger: RankedLedger,
    pub stats: CategoryStats,
    pub sequencer: Sequencer,
    pub encoding: ScoreEncoding,
    pub timing: TimingSettings,

    /// Leaf payloads keyed by ledger identity
    pub leaves: HashMap<EntryId, Leaf>,

    pub label_mode: LabelMode,

    next_entry_id: u64,
    quit_requested: bool,

    /// Events produced by the current update cycle, drained by the engine
    outbox: Vec<EngineEvent>,
}

impl AppState {
    pub fn new(grid: SlotGrid, encoding: ScoreEncoding, timing: TimingSettings) -> Self {
        Self {
            grid,
            ledger: RankedLedger::new(),
            stats: CategoryStats::new(),
            sequencer: Sequencer::new(),
            encoding,
            timing,
            leaves: HashMap::new(),
            label_mode: LabelMode::default(),
            next_entry_id: 0,
            quit_requested: false,
            outbox: Vec::new(),
        }
    }

    /// Build state from loaded settings; fails on an invalid grid layout
    pub fn with_settings(settings: &Settings) -> Result<Self> {
        Ok(Self::new(
            settings.build_grid()?,
            settings.score_encoding()?,
            settings.timing.clone(),
        ))
    }

    pub fn allocate_entry_id(&mut self) -> EntryId {
        self.next_entry_id += 1;
        EntryId(self.next_entry_id)
    }

    // ─────────────────────────────────────────────────────────
    // Events
    // ─────────────────────────────────────────────────────────

    pub fn emit(&mut self, event: EngineEvent) {
        self.outbox.push(event);
    }

    /// Queue a fresh statistics snapshot
    pub fn emit_statistics(&mut self) {
        let summary = self.stats_summary();
        self.emit(EngineEvent::StatisticsUpdated(summary));
    }

    /// Drain events queued since the last call
    pub fn take_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.outbox)
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    pub fn stats_summary(&self) -> StatsSummary {
        self.stats.summary(self.ledger.len(), &self.encoding)
    }

    /// Current rank of a placed leaf
    pub fn rank_of(&self, entry: EntryId) -> Option<usize> {
        let slot = self.leaves.get(&entry)?.slot?;
        self.grid.rank_at(slot.row, slot.column)
    }

    /// Label text for a leaf under the current label mode
    pub fn label_of(&self, entry: EntryId) -> Option<String> {
        let leaf = self.leaves.get(&entry)?;
        Some(match self.label_mode {
            LabelMode::Text => leaf.text.clone(),
            LabelMode::Confidence => format!("{}%", leaf.classification.percent()),
        })
    }

    // ─────────────────────────────────────────────────────────
    // Quit
    // ─────────────────────────────────────────────────────────

    pub fn request_quit(&mut self) {
        self.quit_requested = true;
    }

    /// True once quit was requested and no campaign is open
    pub fn should_quit(&self) -> bool {
        self.quit_requested && self.sequencer.is_idle()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(
            SlotGrid::tree(),
            ScoreEncoding::default(),
            TimingSettings::default(),
        )
    }
}
