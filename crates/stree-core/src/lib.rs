//! # stree-core - Core Domain Types
//!
//! Foundation crate for the sentiment tree. Provides the slot grid, the
//! ranked ledger, per-polarity statistics, the score encoding and the
//! error taxonomy.
//!
//! This crate has **zero internal dependencies**.
//!
//! ## Public API
//!
//! ### Slot Grid (`grid`)
//! - [`SlotGrid`] - Fixed R×C matrix; reserves trunk and leaf slots, computes leaf ranks
//! - [`Slot`] - A reserved (rank, row, column)
//! - [`SlotState`], [`TreePart`]
//!
//! ### Ranked Ledger (`ledger`)
//! - [`RankedLedger`] - Score-sorted multiset keyed by [`EntryId`]
//! - [`LedgerEntry`], [`SortDirection`]
//!
//! ### Statistics (`stats`)
//! - [`CategoryStats`] - Running per-polarity collections
//! - [`StatsSummary`], [`CategorySummary`]
//!
//! ### Scoring (`polarity`)
//! - [`Polarity`], [`Classification`]
//! - [`ScoreEncoding`] - Confidence <-> combined score encode/decode pair
//!
//! ### Error Handling (`error`)
//! - [`Error`], [`Result`], [`ResultExt`]
//!
//! ## Prelude
//!
//! ```rust
//! use stree_core::prelude::*;
//! ```

pub mod error;
pub mod grid;
pub mod ledger;
pub mod logging;
pub mod polarity;
pub mod stats;

/// Prelude for common imports used throughout all sentiment-tree crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

pub use error::{Error, Result, ResultExt};
pub use grid::{
    Slot, SlotGrid, SlotState, TreePart, DEFAULT_CANOPY, DEFAULT_COLUMNS, DEFAULT_ROWS,
    DEFAULT_TRUNK_COLUMN,
};
pub use ledger::{EntryId, LedgerEntry, RankedLedger, SortDirection};
pub use polarity::{
    Classification, Polarity, PolarityWeights, ScoreEncoding, DEFAULT_SCORE_MULTIPLIER,
    DEFAULT_STATS_MULTIPLIER,
};
pub use stats::{CategoryStats, CategorySummary, StatsSummary};
