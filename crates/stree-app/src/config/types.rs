//! Configuration types for the sentiment tree
//!
//! Defines:
//! - `Settings` - Global settings (`.stree/config.toml`)
//! - `GridSettings`, `TimingSettings`, `ScoringSettings`

use std::time::Duration;

use serde::{Deserialize, Serialize};
use stree_core::{
    Error, Polarity, PolarityWeights, Result, ScoreEncoding, SlotGrid, DEFAULT_CANOPY, DEFAULT_COLUMNS,
    DEFAULT_ROWS, DEFAULT_SCORE_MULTIPLIER, DEFAULT_STATS_MULTIPLIER, DEFAULT_TRUNK_COLUMN,
};

/// Application settings (.stree/config.toml)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub grid: GridSettings,

    #[serde(default)]
    pub timing: TimingSettings,

    #[serde(default)]
    pub scoring: ScoringSettings,
}

impl Settings {
    /// Build the slot grid described by `[grid]`
    pub fn build_grid(&self) -> Result<SlotGrid> {
        self.grid.build()
    }

    /// Score encoding described by `[scoring]`
    pub fn score_encoding(&self) -> Result<ScoreEncoding> {
        self.scoring.encoding()
    }
}

/// Grid shape settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GridSettings {
    #[serde(default = "default_rows")]
    pub rows: usize,

    #[serde(default = "default_columns")]
    pub columns: usize,

    /// Column reserved for the trunk
    #[serde(default = "default_trunk_column")]
    pub trunk_column: usize,

    /// One string per row: `.` no slot, `L` leaf slot, `T` trunk slot.
    /// An empty list means every non-trunk cell is a leaf slot.
    #[serde(default = "default_canopy")]
    pub canopy: Vec<String>,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            rows: default_rows(),
            columns: default_columns(),
            trunk_column: default_trunk_column(),
            canopy: default_canopy(),
        }
    }
}

impl GridSettings {
    pub fn build(&self) -> Result<SlotGrid> {
        if self.canopy.is_empty() {
            return SlotGrid::new(self.rows, self.columns, self.trunk_column);
        }

        let grid = SlotGrid::from_canopy(&self.canopy, self.trunk_column)?;
        if grid.rows() != self.rows || grid.columns() != self.columns {
            return Err(Error::grid_layout(format!(
                "canopy is {}x{} but grid is configured as {}x{}",
                grid.rows(),
                grid.columns(),
                self.rows,
                self.columns
            )));
        }
        Ok(grid)
    }
}

fn default_rows() -> usize {
    DEFAULT_ROWS
}

fn default_columns() -> usize {
    DEFAULT_COLUMNS
}

fn default_trunk_column() -> usize {
    DEFAULT_TRUNK_COLUMN
}

fn default_canopy() -> Vec<String> {
    DEFAULT_CANOPY.iter().map(|r| r.to_string()).collect()
}

/// Campaign cadence settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TimingSettings {
    /// Offset added to every scheduled delay (milliseconds)
    #[serde(default = "default_lead_ms")]
    pub lead_ms: u64,

    /// Interval between trunk growth steps (milliseconds)
    #[serde(default = "default_trunk_step_ms")]
    pub trunk_step_ms: u64,

    /// Interval between re-sort placements (milliseconds)
    #[serde(default = "default_sort_step_ms")]
    pub sort_step_ms: u64,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            lead_ms: default_lead_ms(),
            trunk_step_ms: default_trunk_step_ms(),
            sort_step_ms: default_sort_step_ms(),
        }
    }
}

impl TimingSettings {
    pub fn lead(&self) -> Duration {
        Duration::from_millis(self.lead_ms)
    }

    /// Step interval, clamped to at least 1ms so delays stay strictly increasing
    pub fn trunk_step(&self) -> Duration {
        Duration::from_millis(self.trunk_step_ms.max(1))
    }

    pub fn sort_step(&self) -> Duration {
        Duration::from_millis(self.sort_step_ms.max(1))
    }
}

fn default_lead_ms() -> u64 {
    100
}

fn default_trunk_step_ms() -> u64 {
    200
}

fn default_sort_step_ms() -> u64 {
    100
}

/// Score encoding multipliers
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScoringSettings {
    /// Confidence -> combined ledger score
    #[serde(default = "default_score_multiplier")]
    pub score_multiplier: PolarityWeights,

    /// Combined ledger score -> category-local 0..100 value
    #[serde(default = "default_stats_multiplier")]
    pub stats_multiplier: PolarityWeights,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            score_multiplier: default_score_multiplier(),
            stats_multiplier: default_stats_multiplier(),
        }
    }
}

impl ScoringSettings {
    /// Build the encoding, rejecting multipliers that are not finite and
    /// positive. Anything else can yield NaN scores, which never compare
    /// equal and so could never be unrecorded from the statistics.
    pub fn encoding(&self) -> Result<ScoreEncoding> {
        validate_weights("score_multiplier", &self.score_multiplier)?;
        validate_weights("stats_multiplier", &self.stats_multiplier)?;
        Ok(ScoreEncoding {
            score_multiplier: self.score_multiplier,
            stats_multiplier: self.stats_multiplier,
        })
    }
}

fn validate_weights(table: &str, weights: &PolarityWeights) -> Result<()> {
    for polarity in [Polarity::Negative, Polarity::Neutral, Polarity::Positive] {
        let value = weights.get(polarity);
        if !value.is_finite() || value <= 0.0 {
            return Err(Error::config(format!(
                "scoring.{}.{} must be a finite positive number, got {}",
                table, polarity, value
            )));
        }
    }
    Ok(())
}

fn default_score_multiplier() -> PolarityWeights {
    DEFAULT_SCORE_MULTIPLIER
}

fn default_stats_multiplier() -> PolarityWeights {
    DEFAULT_STATS_MULTIPLIER
}
