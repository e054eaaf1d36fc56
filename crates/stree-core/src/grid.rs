//! Fixed-capacity slot grid for trunk and leaf placement
//!
//! The grid is a row-major matrix of [`SlotState`]. One column is reserved for
//! the trunk; every other column holds leaf slots (or nothing, where the
//! canopy shape leaves a hole).
//!
//! Leaf ranks are never stored. A leaf's rank is recomputed from current
//! occupancy on every reservation, so insertions and removals elsewhere in
//! the grid can never leave a stale rank behind.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default grid height
pub const DEFAULT_ROWS: usize = 14;

/// Default grid width
pub const DEFAULT_COLUMNS: usize = 7;

/// Default trunk column index
pub const DEFAULT_TRUNK_COLUMN: usize = 3;

/// Default tree shape: `.` outside the tree, `L` leaf slot, `T` trunk slot.
pub const DEFAULT_CANOPY: [&str; DEFAULT_ROWS] = [
    "...T...", "..LTL..", "..LTL..", ".L.T.L.", ".LLTLL.", "..LTL..", ".L.T.L.", "L.LTL.L",
    "LLLTLLL", ".LLTLL.", "...T...", "...T...", "...T...", "...T...",
];

/// The part of the tree a slot is reserved for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreePart {
    Leaf,
    Trunk,
}

impl fmt::Display for TreePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreePart::Leaf => write!(f, "leaf"),
            TreePart::Trunk => write!(f, "trunk"),
        }
    }
}

/// State of a single grid cell
///
/// Outside the trunk column a cell is always `Empty` (no slot here), `Leaf`
/// (free leaf slot) or `Occupied`. Cells in the trunk column only ever move
/// from `Empty` to `Trunk`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotState {
    #[default]
    Empty,
    Leaf,
    Trunk,
    Occupied,
}

/// A reserved position in the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    /// 1-based ordinal among occupied leaf cells (row-major, trunk column excluded)
    pub rank: usize,
    pub row: usize,
    pub column: usize,
}

/// Fixed R×C matrix of slot states
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotGrid {
    cells: Vec<SlotState>,
    rows: usize,
    columns: usize,
    trunk_column: usize,
}

impl Default for SlotGrid {
    fn default() -> Self {
        Self::tree()
    }
}

impl SlotGrid {
    /// Create a grid where every non-trunk cell is a free leaf slot
    pub fn new(rows: usize, columns: usize, trunk_column: usize) -> Result<Self> {
        validate_dimensions(rows, columns, trunk_column)?;

        let cells = (0..rows * columns)
            .map(|i| {
                if i % columns == trunk_column {
                    SlotState::Empty
                } else {
                    SlotState::Leaf
                }
            })
            .collect();

        Ok(Self {
            cells,
            rows,
            columns,
            trunk_column,
        })
    }

    /// The default 14×7 tree shape
    pub fn tree() -> Self {
        let mut grid = Self {
            cells: Vec::with_capacity(DEFAULT_ROWS * DEFAULT_COLUMNS),
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
            trunk_column: DEFAULT_TRUNK_COLUMN,
        };
        for row in DEFAULT_CANOPY {
            grid.cells.extend(row.chars().map(|c| match c {
                'L' => SlotState::Leaf,
                _ => SlotState::Empty,
            }));
        }
        grid
    }

    /// Build a grid from a canopy description
    ///
    /// Each string is one row: `.` for no slot, `L` for a leaf slot, `T` for a
    /// trunk slot. `T` must appear in every row at `trunk_column` and nowhere else.
    pub fn from_canopy<S: AsRef<str>>(canopy: &[S], trunk_column: usize) -> Result<Self> {
        let rows = canopy.len();
        let columns = canopy.first().map(|r| r.as_ref().chars().count()).unwrap_or(0);
        validate_dimensions(rows, columns, trunk_column)?;

        let mut cells = Vec::with_capacity(rows * columns);
        for (row, line) in canopy.iter().enumerate() {
            let line = line.as_ref();
            if line.chars().count() != columns {
                return Err(Error::grid_layout(format!(
                    "canopy row {} has {} cells, expected {}",
                    row,
                    line.chars().count(),
                    columns
                )));
            }
            for (column, c) in line.chars().enumerate() {
                let state = match (c, column == trunk_column) {
                    ('T', true) => SlotState::Empty,
                    ('L', false) => SlotState::Leaf,
                    ('.', false) => SlotState::Empty,
                    _ => {
                        return Err(Error::grid_layout(format!(
                            "unexpected '{}' at row {}, column {} (trunk column is {})",
                            c, row, column, trunk_column
                        )))
                    }
                };
                cells.push(state);
            }
        }

        Ok(Self {
            cells,
            rows,
            columns,
            trunk_column,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn trunk_column(&self) -> usize {
        self.trunk_column
    }

    /// State of a cell, or `None` when out of bounds
    pub fn state(&self, row: usize, column: usize) -> Option<SlotState> {
        self.index(row, column).map(|i| self.cells[i])
    }

    /// Number of cells that can ever hold a leaf
    pub fn leaf_capacity(&self) -> usize {
        self.leaf_cells()
            .filter(|(_, s)| matches!(s, SlotState::Leaf | SlotState::Occupied))
            .count()
    }

    /// Number of currently occupied leaf cells
    pub fn occupied_leaves(&self) -> usize {
        self.leaf_cells()
            .filter(|(_, s)| *s == SlotState::Occupied)
            .count()
    }

    /// Number of grown trunk cells
    pub fn grown_trunk(&self) -> usize {
        (0..self.rows)
            .filter(|&row| self.state(row, self.trunk_column) == Some(SlotState::Trunk))
            .count()
    }

    /// Find the first free cell for `part` in row-major order and reserve it.
    ///
    /// The returned rank is 1 plus the number of occupied leaf cells scanned
    /// before the reserved cell; for a leaf this equals its ordinal among all
    /// occupied leaf cells once reserved.
    pub fn find_and_reserve(&mut self, part: TreePart) -> Result<Slot> {
        let mut rank = 1;

        for row in 0..self.rows {
            for column in 0..self.columns {
                let i = row * self.columns + column;
                let in_trunk = column == self.trunk_column;
                let state = self.cells[i];

                if state == SlotState::Occupied && !in_trunk {
                    rank += 1;
                }

                let (free, reserved) = match part {
                    TreePart::Leaf => (state == SlotState::Leaf, SlotState::Occupied),
                    TreePart::Trunk => (in_trunk && state == SlotState::Empty, SlotState::Trunk),
                };

                if free {
                    self.cells[i] = reserved;
                    return Ok(Slot { rank, row, column });
                }
            }
        }

        Err(Error::capacity_exhausted(part))
    }

    /// Free an occupied leaf cell.
    ///
    /// Returns `false` (and changes nothing) for trunk cells, out-of-bounds
    /// positions and cells that are not occupied.
    pub fn release(&mut self, row: usize, column: usize) -> bool {
        if column == self.trunk_column {
            return false;
        }
        match self.index(row, column) {
            Some(i) if self.cells[i] == SlotState::Occupied => {
                self.cells[i] = SlotState::Leaf;
                true
            }
            _ => false,
        }
    }

    /// Free every occupied leaf cell; trunk cells are untouched
    pub fn reset_leaf_slots(&mut self) {
        let columns = self.columns;
        let trunk_column = self.trunk_column;
        for (i, cell) in self.cells.iter_mut().enumerate() {
            if i % columns != trunk_column && *cell == SlotState::Occupied {
                *cell = SlotState::Leaf;
            }
        }
    }

    /// Current 1-based rank of the occupied leaf cell at (row, column)
    pub fn rank_at(&self, row: usize, column: usize) -> Option<usize> {
        if column == self.trunk_column || self.state(row, column)? != SlotState::Occupied {
            return None;
        }
        let target = row * self.columns + column;
        let rank = self
            .leaf_cells()
            .take_while(|(i, _)| *i <= target)
            .filter(|(_, s)| *s == SlotState::Occupied)
            .count();
        Some(rank)
    }

    fn index(&self, row: usize, column: usize) -> Option<usize> {
        (row < self.rows && column < self.columns).then(|| row * self.columns + column)
    }

    fn leaf_cells(&self) -> impl Iterator<Item = (usize, SlotState)> + '_ {
        let columns = self.columns;
        let trunk_column = self.trunk_column;
        self.cells
            .iter()
            .copied()
            .enumerate()
            .filter(move |(i, _)| i % columns != trunk_column)
    }
}

fn validate_dimensions(rows: usize, columns: usize, trunk_column: usize) -> Result<()> {
    if rows == 0 || columns == 0 {
        return Err(Error::grid_layout(format!(
            "grid must not be empty ({}x{})",
            rows, columns
        )));
    }
    if trunk_column >= columns {
        return Err(Error::grid_layout(format!(
            "trunk column {} is outside a grid {} columns wide",
            trunk_column, columns
        )));
    }
    Ok(())
}
