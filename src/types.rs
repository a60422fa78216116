//! Core data types shared across the solver.
//!
//! Moves, constraints and assignments are explicit tagged structures with
//! named fields; nothing downstream pattern-matches on positional tuples.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A cell coordinate: `(column, row)`, 0-indexed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
}

impl Cell {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// What the actuator should do with a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveAction {
    /// Open the cell.
    Reveal,
    /// Mark the cell as a mine candidate.
    Flag,
}

/// A single proposed action, consumed by the external actuator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub cell: Cell,
    pub action: MoveAction,
}

impl Move {
    pub fn reveal(cell: Cell) -> Self {
        Self {
            cell,
            action: MoveAction::Reveal,
        }
    }

    pub fn flag(cell: Cell) -> Self {
        Self {
            cell,
            action: MoveAction::Flag,
        }
    }
}

/// "Exactly `required` mines among `cells`", derived from the revealed
/// number at `source`. Recomputed from a fresh snapshot every pass.
///
/// Invariant: `required <= cells.len()` and `cells` is non-empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Constraint {
    /// Hidden, unflagged neighbors of the source cell.
    pub cells: Vec<Cell>,
    /// Mines still unaccounted for: revealed number minus flagged neighbors.
    pub required: usize,
    /// The revealed numbered cell this constraint was derived from.
    pub source: Cell,
}

impl Constraint {
    /// All cells are safe: every mine is already flagged.
    pub fn is_saturated_safe(&self) -> bool {
        self.required == 0
    }

    /// All cells are mines: as many mines left as cells.
    pub fn is_saturated_mine(&self) -> bool {
        self.required == self.cells.len()
    }
}

/// A maximal set of constraints transitively sharing unresolved cells,
/// paired with the sorted union of those cells. Two components never
/// share a cell.
#[derive(Clone, Debug)]
pub struct Component {
    pub constraints: Vec<Constraint>,
    /// Sorted, deduplicated union of the constraints' cell sets.
    pub cells: Vec<Cell>,
}

impl Component {
    /// Lower bound on mines in this component: no single constraint can
    /// require more mines than the whole component contains.
    pub fn min_mines(&self) -> usize {
        self.constraints
            .iter()
            .map(|c| c.required)
            .max()
            .unwrap_or(0)
    }

    /// Upper bound on mines in this component.
    pub fn max_mines(&self) -> usize {
        let sum: usize = self.constraints.iter().map(|c| c.required).sum();
        sum.min(self.cells.len())
    }

    /// Rough mines-per-cell estimate, used by stuck recovery to pick a
    /// resolution side. Clamped to 1.0 since summed remainders overcount
    /// shared cells.
    pub fn mine_density(&self) -> f64 {
        if self.cells.is_empty() {
            return 0.0;
        }
        let sum: usize = self.constraints.iter().map(|c| c.required).sum();
        (sum as f64 / self.cells.len() as f64).min(1.0)
    }
}

/// One candidate mine/safe labeling of a component's cell list.
/// `mines[i]` refers to `component.cells[i]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment {
    pub mines: Vec<bool>,
}

impl Assignment {
    pub fn is_mine(&self, index: usize) -> bool {
        self.mines[index]
    }

    pub fn mine_count(&self) -> usize {
        self.mines.iter().filter(|&&m| m).count()
    }
}

/// Estimated mine probability for one unresolved cell.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellProbability {
    pub cell: Cell,
    pub probability: f64,
}
