//! Board snapshot and neighbor geometry.
//!
//! A [`BoardSnapshot`] is an immutable-shape, mutable-content view of the
//! external board: flat `Vec` storage in column-major layout
//! (`cells[x * height + y]`). The board source rebuilds it wholesale on
//! every read; the solver never mutates it mid-pass.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use thiserror::Error;

use crate::config::SolverConfig;
use crate::types::Cell;

/// Per-cell state. A cell is in exactly one of these; flag and reveal can
/// never hold simultaneously.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellState {
    /// Not opened, not flagged.
    Hidden,
    /// Marked as a mine candidate.
    Flagged,
    /// Opened, showing an adjacent-mine count 0-8.
    Revealed(u8),
    /// Opened onto a mine. Terminal state, not expected during solving.
    Detonated,
}

/// Structural board errors. Only genuinely malformed shapes raise; every
/// "no deduction possible" condition is an empty result, not an error.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("board dimensions must be non-zero, got {width}x{height}")]
    EmptyDimensions { width: usize, height: usize },
    #[error("expected {expected} cells for a {width}x{height} board, got {got}")]
    CellCountMismatch {
        width: usize,
        height: usize,
        expected: usize,
        got: usize,
    },
    #[error("revealed value {value} at {cell} is out of range 0-8")]
    ValueOutOfRange { cell: Cell, value: u8 },
}

/// Pre-computed 8-directional neighbors for every cell, clipped to the
/// board bounds. Flat storage with per-cell offsets.
#[derive(Clone, Debug)]
struct NeighborCache {
    data: Vec<Cell>,
    /// `offsets[i]..offsets[i + 1]` indexes the neighbors of cell `i`.
    offsets: Vec<usize>,
}

impl NeighborCache {
    fn new(width: usize, height: usize) -> Self {
        let total = width * height;
        let mut data = Vec::with_capacity(total * 8);
        let mut offsets = Vec::with_capacity(total + 1);

        for x in 0..width {
            for y in 0..height {
                offsets.push(data.len());
                for dx in -1i64..=1 {
                    for dy in -1i64..=1 {
                        if dx == 0 && dy == 0 {
                            continue;
                        }
                        let nx = x as i64 + dx;
                        let ny = y as i64 + dy;
                        if nx >= 0 && nx < width as i64 && ny >= 0 && ny < height as i64 {
                            data.push(Cell::new(nx as usize, ny as usize));
                        }
                    }
                }
            }
        }
        offsets.push(data.len()); // sentinel

        Self { data, offsets }
    }

    fn get(&self, index: usize) -> &[Cell] {
        &self.data[self.offsets[index]..self.offsets[index + 1]]
    }
}

/// One pass's view of the board.
#[derive(Clone, Debug)]
pub struct BoardSnapshot {
    width: usize,
    height: usize,
    cells: Vec<CellState>,
    neighbors: NeighborCache,
}

impl BoardSnapshot {
    /// A fully hidden board.
    pub fn new(width: usize, height: usize) -> Result<Self, BoardError> {
        Self::from_cells(width, height, vec![CellState::Hidden; width * height])
    }

    /// Build a snapshot from column-major cell states
    /// (`cells[x * height + y]`).
    pub fn from_cells(
        width: usize,
        height: usize,
        cells: Vec<CellState>,
    ) -> Result<Self, BoardError> {
        if width == 0 || height == 0 {
            return Err(BoardError::EmptyDimensions { width, height });
        }
        if cells.len() != width * height {
            return Err(BoardError::CellCountMismatch {
                width,
                height,
                expected: width * height,
                got: cells.len(),
            });
        }
        for (i, state) in cells.iter().enumerate() {
            if let CellState::Revealed(value) = state {
                if *value > 8 {
                    return Err(BoardError::ValueOutOfRange {
                        cell: Cell::new(i / height, i % height),
                        value: *value,
                    });
                }
            }
        }
        Ok(Self {
            width,
            height,
            cells,
            neighbors: NeighborCache::new(width, height),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x < self.width && cell.y < self.height
    }

    #[inline]
    fn index(&self, cell: Cell) -> usize {
        cell.x * self.height + cell.y
    }

    pub fn get(&self, cell: Cell) -> CellState {
        self.cells[self.index(cell)]
    }

    pub fn set(&mut self, cell: Cell, state: CellState) {
        let index = self.index(cell);
        self.cells[index] = state;
    }

    /// The revealed number at `cell`, if it is revealed.
    pub fn revealed_value(&self, cell: Cell) -> Option<u8> {
        match self.get(cell) {
            CellState::Revealed(value) => Some(value),
            _ => None,
        }
    }

    /// Hidden and unflagged: still subject to deduction.
    pub fn is_unresolved(&self, cell: Cell) -> bool {
        self.get(cell) == CellState::Hidden
    }

    pub fn is_flagged(&self, cell: Cell) -> bool {
        self.get(cell) == CellState::Flagged
    }

    /// Pre-computed in-bounds neighbors of `cell`.
    pub fn neighbors(&self, cell: Cell) -> &[Cell] {
        self.neighbors.get(self.index(cell))
    }

    /// Hidden, unflagged neighbors of `cell`.
    pub fn unresolved_neighbors(&self, cell: Cell) -> Vec<Cell> {
        self.neighbors(cell)
            .iter()
            .copied()
            .filter(|&n| self.is_unresolved(n))
            .collect()
    }

    pub fn flagged_neighbor_count(&self, cell: Cell) -> usize {
        self.neighbors(cell)
            .iter()
            .filter(|&&n| self.is_flagged(n))
            .count()
    }

    /// Iterate all coordinates, column-major.
    pub fn all_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.width).flat_map(move |x| (0..self.height).map(move |y| Cell::new(x, y)))
    }

    pub fn revealed_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|s| matches!(s, CellState::Revealed(_) | CellState::Detonated))
            .count()
    }

    pub fn flagged_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|&&s| s == CellState::Flagged)
            .count()
    }

    pub fn unresolved_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|&&s| s == CellState::Hidden)
            .count()
    }

    pub fn unresolved_cells(&self) -> Vec<Cell> {
        self.all_cells().filter(|&c| self.is_unresolved(c)).collect()
    }

    /// Fraction of the board that is revealed or flagged.
    pub fn completion(&self) -> f64 {
        let known = self.revealed_count() + self.flagged_count();
        known as f64 / (self.width * self.height) as f64
    }

    /// Hidden, unflagged cells adjacent to at least one revealed
    /// numbered cell.
    pub fn frontier(&self) -> Vec<Cell> {
        self.all_cells()
            .filter(|&c| self.is_frontier_cell(c))
            .collect()
    }

    pub fn is_frontier_cell(&self, cell: Cell) -> bool {
        self.is_unresolved(cell)
            && self
                .neighbors(cell)
                .iter()
                .any(|&n| matches!(self.get(n), CellState::Revealed(v) if v > 0))
    }

    /// How many board-edge axes the cell touches: 0 interior, 1 edge,
    /// 2 corner.
    pub fn edge_axes(&self, cell: Cell) -> usize {
        let on_x = cell.x == 0 || cell.x == self.width - 1;
        let on_y = cell.y == 0 || cell.y == self.height - 1;
        on_x as usize + on_y as usize
    }

    pub fn is_edge_cell(&self, cell: Cell) -> bool {
        self.edge_axes(cell) > 0
    }

    /// Estimated mine total for this board shape. The actual count is
    /// never authoritatively known to the solver; standard difficulty
    /// tiers are assumed, with a density heuristic for other shapes.
    pub fn estimated_total_mines(&self, config: &SolverConfig) -> usize {
        match (self.width, self.height) {
            (9, 9) => 10,
            (16, 16) => 40,
            (30, 16) | (16, 30) => 99,
            (w, h) => ((w * h) as f64 * config.fallback_mine_density).round() as usize,
        }
    }

    /// Mines estimated to still be unflagged on the board.
    pub fn estimated_remaining_mines(&self, config: &SolverConfig) -> usize {
        self.estimated_total_mines(config)
            .saturating_sub(self.flagged_count())
    }

    /// Deterministic hash of the full board content, recomputed at the
    /// start of every pass and used as the cache key.
    pub fn content_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.width.hash(&mut hasher);
        self.height.hash(&mut hasher);
        self.cells.hash(&mut hasher);
        hasher.finish()
    }
}
