//! Flag/unflag oscillation detection.
//!
//! Every proposed move is recorded per cell with a timestamp. A cell
//! whose trailing window holds enough entries with alternating actions is
//! marked oscillating: the solver keeps flip-flopping on it without new
//! information. Oscillating cells are suppressed from move output and
//! probability-floored instead of being fought over.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use crate::types::{Cell, Move, MoveAction};

#[derive(Debug)]
pub struct StabilityTracker {
    window: Duration,
    min_entries: usize,
    history: HashMap<Cell, Vec<(Instant, MoveAction)>>,
}

impl StabilityTracker {
    pub fn new(window: Duration, min_entries: usize) -> Self {
        Self {
            window,
            min_entries,
            history: HashMap::new(),
        }
    }

    /// Record a proposal for `cell` at the current time.
    pub fn record(&mut self, cell: Cell, action: MoveAction) {
        self.record_at(cell, action, Instant::now());
    }

    /// Timestamp-explicit variant; `record` delegates here.
    pub fn record_at(&mut self, cell: Cell, action: MoveAction, at: Instant) {
        let entries = self.history.entry(cell).or_default();
        entries.push((at, action));

        // Drop everything that has aged out of the window.
        let window = self.window;
        entries.retain(|(t, _)| at.saturating_duration_since(*t) <= window);
    }

    /// A cell oscillates when its windowed history is long enough and the
    /// recorded actions flipped direction at least twice.
    pub fn is_oscillating(&self, cell: Cell) -> bool {
        self.is_oscillating_at(cell, Instant::now())
    }

    fn is_oscillating_at(&self, cell: Cell, now: Instant) -> bool {
        let Some(entries) = self.history.get(&cell) else {
            return false;
        };

        let recent: Vec<MoveAction> = entries
            .iter()
            .filter(|(t, _)| now.saturating_duration_since(*t) <= self.window)
            .map(|(_, action)| *action)
            .collect();
        if recent.len() < self.min_entries {
            return false;
        }

        let alternations = recent.windows(2).filter(|w| w[0] != w[1]).count();
        alternations >= 2
    }

    /// All currently oscillating cells.
    pub fn oscillating_cells(&self) -> HashSet<Cell> {
        let now = Instant::now();
        self.history
            .keys()
            .copied()
            .filter(|&c| self.is_oscillating_at(c, now))
            .collect()
    }

    /// Filter oscillating cells out of a proposed move batch.
    pub fn suppress(&self, moves: Vec<Move>) -> Vec<Move> {
        let oscillating = self.oscillating_cells();
        moves
            .into_iter()
            .filter(|m| !oscillating.contains(&m.cell))
            .collect()
    }

    /// Forget all history, for a fresh game.
    pub fn clear(&mut self) {
        self.history.clear();
    }
}
