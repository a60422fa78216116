//! Tier (d): exhaustive per-component constraint satisfaction.
//!
//! Assignments are enumerated as k-combinations of a component's cell
//! list, validated against every constraint exactly, and capped to keep
//! pathological components from blowing up. Components too large for
//! exact search degrade to a row-local relaxation; components above the
//! relaxation limit are skipped entirely.

use std::collections::HashMap;

use itertools::Itertools;

use crate::board::BoardSnapshot;
use crate::config::SolverConfig;
use crate::rules;
use crate::types::{Assignment, Cell, Component, Move};

/// Result of enumerating one component.
#[derive(Clone, Debug, Default)]
pub struct SearchOutcome {
    /// Assignments satisfying every constraint in the component.
    pub assignments: Vec<Assignment>,
    /// True if the cap was hit; classifications and frequencies derived
    /// from a truncated outcome are approximate.
    pub truncated: bool,
}

impl SearchOutcome {
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

/// Enumerate every valid assignment for `component`, trying mine counts
/// from the constraint-implied lower bound up to the upper bound, capped
/// by the global remaining-mine estimate. Stops once `cap` assignments
/// are retained.
pub fn enumerate_assignments(
    component: &Component,
    remaining_mines: usize,
    cap: usize,
) -> SearchOutcome {
    let n = component.cells.len();
    let index_of: HashMap<Cell, usize> = component
        .cells
        .iter()
        .enumerate()
        .map(|(i, &c)| (c, i))
        .collect();

    // Constraints as index sets over the component's cell list.
    let indexed: Vec<(Vec<usize>, usize)> = component
        .constraints
        .iter()
        .map(|c| {
            let indices = c.cells.iter().map(|cell| index_of[cell]).collect();
            (indices, c.required)
        })
        .collect();

    let min_k = component.min_mines();
    let max_k = component.max_mines().min(remaining_mines);

    let mut outcome = SearchOutcome::default();
    if min_k > max_k {
        // No mine count can satisfy the constraints within the estimate.
        return outcome;
    }

    'counts: for k in min_k..=max_k {
        for combo in (0..n).combinations(k) {
            let mut mines = vec![false; n];
            for i in combo {
                mines[i] = true;
            }

            let satisfies = indexed.iter().all(|(indices, required)| {
                indices.iter().filter(|&&i| mines[i]).count() == *required
            });
            if satisfies {
                outcome.assignments.push(Assignment { mines });
                if outcome.assignments.len() >= cap {
                    outcome.truncated = true;
                    break 'counts;
                }
            }
        }
    }

    outcome
}

/// Certain-mine / certain-safe classification: a cell is a mine iff it is
/// one in every retained assignment, safe iff in none. Mixed cells stay
/// unresolved. An empty outcome classifies nothing.
pub fn classify(component: &Component, outcome: &SearchOutcome) -> Vec<Move> {
    if outcome.is_empty() {
        return Vec::new();
    }

    let mut moves = Vec::new();
    for (i, &cell) in component.cells.iter().enumerate() {
        let always_mine = outcome.assignments.iter().all(|a| a.is_mine(i));
        let never_mine = outcome.assignments.iter().all(|a| !a.is_mine(i));

        if always_mine {
            moves.push(Move::flag(cell));
        } else if never_mine {
            moves.push(Move::reveal(cell));
        }
    }
    moves
}

/// Relaxation for components above the exact-search limit: row-local
/// saturation over the component's constraints. A strict subset of what
/// exact search would conclude, never incorrect, linear time.
pub fn relaxation_moves(component: &Component) -> Vec<Move> {
    rules::saturation_moves(&component.constraints)
}

/// Endgame shortcut: with at most a handful of unresolved cells left, a
/// direct per-cell feasibility check against each cell's revealed
/// numbered neighbors is cheaper than the partition/search pipeline.
pub fn endgame_moves(board: &BoardSnapshot, config: &SolverConfig) -> Vec<Move> {
    let unresolved = board.unresolved_cells();
    if unresolved.is_empty() || unresolved.len() > config.endgame_limit {
        return Vec::new();
    }

    let mut moves = Vec::new();
    for &cell in &unresolved {
        for &neighbor in board.neighbors(cell) {
            let Some(value) = board.revealed_value(neighbor) else {
                continue;
            };
            if value == 0 {
                continue;
            }
            let flagged = board.flagged_neighbor_count(neighbor);
            let open = board.unresolved_neighbors(neighbor);
            let remaining = (value as usize).saturating_sub(flagged);

            if remaining == 0 {
                moves.push(Move::reveal(cell));
                break;
            }
            if remaining == open.len() {
                moves.push(Move::flag(cell));
                break;
            }
        }
    }

    rules::dedupe(moves)
}
