//! Tier (a) saturation rules and tier (c) pairwise subset deduction.
//!
//! Saturation is O(constraints) and runs first on every pass; subset
//! deduction compares nearby constraint pairs and is tried only after the
//! cheaper tiers came up empty.

use std::collections::HashSet;

use crate::types::{Cell, Constraint, Move};

/// Tier (a): per-constraint saturation.
///
/// `required == 0` makes every cell in the set safe; `required ==
/// cells.len()` makes every cell a mine. Applied to all constraints from
/// the full grid, no partitioning needed.
pub fn saturation_moves(constraints: &[Constraint]) -> Vec<Move> {
    let mut moves = Vec::new();

    for constraint in constraints {
        if constraint.is_saturated_safe() {
            moves.extend(constraint.cells.iter().map(|&c| Move::reveal(c)));
        } else if constraint.is_saturated_mine() {
            moves.extend(constraint.cells.iter().map(|&c| Move::flag(c)));
        }
    }

    dedupe(moves)
}

/// Tier (c): pairwise subset deduction.
///
/// If constraint A's cell set is a strict subset of B's, then B − A must
/// contain exactly `B.required − A.required` mines: zero makes the
/// difference safe, `|B − A|` makes it all mines. Only pairs whose source
/// cells are within a 5x5 window are compared; farther constraints cannot
/// share neighbors.
pub fn subset_moves(constraints: &[Constraint]) -> Vec<Move> {
    let mut moves = Vec::new();

    for i in 0..constraints.len() {
        for j in (i + 1)..constraints.len() {
            let (a, b) = (&constraints[i], &constraints[j]);

            let dx = a.source.x.abs_diff(b.source.x);
            let dy = a.source.y.abs_diff(b.source.y);
            if dx > 2 || dy > 2 {
                continue;
            }

            moves.extend(subset_deduction(a, b));
            moves.extend(subset_deduction(b, a));
        }
    }

    dedupe(moves)
}

/// Deduce moves from `inner ⊂ outer`, if that holds.
fn subset_deduction(inner: &Constraint, outer: &Constraint) -> Vec<Move> {
    if inner.cells.len() >= outer.cells.len() {
        return Vec::new();
    }
    let inner_set: HashSet<Cell> = inner.cells.iter().copied().collect();
    if !inner.cells.iter().all(|c| outer.cells.contains(c)) {
        return Vec::new();
    }

    let diff: Vec<Cell> = outer
        .cells
        .iter()
        .copied()
        .filter(|c| !inner_set.contains(c))
        .collect();
    if diff.is_empty() {
        return Vec::new();
    }

    // Clamped collection can leave outer.required < inner.required on an
    // inconsistent board; stay silent rather than guess.
    let Some(diff_mines) = outer.required.checked_sub(inner.required) else {
        return Vec::new();
    };

    if diff_mines == 0 {
        diff.into_iter().map(Move::reveal).collect()
    } else if diff_mines == diff.len() {
        diff.into_iter().map(Move::flag).collect()
    } else {
        Vec::new()
    }
}

/// Drop duplicate proposals while preserving first-seen order. Distinct
/// tiers may rediscover the same move; the actuator should see it once.
pub(crate) fn dedupe(moves: Vec<Move>) -> Vec<Move> {
    let mut seen: HashSet<Move> = HashSet::new();
    let mut out = Vec::with_capacity(moves.len());
    for m in moves {
        if seen.insert(m) {
            out.push(m);
        }
    }
    out
}
