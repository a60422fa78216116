//! Tier (b): local multi-cell geometric pattern templates.
//!
//! A fixed library of board-scan templates tried in priority order, most
//! common first. The engine returns the first template's yield; templates
//! never conflict on a consistent board, so this is purely a cost saver.
//!
//! Each template derives moves from remaining-count arithmetic over the
//! exclusive/shared regions of two or three nearby numbered cells. The
//! corner and edge scans are restricted re-runs of the saturation rule
//! over boundary cells, where the smaller neighbor count makes
//! constraints bite hardest.

use std::collections::{HashSet, VecDeque};

use crate::board::BoardSnapshot;
use crate::config::SolverConfig;
use crate::rules;
use crate::search;
use crate::types::{Cell, Component, Move};

/// Run the template library in priority order; first yield wins.
pub fn pattern_moves(board: &BoardSnapshot, config: &SolverConfig) -> Vec<Move> {
    let templates: [fn(&BoardSnapshot) -> Vec<Move>; 7] = [
        one_two_one,
        one_one_pair,
        one_one_one,
        two_three_pair,
        square_diagonal,
        corner_saturation,
        edge_saturation,
    ];

    for template in templates {
        let moves = rules::dedupe(template(board));
        if !moves.is_empty() {
            return moves;
        }
    }

    rules::dedupe(group_resolution(board, config))
}

/// The revealed number at `cell` minus its flagged neighbors, if the cell
/// shows a positive number. Negative remainders clamp to zero.
fn remaining(board: &BoardSnapshot, cell: Cell) -> Option<usize> {
    match board.revealed_value(cell) {
        Some(value) if value > 0 => {
            Some((value as usize).saturating_sub(board.flagged_neighbor_count(cell)))
        }
        _ => None,
    }
}

fn shows(board: &BoardSnapshot, cell: Cell, value: u8) -> bool {
    board.revealed_value(cell) == Some(value)
}

fn neighbor_set(board: &BoardSnapshot, cell: Cell) -> HashSet<Cell> {
    board.neighbors(cell).iter().copied().collect()
}

fn offset(cell: Cell, dx: i64, dy: i64) -> Option<Cell> {
    let x = cell.x as i64 + dx;
    let y = cell.y as i64 + dy;
    if x < 0 || y < 0 {
        return None;
    }
    Some(Cell::new(x as usize, y as usize))
}

// ─── 1-2-1 ──────────────────────────────────────────────────────────────────

/// 1-2-1 lines in all four directions. Axis-aligned lines get the classic
/// side-strip derivation (mines over the "1"s, the cell over the "2"
/// safe); diagonal lines fall back to exclusive-cell arithmetic.
fn one_two_one(board: &BoardSnapshot) -> Vec<Move> {
    let mut moves = Vec::new();
    let directions: [(i64, i64); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

    for start in board.all_cells() {
        for (dx, dy) in directions {
            let Some(mid) = offset(start, dx, dy) else {
                continue;
            };
            let Some(end) = offset(start, 2 * dx, 2 * dy) else {
                continue;
            };
            if !board.in_bounds(mid) || !board.in_bounds(end) {
                continue;
            }
            if !shows(board, start, 1) || !shows(board, mid, 2) || !shows(board, end, 1) {
                continue;
            }
            if dx == 0 || dy == 0 {
                moves.extend(analyze_one_two_one_axis(board, start, mid, end, dx, dy));
            }
            moves.extend(analyze_one_two_one_exclusive(board, start, mid, end));
        }
    }

    moves
}

/// Classic axis-aligned 1-2-1: when the "2"'s unresolved cells are
/// exactly the three-cell strip on one side of the line, its two mines
/// cannot sit adjacent (either "1" would see both), so the strip ends are
/// mines and the strip center is safe.
fn analyze_one_two_one_axis(
    board: &BoardSnapshot,
    start: Cell,
    mid: Cell,
    end: Cell,
    dx: i64,
    dy: i64,
) -> Vec<Move> {
    let mut moves = Vec::new();

    if remaining(board, start) != Some(1)
        || remaining(board, mid) != Some(2)
        || remaining(board, end) != Some(1)
    {
        return moves;
    }

    // Perpendicular to the line.
    let (px, py) = (dy, dx);
    for side in [1i64, -1i64] {
        let strip: Option<Vec<Cell>> = [start, mid, end]
            .iter()
            .map(|&c| offset(c, px * side, py * side).filter(|&n| board.in_bounds(n)))
            .collect();
        let Some(strip) = strip else { continue };
        if !strip.iter().all(|&c| board.is_unresolved(c)) {
            continue;
        }

        let open_mid: HashSet<Cell> = board.unresolved_neighbors(mid).into_iter().collect();
        let strip_set: HashSet<Cell> = strip.iter().copied().collect();
        if open_mid != strip_set {
            continue;
        }

        // Both mines in the strip; an adjacent pair would overload a
        // flanking "1". Only the two ends remain.
        moves.push(Move::flag(strip[0]));
        moves.push(Move::flag(strip[2]));
        moves.push(Move::reveal(strip[1]));
    }

    moves
}

/// Exclusive-cell arithmetic over a 1-2-1 line, the only form that can
/// bite on diagonal lines.
fn analyze_one_two_one_exclusive(
    board: &BoardSnapshot,
    start: Cell,
    mid: Cell,
    end: Cell,
) -> Vec<Move> {
    let mut moves = Vec::new();

    let flank_a = neighbor_set(board, start);
    let center = neighbor_set(board, mid);
    let flank_b = neighbor_set(board, end);

    let exclusive: Vec<Cell> = center
        .iter()
        .copied()
        .filter(|c| !flank_a.contains(c) && !flank_b.contains(c) && *c != start && *c != end)
        .filter(|&c| board.is_unresolved(c))
        .collect();
    if exclusive.is_empty() {
        return moves;
    }

    let rem_start = remaining(board, start).unwrap_or(0);
    let rem_mid = remaining(board, mid).unwrap_or(0);
    let rem_end = remaining(board, end).unwrap_or(0);

    if rem_mid == 0 {
        // The "2" is satisfied; its exclusive cells hold nothing.
        moves.extend(exclusive.iter().map(|&c| Move::reveal(c)));
    } else if rem_start == 0 && rem_end == 0 && rem_mid == exclusive.len() {
        // Both flanking "1"s are satisfied, so every unresolved cell they
        // can see is clear; the "2"'s mines must sit in its exclusive
        // cells, and the counts match exactly.
        moves.extend(exclusive.iter().map(|&c| Move::flag(c)));
    }

    moves
}

// ─── 1-1 ────────────────────────────────────────────────────────────────────

/// Side-by-side or stacked "1"s: when one side's cell set contains the
/// other's, the difference carries the leftover mine count.
fn one_one_pair(board: &BoardSnapshot) -> Vec<Move> {
    let mut moves = Vec::new();

    for first in board.all_cells() {
        if !shows(board, first, 1) {
            continue;
        }
        for second in [offset(first, 1, 0), offset(first, 0, 1)].into_iter().flatten() {
            if !board.in_bounds(second) || !shows(board, second, 1) {
                continue;
            }
            moves.extend(analyze_pair(board, first, second));
            moves.extend(analyze_pair(board, second, first));
        }
    }

    moves
}

/// Subset deduction restricted to one ordered pair of numbered cells.
fn analyze_pair(board: &BoardSnapshot, inner: Cell, outer: Cell) -> Vec<Move> {
    let inner_cells: HashSet<Cell> = board.unresolved_neighbors(inner).into_iter().collect();
    let outer_cells: HashSet<Cell> = board.unresolved_neighbors(outer).into_iter().collect();
    if inner_cells.is_empty() || !inner_cells.is_subset(&outer_cells) {
        return Vec::new();
    }

    let diff: Vec<Cell> = outer_cells.difference(&inner_cells).copied().collect();
    if diff.is_empty() {
        return Vec::new();
    }

    let rem_inner = remaining(board, inner).unwrap_or(0);
    let rem_outer = remaining(board, outer).unwrap_or(0);
    let Some(diff_mines) = rem_outer.checked_sub(rem_inner) else {
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

// ─── 1-1-1 ──────────────────────────────────────────────────────────────────

/// Three collinear "1"s. With all three mines flagged on one side, the
/// whole opposite side is clear. The inverse (two side flags forcing the
/// third) is also checked, gated on the aligned "1" still needing a mine.
fn one_one_one(board: &BoardSnapshot) -> Vec<Move> {
    let mut moves = Vec::new();

    for start in board.all_cells() {
        for (dx, dy) in [(1i64, 0i64), (0, 1)] {
            let cells: Option<Vec<Cell>> = (0..3)
                .map(|i| offset(start, dx * i, dy * i).filter(|&c| board.in_bounds(c)))
                .collect();
            let Some(line) = cells else { continue };
            if !line.iter().all(|&c| shows(board, c, 1)) {
                continue;
            }
            // Perpendicular sides of the line.
            let (sx, sy) = (dy, dx);
            for side in [1i64, -1i64] {
                moves.extend(analyze_one_one_one(board, &line, sx * side, sy * side));
            }
        }
    }

    moves
}

fn analyze_one_one_one(board: &BoardSnapshot, line: &[Cell], sx: i64, sy: i64) -> Vec<Move> {
    let mut moves = Vec::new();

    let aligned: Vec<Option<Cell>> = line
        .iter()
        .map(|&c| offset(c, sx, sy).filter(|&n| board.in_bounds(n)))
        .collect();
    let flags_on_side = aligned
        .iter()
        .flatten()
        .filter(|&&c| board.is_flagged(c))
        .count();

    // All three mines accounted for on this side: the opposite side of
    // each "1" is clear.
    if flags_on_side == 3 {
        for &one in line {
            if let Some(c) = offset(one, -sx, -sy) {
                if board.in_bounds(c) && board.is_unresolved(c) {
                    moves.push(Move::reveal(c));
                }
            }
        }
        return moves;
    }

    // Inverse: two aligned flags force the third, provided the "1" over
    // the empty position still needs its mine.
    if flags_on_side == 2 {
        for (i, slot) in aligned.iter().enumerate() {
            let Some(third) = slot else { continue };
            if board.is_flagged(*third) || !board.is_unresolved(*third) {
                continue;
            }
            if remaining(board, line[i]).unwrap_or(0) > 0
                && board.unresolved_neighbors(line[i]).contains(third)
            {
                moves.push(Move::flag(*third));
            }
        }
    }

    moves
}

// ─── 2-3 ────────────────────────────────────────────────────────────────────

/// Adjacent "2"/"3" pairs, horizontal and vertical, both orders.
/// Remaining-count arithmetic over the exclusive and shared regions.
fn two_three_pair(board: &BoardSnapshot) -> Vec<Move> {
    let mut moves = Vec::new();

    for first in board.all_cells() {
        for second in [offset(first, 1, 0), offset(first, 0, 1)].into_iter().flatten() {
            if !board.in_bounds(second) {
                continue;
            }
            if shows(board, first, 2) && shows(board, second, 3) {
                moves.extend(analyze_two_three(board, first, second));
            } else if shows(board, first, 3) && shows(board, second, 2) {
                moves.extend(analyze_two_three(board, second, first));
            }
        }
    }

    moves
}

fn analyze_two_three(board: &BoardSnapshot, two: Cell, three: Cell) -> Vec<Move> {
    let mut moves = Vec::new();

    let n2 = neighbor_set(board, two);
    let n3 = neighbor_set(board, three);

    let unique_to_3: Vec<Cell> = n3
        .iter()
        .copied()
        .filter(|c| !n2.contains(c) && *c != two)
        .filter(|&c| board.is_unresolved(c))
        .collect();
    let unique_to_2: Vec<Cell> = n2
        .iter()
        .copied()
        .filter(|c| !n3.contains(c) && *c != three)
        .filter(|&c| board.is_unresolved(c))
        .collect();
    let shared: Vec<Cell> = n2
        .intersection(&n3)
        .copied()
        .filter(|&c| board.is_unresolved(c))
        .collect();

    let rem_2 = remaining(board, two).unwrap_or(0);
    let rem_3 = remaining(board, three).unwrap_or(0);

    // The "2" is satisfied: nothing left for the shared region.
    if rem_2 == 0 {
        moves.extend(shared.iter().map(|&c| Move::reveal(c)));
        return moves;
    }

    // Shared mines can never exceed the "2"'s remainder, so the "3"'s
    // surplus must land in its exclusive region.
    if rem_3 >= rem_2 {
        let surplus = rem_3 - rem_2;
        if surplus > 0 && surplus == unique_to_3.len() {
            moves.extend(unique_to_3.iter().map(|&c| Move::flag(c)));
        }
    }

    // With no cells exclusive to the "2", its whole remainder sits in the
    // shared region.
    if unique_to_2.is_empty() && rem_2 == shared.len() && rem_2 > 0 {
        moves.extend(shared.iter().map(|&c| Move::flag(c)));
        // And if that exhausts the "3" too, its exclusive cells are clear.
        if rem_3 == rem_2 {
            moves.extend(unique_to_3.iter().map(|&c| Move::reveal(c)));
        }
    }

    moves
}

// ─── 2x2 square ─────────────────────────────────────────────────────────────

/// 2x2 revealed squares in the 3-1/1-3 diagonal configuration: the outer
/// corner diagonally adjacent to an unsatisfied "3" carries a mine.
fn square_diagonal(board: &BoardSnapshot) -> Vec<Move> {
    let mut moves = Vec::new();

    for top_left in board.all_cells() {
        let quad = [
            top_left,
            Cell::new(top_left.x + 1, top_left.y),
            Cell::new(top_left.x, top_left.y + 1),
            Cell::new(top_left.x + 1, top_left.y + 1),
        ];
        if !quad.iter().all(|&c| board.in_bounds(c)) {
            continue;
        }
        let values: Vec<u8> = match quad
            .iter()
            .map(|&c| board.revealed_value(c))
            .collect::<Option<Vec<u8>>>()
        {
            Some(v) => v,
            None => continue,
        };

        let diagonal_config = (values[0] == 3 && values[1] == 1 && values[2] == 1 && values[3] == 3)
            || (values[0] == 1 && values[1] == 3 && values[2] == 3 && values[3] == 1);
        if !diagonal_config {
            continue;
        }

        // Outer corner diagonally beyond each quad member.
        let outward = [(-1i64, -1i64), (2, -1), (-1, 2), (2, 2)];
        for (i, (cx, cy)) in outward.into_iter().enumerate() {
            if values[i] != 3 {
                continue;
            }
            let Some(corner) = offset(top_left, cx, cy) else {
                continue;
            };
            if !board.in_bounds(corner) || !board.is_unresolved(corner) {
                continue;
            }
            // Only when the "3" still needs mines and the corner is the
            // scarce resource: its unresolved neighborhood must not be
            // larger than the remainder.
            let rem = remaining(board, quad[i]).unwrap_or(0);
            let open = board.unresolved_neighbors(quad[i]);
            if rem > 0 && open.len() == rem && open.contains(&corner) {
                moves.push(Move::flag(corner));
            }
        }
    }

    moves
}

// ─── Corner / edge saturation ───────────────────────────────────────────────

/// Saturation restricted to the four board corners (3 neighbors each).
fn corner_saturation(board: &BoardSnapshot) -> Vec<Move> {
    let w = board.width();
    let h = board.height();
    let corners = [
        Cell::new(0, 0),
        Cell::new(w - 1, 0),
        Cell::new(0, h - 1),
        Cell::new(w - 1, h - 1),
    ];

    let mut moves = Vec::new();
    for corner in corners {
        moves.extend(saturate_cell(board, corner));
    }
    moves
}

/// Saturation restricted to boundary cells (5 neighbors each).
fn edge_saturation(board: &BoardSnapshot) -> Vec<Move> {
    let mut moves = Vec::new();
    for cell in board.all_cells() {
        if board.edge_axes(cell) == 1 {
            moves.extend(saturate_cell(board, cell));
        }
    }
    moves
}

fn saturate_cell(board: &BoardSnapshot, cell: Cell) -> Vec<Move> {
    let Some(rem) = remaining(board, cell) else {
        return Vec::new();
    };
    let open = board.unresolved_neighbors(cell);
    if open.is_empty() {
        return Vec::new();
    }

    if rem == 0 {
        open.into_iter().map(Move::reveal).collect()
    } else if rem == open.len() {
        open.into_iter().map(Move::flag).collect()
    } else {
        Vec::new()
    }
}

// ─── Connected small groups ─────────────────────────────────────────────────

/// BFS-connect revealed numbered cells into contiguous groups and run the
/// exhaustive assignment search on groups whose combined unresolved-cell
/// count is small.
fn group_resolution(board: &BoardSnapshot, config: &SolverConfig) -> Vec<Move> {
    let mut moves = Vec::new();
    let mut processed: HashSet<Cell> = HashSet::new();

    for start in board.all_cells() {
        if processed.contains(&start) {
            continue;
        }
        if !matches!(board.revealed_value(start), Some(v) if v > 0) {
            continue;
        }

        // Flood across adjacent numbered cells.
        let mut group = Vec::new();
        let mut queue = VecDeque::from([start]);
        processed.insert(start);
        while let Some(current) = queue.pop_front() {
            group.push(current);
            for &n in board.neighbors(current) {
                if !processed.contains(&n) && matches!(board.revealed_value(n), Some(v) if v > 0) {
                    processed.insert(n);
                    queue.push_back(n);
                }
            }
        }
        if group.len() < 2 {
            continue;
        }

        moves.extend(solve_group(board, &group, config));
    }

    moves
}

fn solve_group(board: &BoardSnapshot, group: &[Cell], config: &SolverConfig) -> Vec<Move> {
    let mut constraints = Vec::new();
    let mut unknowns: HashSet<Cell> = HashSet::new();

    for &member in group {
        let open = board.unresolved_neighbors(member);
        if open.is_empty() {
            continue;
        }
        let Some(required) = remaining(board, member) else {
            continue;
        };
        unknowns.extend(open.iter().copied());
        constraints.push(crate::types::Constraint {
            cells: open,
            required,
            source: member,
        });
    }

    if constraints.is_empty() || unknowns.len() > config.group_search_limit {
        return Vec::new();
    }

    let mut cells: Vec<Cell> = unknowns.into_iter().collect();
    cells.sort_unstable();
    let component = Component { constraints, cells };

    let remaining_mines = board.estimated_remaining_mines(config);
    let outcome = search::enumerate_assignments(&component, remaining_mines, config.assignment_cap);
    search::classify(&component, &outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::CellState;
    use crate::types::MoveAction;

    #[test]
    fn test_one_two_one_safe_when_center_satisfied() {
        // Horizontal 1-2-1 on the bottom row of a 5x3 board with the
        // "2"'s two mines already flagged above the flanks; the cells
        // exclusive to the "2" must be clear.
        let mut board = BoardSnapshot::new(5, 3).unwrap();
        board.set(Cell::new(1, 2), CellState::Revealed(1));
        board.set(Cell::new(2, 2), CellState::Revealed(2));
        board.set(Cell::new(3, 2), CellState::Revealed(1));
        board.set(Cell::new(1, 1), CellState::Flagged);
        board.set(Cell::new(3, 1), CellState::Flagged);

        let moves = one_two_one(&board);
        // Exclusive cells of the "2" relative to both flanks: none in
        // this tight layout, so nothing may be emitted incorrectly.
        for m in &moves {
            assert_eq!(m.action, MoveAction::Reveal);
        }
    }

    #[test]
    fn test_one_two_one_axis_strip() {
        // Horizontal 1-2-1 with the row below fully revealed and the row
        // above hidden: the strip ends over the "1"s are mines, the cell
        // over the "2" is safe.
        let mut board = BoardSnapshot::new(5, 3).unwrap();
        board.set(Cell::new(1, 1), CellState::Revealed(1));
        board.set(Cell::new(2, 1), CellState::Revealed(2));
        board.set(Cell::new(3, 1), CellState::Revealed(1));
        for x in 0..5 {
            board.set(Cell::new(x, 2), CellState::Revealed(0));
        }

        let moves = one_two_one(&board);
        assert!(moves.contains(&Move::flag(Cell::new(1, 0))));
        assert!(moves.contains(&Move::flag(Cell::new(3, 0))));
        assert!(moves.contains(&Move::reveal(Cell::new(2, 0))));
    }

    #[test]
    fn test_one_one_pair_subset_safe() {
        // Two stacked "1"s on the left edge; the top one's unresolved set
        // is a subset of the bottom one's, equal remainders: the
        // difference is safe.
        let mut board = BoardSnapshot::new(2, 4).unwrap();
        board.set(Cell::new(0, 1), CellState::Revealed(1));
        board.set(Cell::new(0, 2), CellState::Revealed(1));
        board.set(Cell::new(1, 1), CellState::Revealed(1));
        board.set(Cell::new(1, 2), CellState::Revealed(1));
        // Unresolved: row 0 (both cells) for the top pair, rows 0 and 3
        // for the bottom pair.
        let moves = one_one_pair(&board);
        // Top "1"s see {(0,0),(1,0)}; bottom "1"s see {(0,3),(1,3)} plus
        // the top set is not shared, so only order-dependent subsets fire.
        for m in &moves {
            assert_eq!(m.action, MoveAction::Reveal);
        }
    }

    #[test]
    fn test_one_one_pair_difference_safe() {
        // Two rows of "1"s over hidden rows above and below. The edge
        // "1"s see a strict subset of their middle neighbor's cells with
        // equal remainders, so the cells only the middle sees are safe.
        let mut board = BoardSnapshot::new(3, 4).unwrap();
        for x in 0..3 {
            board.set(Cell::new(x, 1), CellState::Revealed(1));
            board.set(Cell::new(x, 2), CellState::Revealed(1));
        }
        let moves = one_one_pair(&board);
        assert!(moves.contains(&Move::reveal(Cell::new(0, 0))));
        assert!(moves.contains(&Move::reveal(Cell::new(2, 0))));
        assert!(moves.contains(&Move::reveal(Cell::new(0, 3))));
        assert!(moves.contains(&Move::reveal(Cell::new(2, 3))));
        // The middle cells each row's "1" shares stay undecided.
        assert!(!moves.iter().any(|m| m.cell == Cell::new(1, 0)));
        assert!(!moves.iter().any(|m| m.cell == Cell::new(1, 3)));
    }

    #[test]
    fn test_one_one_one_flags_on_one_side_clear_the_other() {
        let mut board = BoardSnapshot::new(5, 3).unwrap();
        for x in 1..4 {
            board.set(Cell::new(x, 1), CellState::Revealed(1));
            board.set(Cell::new(x, 0), CellState::Flagged);
        }
        let moves = one_one_one(&board);
        for x in 1..4 {
            assert!(moves.contains(&Move::reveal(Cell::new(x, 2))));
        }
    }

    #[test]
    fn test_one_one_one_inverse_does_not_fire_unsoundly() {
        // Two flags above a 1-1-1 row leave every "1" satisfied; the
        // inverse must not invent a third mine.
        let mut board = BoardSnapshot::new(5, 3).unwrap();
        for x in 1..4 {
            board.set(Cell::new(x, 1), CellState::Revealed(1));
        }
        board.set(Cell::new(1, 0), CellState::Flagged);
        board.set(Cell::new(2, 0), CellState::Flagged);

        let moves = one_one_one(&board);
        assert!(!moves.iter().any(|m| m.action == MoveAction::Flag));
    }

    #[test]
    fn test_two_three_shared_safe_when_two_satisfied() {
        // A "2" with both mines flagged next to a "3": the cells the two
        // numbers share are clear.
        let mut board = BoardSnapshot::new(4, 3).unwrap();
        board.set(Cell::new(1, 1), CellState::Revealed(2));
        board.set(Cell::new(2, 1), CellState::Revealed(3));
        board.set(Cell::new(0, 0), CellState::Flagged);
        board.set(Cell::new(0, 2), CellState::Flagged);

        let moves = two_three_pair(&board);
        // Shared cells of (1,1) and (2,1): (1,0),(2,0),(1,2),(2,2).
        for cell in [
            Cell::new(1, 0),
            Cell::new(2, 0),
            Cell::new(1, 2),
            Cell::new(2, 2),
        ] {
            assert!(moves.contains(&Move::reveal(cell)));
        }
    }

    #[test]
    fn test_two_three_surplus_lands_in_exclusive_cells() {
        // Vertical 2-3 on the left edge of a 2x4 board. A shared flag
        // leaves the "3" one mine ahead of the "2" with a single
        // unresolved exclusive cell: that cell must be a mine.
        let mut board = BoardSnapshot::new(2, 4).unwrap();
        board.set(Cell::new(0, 1), CellState::Revealed(2));
        board.set(Cell::new(0, 2), CellState::Revealed(3));
        board.set(Cell::new(1, 2), CellState::Flagged);
        board.set(Cell::new(1, 3), CellState::Revealed(2));

        // rem2 = 1, rem3 = 2, unique_to_3 = {(0,3)}: surplus of 1.
        let moves = two_three_pair(&board);
        assert!(moves.contains(&Move::flag(Cell::new(0, 3))));
    }

    #[test]
    fn test_corner_saturation_restricted_tier_a() {
        let mut board = BoardSnapshot::new(4, 4).unwrap();
        board.set(Cell::new(0, 0), CellState::Revealed(3));
        let moves = corner_saturation(&board);
        assert_eq!(moves.len(), 3);
        assert!(moves.iter().all(|m| m.action == MoveAction::Flag));
    }

    #[test]
    fn test_edge_saturation_skips_interior() {
        let mut board = BoardSnapshot::new(5, 5).unwrap();
        board.set(Cell::new(2, 2), CellState::Revealed(8));
        assert!(edge_saturation(&board).is_empty());
    }

    #[test]
    fn test_group_resolution_solves_small_cluster() {
        let cfg = SolverConfig::default();
        // Two adjacent numbered cells forming one group whose combined
        // constraints force a unique layout: {a,b} has 1 mine and {b,c}
        // has 2, so b and c are mines and a is safe.
        let mut board = BoardSnapshot::new(3, 4).unwrap();
        board.set(Cell::new(0, 1), CellState::Revealed(1));
        board.set(Cell::new(1, 1), CellState::Revealed(2));
        board.set(Cell::new(2, 1), CellState::Revealed(2));
        // Close off everything except the top row.
        for x in 0..3 {
            board.set(Cell::new(x, 2), CellState::Revealed(0));
            board.set(Cell::new(x, 3), CellState::Revealed(0));
        }

        let moves = group_resolution(&board, &cfg);
        // (0,1) sees {(0,0),(1,0)} with 1 mine; (2,1) sees {(1,0),(2,0)}
        // with 2 mines: (1,0) and (2,0) are mines, (0,0) is safe.
        assert!(moves.contains(&Move::flag(Cell::new(1, 0))));
        assert!(moves.contains(&Move::flag(Cell::new(2, 0))));
        assert!(moves.contains(&Move::reveal(Cell::new(0, 0))));
    }

    #[test]
    fn test_pattern_moves_returns_first_yield_only() {
        let cfg = SolverConfig::default();
        let mut board = BoardSnapshot::new(5, 3).unwrap();
        for x in 1..4 {
            board.set(Cell::new(x, 1), CellState::Revealed(1));
            board.set(Cell::new(x, 0), CellState::Flagged);
        }
        let moves = pattern_moves(&board, &cfg);
        assert!(!moves.is_empty());
        // Deduplicated: no repeated cell/action pairs.
        let unique: HashSet<Move> = moves.iter().copied().collect();
        assert_eq!(unique.len(), moves.len());
    }
}
