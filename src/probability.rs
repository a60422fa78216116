//! Mine-probability estimation.
//!
//! Two paths feed one ranked list: a CSP-frequency estimate for cells in
//! small searched components (fraction of valid assignments placing a
//! mine there), and a board-density fallback for everything else. A
//! heuristic enhancement pass then adjusts the raw numbers before the
//! list is sorted ascending.

use std::collections::{HashMap, HashSet};

use crate::board::BoardSnapshot;
use crate::config::SolverConfig;
use crate::search::SearchOutcome;
use crate::types::{Cell, CellProbability, Component};

/// Per-cell mine frequency across a component's retained assignments.
/// An empty outcome yields no estimates; the caller falls back to density.
pub fn component_frequencies(
    component: &Component,
    outcome: &SearchOutcome,
) -> Vec<CellProbability> {
    if outcome.is_empty() {
        return Vec::new();
    }

    let total = outcome.assignments.len() as f64;
    component
        .cells
        .iter()
        .enumerate()
        .map(|(i, &cell)| {
            let mines = outcome.assignments.iter().filter(|a| a.is_mine(i)).count();
            CellProbability {
                cell,
                probability: mines as f64 / total,
            }
        })
        .collect()
}

/// Density estimate for every unresolved cell not in `covered`:
/// remaining-mine estimate over unresolved count, dampened per
/// board-edge axis (edge cells border fewer revealable neighbors and
/// historically carry fewer mines per useful reveal).
pub fn density_fallback(
    board: &BoardSnapshot,
    covered: &HashSet<Cell>,
    config: &SolverConfig,
) -> Vec<CellProbability> {
    let unresolved = board.unresolved_count();
    if unresolved == 0 {
        return Vec::new();
    }

    let base =
        (board.estimated_remaining_mines(config) as f64 / unresolved as f64).clamp(0.0, 1.0);

    board
        .unresolved_cells()
        .into_iter()
        .filter(|c| !covered.contains(c))
        .map(|cell| {
            let dampening = config.edge_dampening.powi(board.edge_axes(cell) as i32);
            CellProbability {
                cell,
                probability: base * dampening,
            }
        })
        .collect()
}

/// Heuristic adjustment pass over raw estimates:
/// - early game, soften edge and corner cells further;
/// - push non-frontier estimates away from the uninformative 0.5;
/// - floor cells the stability tracker marks oscillating;
/// - clamp everything back into [0, 1].
pub fn enhance(
    board: &BoardSnapshot,
    estimates: &mut [CellProbability],
    oscillating: &HashSet<Cell>,
    config: &SolverConfig,
) {
    let early_game = board.completion() < config.early_game_fraction;

    for estimate in estimates.iter_mut() {
        let cell = estimate.cell;
        let mut p = estimate.probability;

        if early_game && board.is_edge_cell(cell) {
            p *= config.edge_dampening.powi(board.edge_axes(cell) as i32);
        }

        if !board.is_frontier_cell(cell) {
            p = 0.5 + (p - 0.5) * config.polarization;
        }

        if oscillating.contains(&cell) {
            p = p.max(config.oscillation_risk);
        }

        estimate.probability = p.clamp(0.0, 1.0);
    }
}

/// Sort ascending by probability with a coordinate tie-break, so equal
/// estimates rank deterministically.
pub fn rank(estimates: &mut [CellProbability]) {
    estimates.sort_by(|a, b| {
        a.probability
            .partial_cmp(&b.probability)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.cell.cmp(&b.cell))
    });
}

/// Full estimation pass: CSP frequencies for searched components small
/// enough for the frequency path, density fallback for the rest,
/// enhancement, ranking. `outcomes` is keyed by component index.
pub fn estimate(
    board: &BoardSnapshot,
    components: &[Component],
    outcomes: &HashMap<usize, SearchOutcome>,
    oscillating: &HashSet<Cell>,
    config: &SolverConfig,
) -> Vec<CellProbability> {
    let mut estimates = Vec::new();
    let mut covered: HashSet<Cell> = HashSet::new();

    for (i, component) in components.iter().enumerate() {
        if component.cells.len() > config.probability_search_limit {
            continue;
        }
        let Some(outcome) = outcomes.get(&i) else {
            continue;
        };
        let frequencies = component_frequencies(component, outcome);
        covered.extend(frequencies.iter().map(|e| e.cell));
        estimates.extend(frequencies);
    }

    estimates.extend(density_fallback(board, &covered, config));
    enhance(board, &mut estimates, oscillating, config);
    rank(&mut estimates);
    estimates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::CellState;
    use crate::search;
    use crate::types::Constraint;

    fn component(constraints: Vec<Constraint>) -> Component {
        let mut cells: Vec<Cell> = constraints.iter().flat_map(|c| c.cells.clone()).collect();
        cells.sort_unstable();
        cells.dedup();
        Component { constraints, cells }
    }

    #[test]
    fn test_frequencies_one_of_two() {
        let comp = component(vec![Constraint {
            cells: vec![Cell::new(0, 0), Cell::new(1, 0)],
            required: 1,
            source: Cell::new(0, 1),
        }]);
        let outcome = search::enumerate_assignments(&comp, 99, 1000);
        let freqs = component_frequencies(&comp, &outcome);

        assert_eq!(freqs.len(), 2);
        for f in &freqs {
            assert!((f.probability - 0.5).abs() < 1e-9);
        }
    }

    #[test]
    fn test_saturated_safe_cells_get_exactly_zero() {
        // A satisfied constraint admits only the all-clear assignment.
        let comp = component(vec![Constraint {
            cells: vec![Cell::new(0, 0), Cell::new(1, 0)],
            required: 0,
            source: Cell::new(0, 1),
        }]);
        let outcome = search::enumerate_assignments(&comp, 99, 1000);
        let freqs = component_frequencies(&comp, &outcome);

        assert_eq!(freqs.len(), 2);
        for f in &freqs {
            assert_eq!(f.probability, 0.0);
        }
    }

    #[test]
    fn test_frequencies_empty_outcome_yield_nothing() {
        let comp = component(vec![Constraint {
            cells: vec![Cell::new(0, 0)],
            required: 1,
            source: Cell::new(0, 1),
        }]);
        // Zero remaining mines admits no assignment.
        let outcome = search::enumerate_assignments(&comp, 0, 1000);
        assert!(component_frequencies(&comp, &outcome).is_empty());
    }

    #[test]
    fn test_density_fallback_blank_standard_board() {
        let cfg = SolverConfig::default();
        let board = BoardSnapshot::new(9, 9).unwrap();
        let estimates = density_fallback(&board, &HashSet::new(), &cfg);
        assert_eq!(estimates.len(), 81);

        let base = 10.0 / 81.0;
        let interior = estimates
            .iter()
            .find(|e| e.cell == Cell::new(4, 4))
            .unwrap();
        assert!((interior.probability - base).abs() < 1e-9);

        // One edge axis dampens once, a corner twice.
        let edge = estimates
            .iter()
            .find(|e| e.cell == Cell::new(0, 4))
            .unwrap();
        assert!((edge.probability - base * 0.8).abs() < 1e-9);
        let corner = estimates
            .iter()
            .find(|e| e.cell == Cell::new(0, 0))
            .unwrap();
        assert!((corner.probability - base * 0.64).abs() < 1e-9);
    }

    #[test]
    fn test_density_fallback_skips_covered_cells() {
        let cfg = SolverConfig::default();
        let board = BoardSnapshot::new(3, 3).unwrap();
        let covered: HashSet<Cell> = [Cell::new(1, 1)].into_iter().collect();
        let estimates = density_fallback(&board, &covered, &cfg);
        assert_eq!(estimates.len(), 8);
        assert!(!estimates.iter().any(|e| e.cell == Cell::new(1, 1)));
    }

    #[test]
    fn test_enhance_floors_oscillating_cells() {
        let cfg = SolverConfig::default();
        let board = BoardSnapshot::new(5, 5).unwrap();
        let cell = Cell::new(2, 2);
        let mut estimates = vec![CellProbability {
            cell,
            probability: 0.1,
        }];
        let oscillating: HashSet<Cell> = [cell].into_iter().collect();

        enhance(&board, &mut estimates, &oscillating, &cfg);
        assert!(estimates[0].probability >= cfg.oscillation_risk);
        assert!(estimates[0].probability <= 1.0);
    }

    #[test]
    fn test_enhance_polarizes_non_frontier_away_from_half() {
        let cfg = SolverConfig::default();
        // Mostly revealed board so the early-game softening stays out of
        // the way.
        let mut board = BoardSnapshot::new(3, 3).unwrap();
        for cell in [Cell::new(0, 0), Cell::new(1, 0), Cell::new(2, 0)] {
            board.set(cell, CellState::Revealed(0));
        }
        for cell in [Cell::new(0, 1), Cell::new(1, 1), Cell::new(2, 1)] {
            board.set(cell, CellState::Revealed(0));
        }

        // (1, 2) has no numbered neighbor: non-frontier.
        let mut estimates = vec![CellProbability {
            cell: Cell::new(1, 2),
            probability: 0.4,
        }];
        enhance(&board, &mut estimates, &HashSet::new(), &cfg);
        assert!(estimates[0].probability < 0.4);
    }

    #[test]
    fn test_enhance_keeps_bounds() {
        let cfg = SolverConfig::default();
        let board = BoardSnapshot::new(4, 4).unwrap();
        let mut estimates: Vec<CellProbability> = board
            .all_cells()
            .enumerate()
            .map(|(i, cell)| CellProbability {
                cell,
                probability: i as f64 / 15.0,
            })
            .collect();
        enhance(&board, &mut estimates, &HashSet::new(), &cfg);
        for e in &estimates {
            assert!((0.0..=1.0).contains(&e.probability));
        }
    }

    #[test]
    fn test_rank_ascending_with_coordinate_tie_break() {
        let mut estimates = vec![
            CellProbability {
                cell: Cell::new(2, 0),
                probability: 0.3,
            },
            CellProbability {
                cell: Cell::new(0, 0),
                probability: 0.3,
            },
            CellProbability {
                cell: Cell::new(1, 0),
                probability: 0.1,
            },
        ];
        rank(&mut estimates);
        assert_eq!(estimates[0].cell, Cell::new(1, 0));
        assert_eq!(estimates[1].cell, Cell::new(0, 0));
        assert_eq!(estimates[2].cell, Cell::new(2, 0));
    }

    #[test]
    fn test_estimate_combines_paths() {
        let cfg = SolverConfig::default();
        let mut board = BoardSnapshot::new(9, 9).unwrap();
        board.set(Cell::new(4, 4), CellState::Revealed(1));

        let constraints = crate::constraints::collect(&board);
        let components = crate::constraints::partition(constraints);
        assert_eq!(components.len(), 1);

        let mut outcomes = HashMap::new();
        outcomes.insert(
            0,
            search::enumerate_assignments(
                &components[0],
                board.estimated_remaining_mines(&cfg),
                cfg.assignment_cap,
            ),
        );

        let estimates = estimate(&board, &components, &outcomes, &HashSet::new(), &cfg);
        // Every unresolved cell got exactly one estimate.
        assert_eq!(estimates.len(), board.unresolved_count());
        for pair in estimates.windows(2) {
            assert!(pair[0].probability <= pair[1].probability);
        }
    }
}
