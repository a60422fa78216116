//! The solver session: one long-lived object per game.
//!
//! A session owns the per-pass cache, the stability tracker and the RNG
//! used by stuck recovery. Each call to [`SolverSession::solve`] takes a
//! fresh board snapshot, escalates through the deduction tiers and falls
//! back to a probability-ranked guess when no certain move exists.

use std::collections::HashMap;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::board::BoardSnapshot;
use crate::config::SolverConfig;
use crate::constraints;
use crate::patterns;
use crate::probability;
use crate::rules;
use crate::search::{self, SearchOutcome};
use crate::stability::StabilityTracker;
use crate::types::{CellProbability, Component, Constraint, Move};

/// Derived state for one board content hash. Rebuilt wholesale whenever
/// the snapshot's hash changes; never partially invalidated.
struct PassCache {
    hash: u64,
    constraints: Vec<Constraint>,
    components: Vec<Component>,
    /// Exact-search results, keyed by component index. Components above
    /// the exact-search limit have no entry.
    outcomes: HashMap<usize, SearchOutcome>,
}

/// Diagnostic counts for one snapshot.
#[derive(Clone, Debug, Serialize)]
pub struct AnalysisReport {
    pub width: usize,
    pub height: usize,
    pub revealed: usize,
    pub flagged: usize,
    pub unresolved: usize,
    pub completion: f64,
    pub active_constraints: usize,
    pub components: usize,
    pub largest_component: usize,
    pub frontier_size: usize,
}

pub struct SolverSession {
    config: SolverConfig,
    tracker: StabilityTracker,
    rng: SmallRng,
    cache: Option<PassCache>,
}

impl SolverSession {
    pub fn new(config: SolverConfig) -> Self {
        let rng = SmallRng::from_os_rng();
        Self::with_rng(config, rng)
    }

    /// Deterministic session for tests and benchmarks.
    pub fn with_seed(config: SolverConfig, seed: u64) -> Self {
        Self::with_rng(config, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(config: SolverConfig, rng: SmallRng) -> Self {
        let tracker = StabilityTracker::new(
            config.oscillation_window,
            config.oscillation_min_entries,
        );
        Self {
            config,
            tracker,
            rng,
            cache: None,
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// One full pass: tier escalation, then a probability guess. A
    /// missing snapshot yields an empty batch, never an error. Oscillating
    /// cells are stripped from the output.
    pub fn solve(&mut self, board: Option<&BoardSnapshot>) -> Vec<Move> {
        let Some(board) = board else {
            log::debug!("no board snapshot available, skipping pass");
            return Vec::new();
        };

        self.refresh_cache(board);
        let mut moves = self.tier_search(board);

        if moves.is_empty() {
            if let Some(guess) = self.best_guess(board) {
                moves.push(guess);
            }
        }

        for m in &moves {
            self.tracker.record(m.cell, m.action);
        }
        self.tracker.suppress(moves)
    }

    /// The ranked probability list for the current snapshot.
    pub fn probabilities(&mut self, board: &BoardSnapshot) -> Vec<CellProbability> {
        self.refresh_cache(board);
        let cache = match &self.cache {
            Some(c) => c,
            None => return Vec::new(),
        };
        probability::estimate(
            board,
            &cache.components,
            &cache.outcomes,
            &self.tracker.oscillating_cells(),
            &self.config,
        )
    }

    /// Forget all cached state and history, for a fresh game.
    pub fn reset(&mut self) {
        self.cache = None;
        self.tracker.clear();
    }

    pub fn report(&mut self, board: &BoardSnapshot) -> AnalysisReport {
        self.refresh_cache(board);
        let (active_constraints, components, largest_component) = match &self.cache {
            Some(c) => (
                c.constraints.len(),
                c.components.len(),
                c.components.iter().map(|k| k.cells.len()).max().unwrap_or(0),
            ),
            None => (0, 0, 0),
        };
        AnalysisReport {
            width: board.width(),
            height: board.height(),
            revealed: board.revealed_count(),
            flagged: board.flagged_count(),
            unresolved: board.unresolved_count(),
            completion: board.completion(),
            active_constraints,
            components,
            largest_component,
            frontier_size: board.frontier().len(),
        }
    }

    fn refresh_cache(&mut self, board: &BoardSnapshot) {
        let hash = board.content_hash();
        if matches!(&self.cache, Some(c) if c.hash == hash) {
            return;
        }

        let collected = constraints::collect(board);
        let components = constraints::partition(collected.clone());
        let remaining = board.estimated_remaining_mines(&self.config);

        let mut outcomes = HashMap::new();
        for (i, component) in components.iter().enumerate() {
            if component.cells.len() <= self.config.exact_search_limit {
                outcomes.insert(
                    i,
                    search::enumerate_assignments(component, remaining, self.config.assignment_cap),
                );
            }
        }

        log::debug!(
            "pass cache rebuilt: {} constraints, {} components",
            collected.len(),
            components.len()
        );
        self.cache = Some(PassCache {
            hash,
            constraints: collected,
            components,
            outcomes,
        });
    }

    /// Tiers (a) through (d), cheapest first; the first tier that yields
    /// anything wins the pass.
    fn tier_search(&mut self, board: &BoardSnapshot) -> Vec<Move> {
        let Some(cache) = &self.cache else {
            return Vec::new();
        };

        let saturation = rules::saturation_moves(&cache.constraints);
        if !saturation.is_empty() {
            log::debug!("saturation yielded {} moves", saturation.len());
            return saturation;
        }

        let templates = patterns::pattern_moves(board, &self.config);
        if !templates.is_empty() {
            log::debug!("pattern templates yielded {} moves", templates.len());
            return templates;
        }

        let subsets = rules::subset_moves(&cache.constraints);
        if !subsets.is_empty() {
            log::debug!("subset deduction yielded {} moves", subsets.len());
            return subsets;
        }

        // Tier (d) proper: endgame shortcut first, then per-component
        // exact search with relaxation for the oversized.
        let endgame = search::endgame_moves(board, &self.config);
        if !endgame.is_empty() {
            log::debug!("endgame shortcut yielded {} moves", endgame.len());
            return endgame;
        }

        let mut moves = Vec::new();
        for (i, component) in cache.components.iter().enumerate() {
            let size = component.cells.len();
            if size <= self.config.exact_search_limit {
                if let Some(outcome) = cache.outcomes.get(&i) {
                    moves.extend(search::classify(component, outcome));
                }
            } else if size <= self.config.relaxation_limit {
                moves.extend(search::relaxation_moves(component));
            }
            // Larger components are skipped entirely.
        }
        rules::dedupe(moves)
    }

    /// Probability-ranked guess under a completion-tightened threshold.
    fn best_guess(&mut self, board: &BoardSnapshot) -> Option<Move> {
        // Nothing revealed yet: open at the center, statistically the
        // most informative first click.
        if board.revealed_count() == 0 {
            let center = crate::types::Cell::new(board.width() / 2, board.height() / 2);
            if board.is_unresolved(center) {
                return Some(Move::reveal(center));
            }
        }

        let estimates = self.probabilities(board);
        if estimates.is_empty() {
            return None;
        }

        let threshold = self.config.guess_threshold(board.completion());
        let early_game = board.completion() < self.config.early_game_fraction;
        let under: Vec<CellProbability> = estimates
            .into_iter()
            .filter(|e| e.probability <= threshold)
            .collect();
        if under.is_empty() {
            log::debug!(
                "best candidate above guess threshold {:.2}, withholding",
                threshold
            );
            return None;
        }

        // Frontier candidates first; they produce new constraints. The
        // list is already sorted ascending, so the first match is best.
        let frontier_best = under
            .iter()
            .copied()
            .find(|e| board.is_frontier_cell(e.cell));
        let pick = match frontier_best {
            Some(best) if early_game => {
                // Opening tie-preference: among near-equal frontier
                // candidates, take an edge cell when one exists.
                under
                    .iter()
                    .copied()
                    .filter(|e| board.is_frontier_cell(e.cell))
                    .filter(|e| e.probability <= best.probability + 1e-9)
                    .find(|e| board.is_edge_cell(e.cell))
                    .unwrap_or(best)
            }
            Some(best) => best,
            None => under[0],
        };

        Some(Move::reveal(pick.cell))
    }

    /// Ordered stuck-recovery strategies. `None` means the session is
    /// exhausted: nothing reasonable is left to try.
    pub fn recover(&mut self, board: &BoardSnapshot) -> Option<Move> {
        self.refresh_cache(board);
        let chosen = self
            .recover_intermediate(board)
            .or_else(|| self.recover_component_middle(board))
            .or_else(|| self.recover_random_edge(board))
            .or_else(|| self.recover_any_hidden(board))
            .or_else(|| self.recover_oscillating(board));

        if let Some(m) = &chosen {
            log::info!("stuck recovery chose {:?} at {}", m.action, m.cell);
            self.tracker.record(m.cell, m.action);
        }
        chosen
    }

    /// Strategy 1: a cell of genuinely intermediate probability, resolved
    /// to whichever side of 0.5 it leans. Oscillating cells excluded.
    fn recover_intermediate(&mut self, board: &BoardSnapshot) -> Option<Move> {
        let (lo, hi) = self.config.intermediate_band;
        let oscillating = self.tracker.oscillating_cells();
        let estimates = self.probabilities(board);

        let candidate = estimates
            .iter()
            .filter(|e| !oscillating.contains(&e.cell))
            .find(|e| e.probability >= lo && e.probability <= hi)?;

        if candidate.probability < 0.5 {
            Some(Move::reveal(candidate.cell))
        } else {
            Some(Move::flag(candidate.cell))
        }
    }

    /// Strategy 2: the middle cell of the largest unfinished component,
    /// resolved by the component's own mine density.
    fn recover_component_middle(&mut self, board: &BoardSnapshot) -> Option<Move> {
        let cache = self.cache.as_ref()?;
        let largest = cache
            .components
            .iter()
            .max_by_key(|c| c.cells.len())
            .filter(|c| !c.cells.is_empty())?;

        let middle = largest.cells[largest.cells.len() / 2];
        if !board.is_unresolved(middle) {
            return None;
        }
        if largest.mine_density() < self.config.component_density_cutoff {
            Some(Move::reveal(middle))
        } else {
            Some(Move::flag(middle))
        }
    }

    /// Strategy 3: a random unresolved edge cell.
    fn recover_random_edge(&mut self, board: &BoardSnapshot) -> Option<Move> {
        let edge_cells: Vec<_> = board
            .unresolved_cells()
            .into_iter()
            .filter(|&c| board.is_edge_cell(c))
            .collect();
        if edge_cells.is_empty() {
            return None;
        }
        let pick = edge_cells[self.rng.random_range(0..edge_cells.len())];
        Some(Move::reveal(pick))
    }

    /// Strategy 4: any hidden, unflagged cell at all.
    fn recover_any_hidden(&mut self, board: &BoardSnapshot) -> Option<Move> {
        board.unresolved_cells().first().map(|&c| Move::reveal(c))
    }

    /// Strategy 5, last resort: revisit an oscillating cell.
    fn recover_oscillating(&mut self, board: &BoardSnapshot) -> Option<Move> {
        self.tracker
            .oscillating_cells()
            .into_iter()
            .find(|&c| board.is_unresolved(c))
            .map(Move::reveal)
    }
}
