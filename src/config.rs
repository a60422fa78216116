//! Tuning knobs for the solver.
//!
//! None of these constants is formally derived; they are the empirical
//! values the engine was tuned with. Every one is overridable so a
//! collaborator can re-tune without touching solver code.

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Largest component (in unresolved cells) for exact assignment
    /// enumeration. Components above this degrade to the relaxation.
    pub exact_search_limit: usize,
    /// Largest component the relaxation still examines. Above this the
    /// component is skipped entirely, never searched.
    pub relaxation_limit: usize,
    /// Largest component the probability estimator enumerates exactly.
    pub probability_search_limit: usize,
    /// Hard cap on retained valid assignments per component. Once hit,
    /// enumeration stops and the result is marked truncated.
    pub assignment_cap: usize,
    /// Combined unresolved-cell limit for the connected small-group
    /// pattern (exhaustive search scoped to one numbered group).
    pub group_search_limit: usize,
    /// Whole-board unresolved-cell count at which the endgame shortcut
    /// replaces the partition/search pipeline.
    pub endgame_limit: usize,
    /// Assumed mine density for boards that are not a standard difficulty.
    pub fallback_mine_density: f64,
    /// Probability multiplier per board-edge axis a cell touches.
    pub edge_dampening: f64,
    /// Guess threshold at 0% board completion.
    pub guess_threshold_early: f64,
    /// Guess threshold at 100% board completion.
    pub guess_threshold_late: f64,
    /// Board-opened fraction below which the game counts as "early".
    pub early_game_fraction: f64,
    /// How strongly non-frontier estimates are pushed away from 0.5.
    pub polarization: f64,
    /// Probability floor forced onto cells marked as oscillating.
    pub oscillation_risk: f64,
    /// Trailing window the stability tracker keeps per-cell history for.
    pub oscillation_window: Duration,
    /// Minimum proposals within the window before a cell can count as
    /// oscillating.
    pub oscillation_min_entries: usize,
    /// Probability band stuck recovery picks an "intermediate" cell from.
    pub intermediate_band: (f64, f64),
    /// Component mine density below which a forced resolution reveals
    /// rather than flags.
    pub component_density_cutoff: f64,
    /// Consecutive unchanged/empty passes before the runner enters
    /// stuck recovery.
    pub stuck_rounds: usize,
    /// Upper bound on solve/act rounds per session.
    pub max_rounds: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            exact_search_limit: 18,
            relaxation_limit: 24,
            probability_search_limit: 15,
            assignment_cap: 1000,
            group_search_limit: 12,
            endgame_limit: 5,
            fallback_mine_density: 0.16,
            edge_dampening: 0.8,
            guess_threshold_early: 0.45,
            guess_threshold_late: 0.15,
            early_game_fraction: 0.3,
            polarization: 1.2,
            oscillation_risk: 0.75,
            oscillation_window: Duration::from_secs(30),
            oscillation_min_entries: 3,
            intermediate_band: (0.3, 0.7),
            component_density_cutoff: 0.4,
            stuck_rounds: 3,
            max_rounds: 300,
        }
    }
}

impl SolverConfig {
    /// Guess threshold for the current board completion, linearly
    /// tightening from the early to the late value. Weighted-sum form
    /// so both endpoints are hit exactly.
    pub fn guess_threshold(&self, completion: f64) -> f64 {
        let t = completion.clamp(0.0, 1.0);
        self.guess_threshold_early * (1.0 - t) + self.guess_threshold_late * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits_are_ordered() {
        let cfg = SolverConfig::default();
        assert!(cfg.probability_search_limit <= cfg.exact_search_limit);
        assert!(cfg.exact_search_limit <= cfg.relaxation_limit);
    }

    #[test]
    fn test_guess_threshold_tightens_with_completion() {
        let cfg = SolverConfig::default();
        assert_eq!(cfg.guess_threshold(0.0), cfg.guess_threshold_early);
        assert_eq!(cfg.guess_threshold(1.0), cfg.guess_threshold_late);
        assert!(cfg.guess_threshold(0.3) > cfg.guess_threshold(0.8));
    }

    #[test]
    fn test_guess_threshold_clamps_out_of_range_completion() {
        let cfg = SolverConfig::default();
        assert_eq!(cfg.guess_threshold(-1.0), cfg.guess_threshold_early);
        assert_eq!(cfg.guess_threshold(2.0), cfg.guess_threshold_late);
    }
}
