//! Simulated games with known mine layouts.
//!
//! Test and benchmark support: a [`MineField`] is ground truth the solver
//! never sees, a [`SimGame`] applies moves against it with the usual
//! zero-cascade reveal, and exposes the hidden/flagged/revealed snapshot
//! the solver works from.

use std::collections::HashSet;

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use crate::board::{BoardSnapshot, CellState};
use crate::runner::GameStatus;
use crate::types::{Cell, Move, MoveAction};

/// Immutable ground truth: which cells hold mines.
#[derive(Clone, Debug)]
pub struct MineField {
    width: usize,
    height: usize,
    mines: HashSet<Cell>,
}

impl MineField {
    pub fn new(width: usize, height: usize, mines: impl IntoIterator<Item = Cell>) -> Self {
        Self {
            width,
            height,
            mines: mines.into_iter().collect(),
        }
    }

    /// Uniform random layout. When `safe` is given, neither it nor its
    /// neighbors receive a mine, so an opening reveal there cascades.
    pub fn random(
        width: usize,
        height: usize,
        mine_count: usize,
        rng: &mut SmallRng,
        safe: Option<Cell>,
    ) -> Self {
        let protected: HashSet<Cell> = match safe {
            Some(cell) => {
                let mut p: HashSet<Cell> = neighbors(width, height, cell).collect();
                p.insert(cell);
                p
            }
            None => HashSet::new(),
        };

        let mut candidates: Vec<Cell> = (0..width)
            .flat_map(|x| (0..height).map(move |y| Cell::new(x, y)))
            .filter(|c| !protected.contains(c))
            .collect();
        candidates.shuffle(rng);
        candidates.truncate(mine_count);

        Self::new(width, height, candidates)
    }

    pub fn is_mine(&self, cell: Cell) -> bool {
        self.mines.contains(&cell)
    }

    pub fn mine_count(&self) -> usize {
        self.mines.len()
    }

    pub fn adjacent_mines(&self, cell: Cell) -> u8 {
        neighbors(self.width, self.height, cell)
            .filter(|n| self.mines.contains(n))
            .count() as u8
    }
}

fn neighbors(width: usize, height: usize, cell: Cell) -> impl Iterator<Item = Cell> {
    let (x, y) = (cell.x as i64, cell.y as i64);
    (-1i64..=1)
        .flat_map(move |dx| (-1i64..=1).map(move |dy| (x + dx, y + dy)))
        .filter(move |&(nx, ny)| {
            (nx, ny) != (x, y) && nx >= 0 && ny >= 0 && nx < width as i64 && ny < height as i64
        })
        .map(|(nx, ny)| Cell::new(nx as usize, ny as usize))
}

/// A playable game over a fixed field.
pub struct SimGame {
    field: MineField,
    board: BoardSnapshot,
    detonated: bool,
}

impl SimGame {
    pub fn new(field: MineField) -> Self {
        // Field dimensions are always non-zero in practice; a zero-sized
        // field is a test bug and may panic here.
        let board = BoardSnapshot::new(field.width, field.height)
            .unwrap_or_else(|e| panic!("invalid field dimensions: {e}"));
        Self {
            field,
            board,
            detonated: false,
        }
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        self.board.clone()
    }

    pub fn field(&self) -> &MineField {
        &self.field
    }

    /// Open a cell. Mines detonate; zeros cascade through their whole
    /// region as the real game would.
    pub fn reveal(&mut self, cell: Cell) {
        if self.board.get(cell) != CellState::Hidden {
            return;
        }
        if self.field.is_mine(cell) {
            self.board.set(cell, CellState::Detonated);
            self.detonated = true;
            return;
        }

        let mut stack = vec![cell];
        while let Some(current) = stack.pop() {
            if self.board.get(current) != CellState::Hidden {
                continue;
            }
            let value = self.field.adjacent_mines(current);
            self.board.set(current, CellState::Revealed(value));
            if value == 0 {
                stack.extend(
                    neighbors(self.field.width, self.field.height, current)
                        .filter(|&n| self.board.get(n) == CellState::Hidden),
                );
            }
        }
    }

    pub fn flag(&mut self, cell: Cell) {
        if self.board.get(cell) == CellState::Hidden {
            self.board.set(cell, CellState::Flagged);
        }
    }

    pub fn apply(&mut self, moves: &[Move]) {
        for m in moves {
            match m.action {
                MoveAction::Reveal => self.reveal(m.cell),
                MoveAction::Flag => self.flag(m.cell),
            }
        }
    }

    pub fn status(&self) -> GameStatus {
        if self.detonated {
            return GameStatus::Lost;
        }
        let total = self.field.width * self.field.height;
        if self.board.revealed_count() == total - self.field.mine_count() {
            GameStatus::Won
        } else {
            GameStatus::InProgress
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolverConfig;
    use crate::session::SolverSession;
    use rand::SeedableRng;

    #[test]
    fn test_adjacent_mine_numbers() {
        let field = MineField::new(3, 3, [Cell::new(0, 0), Cell::new(2, 2)]);
        assert_eq!(field.adjacent_mines(Cell::new(1, 1)), 2);
        assert_eq!(field.adjacent_mines(Cell::new(1, 0)), 1);
        assert_eq!(field.adjacent_mines(Cell::new(0, 1)), 1);
        // The opposite corners see neither mine.
        assert_eq!(field.adjacent_mines(Cell::new(2, 0)), 0);
        assert_eq!(field.adjacent_mines(Cell::new(0, 2)), 0);
    }

    #[test]
    fn test_zero_cascade_opens_region() {
        // Single mine in a corner: revealing the far corner floods
        // everything except the mine's immediate surroundings boundary.
        let field = MineField::new(5, 5, [Cell::new(0, 0)]);
        let mut game = SimGame::new(field);
        game.reveal(Cell::new(4, 4));

        let board = game.snapshot();
        // Everything except the mine is revealed: the cascade stops at
        // numbered cells but every number here borders the open region.
        assert_eq!(board.revealed_count(), 24);
        assert_eq!(board.get(Cell::new(0, 0)), CellState::Hidden);
        assert_eq!(game.status(), GameStatus::Won);
    }

    #[test]
    fn test_detonation_loses() {
        let field = MineField::new(3, 3, [Cell::new(1, 1)]);
        let mut game = SimGame::new(field);
        game.reveal(Cell::new(1, 1));
        assert_eq!(game.status(), GameStatus::Lost);
        assert_eq!(game.snapshot().get(Cell::new(1, 1)), CellState::Detonated);
    }

    #[test]
    fn test_random_field_respects_safe_zone() {
        let mut rng = SmallRng::seed_from_u64(3);
        let safe = Cell::new(4, 4);
        for _ in 0..10 {
            let field = MineField::random(9, 9, 10, &mut rng, Some(safe));
            assert_eq!(field.mine_count(), 10);
            assert!(!field.is_mine(safe));
            for n in neighbors(9, 9, safe) {
                assert!(!field.is_mine(n));
            }
        }
    }

    #[test]
    fn test_flag_only_marks_hidden_cells() {
        let field = MineField::new(3, 3, [Cell::new(0, 0)]);
        let mut game = SimGame::new(field);
        game.reveal(Cell::new(2, 2));
        let revealed = Cell::new(2, 2);
        game.flag(revealed);
        assert_ne!(game.snapshot().get(revealed), CellState::Flagged);
    }

    /// Deduction soundness over random consistent games: with guessing
    /// disabled, every flag the engine emits must be a true mine and
    /// every reveal must be clear, for as long as it makes progress.
    #[test]
    fn test_deductions_sound_on_random_games() {
        for seed in 0..5u64 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let opening = Cell::new(4, 4);
            let field = MineField::random(9, 9, 10, &mut rng, Some(opening));
            let mut game = SimGame::new(field);
            game.reveal(opening);

            let mut cfg = SolverConfig::default();
            // Below any possible estimate: certainty only.
            cfg.guess_threshold_early = -1.0;
            cfg.guess_threshold_late = -1.0;
            // Truncated enumerations are allowed to misclassify; keep
            // the cap out of reach so this test checks pure deduction.
            cfg.assignment_cap = 1_000_000;
            let mut session = SolverSession::with_seed(cfg, seed);

            for _ in 0..200 {
                if game.status() != GameStatus::InProgress {
                    break;
                }
                let moves = session.solve(Some(&game.snapshot()));
                if moves.is_empty() {
                    break;
                }
                for m in &moves {
                    match m.action {
                        MoveAction::Flag => {
                            assert!(
                                game.field().is_mine(m.cell),
                                "seed {seed}: flagged safe cell {}",
                                m.cell
                            );
                        }
                        MoveAction::Reveal => {
                            assert!(
                                !game.field().is_mine(m.cell),
                                "seed {seed}: revealed mine at {}",
                                m.cell
                            );
                        }
                    }
                }
                game.apply(&moves);
            }
            assert_ne!(game.status(), GameStatus::Lost, "seed {seed}");
        }
    }
}
