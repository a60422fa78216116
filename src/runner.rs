//! The solve/act loop over the collaborator boundary.
//!
//! The runner owns a [`BoardSource`] it polls for fresh snapshots, an
//! [`ActionSink`] it hands move batches to, and the [`SolverSession`]
//! doing the work. It never awaits confirmation for applied moves; the
//! next pass re-reads the board in full and the hash comparison tells it
//! whether anything actually happened.

use serde::{Deserialize, Serialize};

use crate::board::BoardSnapshot;
use crate::session::SolverSession;
use crate::types::Move;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    InProgress,
    Won,
    Lost,
}

/// Where board snapshots come from. `None` means the grid could not be
/// read this round; the runner skips the pass rather than failing.
pub trait BoardSource {
    fn snapshot(&mut self) -> Option<BoardSnapshot>;
    fn status(&mut self) -> GameStatus;
}

/// Where proposed moves go. Application is fire-and-forget.
pub trait ActionSink {
    fn apply(&mut self, moves: &[Move]);
}

/// What one `run` did.
#[derive(Clone, Debug, Serialize)]
pub struct RunSummary {
    pub rounds: usize,
    pub moves_applied: usize,
    pub recoveries: usize,
    pub exhausted: bool,
    pub status: GameStatus,
}

pub struct SessionRunner<S, A> {
    source: S,
    sink: A,
    session: SolverSession,
}

impl<S: BoardSource, A: ActionSink> SessionRunner<S, A> {
    pub fn new(source: S, sink: A, session: SolverSession) -> Self {
        Self {
            source,
            sink,
            session,
        }
    }

    /// Loop until the game ends, the session is exhausted, or the round
    /// budget runs out. The session is reset whenever the game ends so a
    /// following run starts with clean caches and history.
    pub fn run(&mut self) -> RunSummary {
        let max_rounds = self.session.config().max_rounds;
        let stuck_rounds = self.session.config().stuck_rounds;

        let mut rounds = 0;
        let mut moves_applied = 0;
        let mut recoveries = 0;
        let mut exhausted = false;
        let mut stuck = 0usize;
        let mut last_hash: Option<u64> = None;

        while rounds < max_rounds {
            let status = self.source.status();
            if status != GameStatus::InProgress {
                log::info!("game over ({:?}) after {} rounds", status, rounds);
                self.session.reset();
                return RunSummary {
                    rounds,
                    moves_applied,
                    recoveries,
                    exhausted,
                    status,
                };
            }
            rounds += 1;

            let Some(board) = self.source.snapshot() else {
                log::debug!("board unreadable this round");
                stuck += 1;
                continue;
            };

            let hash = board.content_hash();
            let unchanged = last_hash == Some(hash);
            last_hash = Some(hash);

            let moves = self.session.solve(Some(&board));
            if moves.is_empty() || unchanged {
                stuck += 1;
            } else {
                stuck = 0;
            }

            if !moves.is_empty() {
                self.sink.apply(&moves);
                moves_applied += moves.len();
            }

            if stuck >= stuck_rounds {
                match self.session.recover(&board) {
                    Some(recovery) => {
                        self.sink.apply(&[recovery]);
                        moves_applied += 1;
                        recoveries += 1;
                        stuck = 0;
                    }
                    None => {
                        log::info!("recovery exhausted after {} rounds", rounds);
                        exhausted = true;
                        self.session.reset();
                        break;
                    }
                }
            }
        }

        let status = self.source.status();
        RunSummary {
            rounds,
            moves_applied,
            recoveries,
            exhausted,
            status,
        }
    }
}
