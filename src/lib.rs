//! A minesweeper inference engine.
//!
//! The crate turns an externally owned board snapshot into batches of
//! certain (and, failing that, probability-ranked) moves. One
//! [`SolverSession`] lives per game and escalates through four deduction
//! tiers of increasing cost: per-constraint saturation, local geometric
//! pattern templates, pairwise subset deduction, and exhaustive
//! per-component assignment search. When no certain move exists the
//! session guesses under a completion-tightened probability threshold,
//! and a stability tracker keeps it from flip-flopping on contested
//! cells.
//!
//! The engine never owns the game: a [`runner::BoardSource`] supplies
//! snapshots, a [`runner::ActionSink`] consumes moves, and every pass
//! re-reads the board in full.

pub mod board;
pub mod config;
pub mod constraints;
pub mod patterns;
pub mod probability;
pub mod rules;
pub mod runner;
pub mod search;
pub mod session;
pub mod sim;
pub mod stability;
pub mod types;

pub use board::{BoardError, BoardSnapshot, CellState};
pub use config::SolverConfig;
pub use runner::{ActionSink, BoardSource, GameStatus, RunSummary, SessionRunner};
pub use session::{AnalysisReport, SolverSession};
pub use types::{Cell, CellProbability, Move, MoveAction};
