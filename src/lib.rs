//! Minesweeper engine with a no-guess solver and guaranteed-solvable
//! board generation.
//!
//! [`Game`] is the authoritative state machine: it owns the board,
//! enforces reveal/chord/flag semantics and masks hidden content from
//! the player view while a round is in progress. [`DeductiveSolver`]
//! plays from that same masked view, producing explained [`Move`]s or
//! resigning when no safe move can be proven. [`Game::start_with`]
//! combines the two: boards are generated and solver-verified until one
//! is winnable without guessing from the player's first reveal.

pub mod board;
pub mod error;
pub mod game;
pub mod rng;
pub mod solver;
pub mod types;

pub use board::CancelToken;
pub use error::{BoardSizeError, GenerationInterrupted};
pub use game::Game;
pub use rng::GameRng;
pub use solver::{
    Action, Click, DeductiveSolver, Logic, Move, Reason, SafeStart, SolveOutcome, Solver,
    ZeroStart, BRUTE_FORCE_LIMIT,
};
pub use types::{
    Board, BoardSize, Cell, Content, GameState, GameStatus, NeighborCache, Point, Visibility,
};
