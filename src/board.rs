//! Board generation: random mine placement and the guaranteed-start
//! generate-and-verify loop.
//!
//! A guaranteed start is found by brute force: generate a uniformly
//! random board, hand a disposable copy of the game to the solver with
//! the candidate first move already played, and keep the board only if
//! the solver wins. The search is embarrassingly parallel, so the
//! blocking variant races one loop per core and takes the first hit.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use crate::error::GenerationInterrupted;
use crate::game::Game;
use crate::rng::GameRng;
use crate::solver::{SolveOutcome, Solver};
use crate::types::{Board, BoardSize, GameState, GameStatus, Point};

/// Cooperative cancellation for an in-flight guaranteed-start search.
///
/// Clones share one flag. Cancelling makes the search return
/// [`GenerationInterrupted`] at its next iteration boundary.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// A fresh playing state over a uniformly random fully hidden board.
pub fn generate(size: BoardSize, rng: &mut GameRng) -> GameState {
    let height = size.height();
    let mines: Vec<Point> = rng
        .sample_indices(size.cell_count(), size.mines())
        .into_iter()
        .map(|idx| Point::new(idx / height, idx % height))
        .collect();
    GameState::new(
        GameStatus::Playing,
        Board::with_mines(size, &mines),
        size.mines() as i32,
    )
}

/// One generate-and-verify round: random board, play `first`, drive the
/// solver on a disposable copy. Returns the untouched original state if
/// the solver won.
fn attempt(
    size: BoardSize,
    first: Point,
    solver: &dyn Solver,
    rng: &mut GameRng,
) -> Option<GameState> {
    let candidate = generate(size, rng);
    let mut trial = Game::from_state(candidate.clone());
    match trial.left_click(first.x, first.y) {
        Ok(state) if state.status == GameStatus::Lost => return None,
        Ok(_) => {}
        Err(_) => return None,
    }
    match solver.play(&mut trial) {
        SolveOutcome::Won => Some(candidate),
        _ => None,
    }
}

/// Sequential guaranteed-start search over a caller-provided generator,
/// for deterministic use. Retries until a board solvable from `first`
/// comes up or the token is cancelled.
pub fn generate_guaranteed_seeded(
    size: BoardSize,
    first: Point,
    solver: &dyn Solver,
    cancel: &CancelToken,
    rng: &mut GameRng,
) -> Result<GameState, GenerationInterrupted> {
    loop {
        if cancel.is_cancelled() {
            return Err(GenerationInterrupted);
        }
        if let Some(state) = attempt(size, first, solver, rng) {
            return Ok(state);
        }
    }
}

/// Blocking guaranteed-start search, parallelized across the available
/// cores. The first worker to find a solvable board wins; the rest stop
/// at their next iteration.
pub fn generate_guaranteed(
    size: BoardSize,
    first: Point,
    solver: &(dyn Solver + Send + Sync),
    cancel: &CancelToken,
) -> Result<GameState, GenerationInterrupted> {
    let workers = thread::available_parallelism().map_or(1, |n| n.get());
    let done = AtomicBool::new(false);
    let found: Mutex<Option<GameState>> = Mutex::new(None);

    thread::scope(|scope| {
        for _ in 0..workers {
            scope.spawn(|| {
                let mut rng = GameRng::new();
                while !done.load(Ordering::Relaxed) && !cancel.is_cancelled() {
                    if let Some(state) = attempt(size, first, solver, &mut rng) {
                        if let Ok(mut slot) = found.lock() {
                            if slot.is_none() {
                                *slot = Some(state);
                            }
                        }
                        done.store(true, Ordering::Relaxed);
                        return;
                    }
                }
            });
        }
    });

    match found.into_inner() {
        Ok(Some(state)) => Ok(state),
        _ => Err(GenerationInterrupted),
    }
}
